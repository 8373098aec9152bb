pub mod insight_llm;
pub mod passage_llm;
pub mod store;

pub use insight_llm::OpenAiInsightAdapter;
pub use passage_llm::OpenAiPassageAdapter;
pub use store::JsonStoreAdapter;
