//! services/api/src/adapters/passage_llm.rs
//!
//! This module contains the adapter for the passage-generating LLM.
//! It implements the `PassageGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use readflow_core::{
    domain::ReadingPassage,
    ports::{PassageGenerationService, PortError, PortResult},
};

const SYSTEM_INSTRUCTIONS: &str = r#"You generate reading passages for a speed reading test.

Respond with a single JSON object and nothing else, using exactly these keys:
{
  "title": string,
  "content": string,
  "wordCount": integer,
  "difficulty": "Easy" | "Medium" | "Hard"
}

The passage should be approximately 200-300 words long, self-contained, and
"wordCount" must be the actual number of words in "content"."#;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `PassageGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiPassageAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiPassageAdapter {
    /// Creates a new `OpenAiPassageAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `PassageGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PassageGenerationService for OpenAiPassageAdapter {
    /// Generates a passage about `topic`. Any failure surfaces as a
    /// `PortError`; the web layer substitutes the deterministic fallback.
    async fn generate_passage(&self, topic: &str) -> PortResult<ReadingPassage> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!(
                    "Generate a reading passage about \"{topic}\" for a speed reading test."
                ))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Passage LLM response contained no text content.".to_string(),
                )
            })?;

        serde_json::from_str::<ReadingPassage>(&content)
            .map_err(|e| PortError::Unexpected(format!("Passage LLM returned invalid JSON: {e}")))
    }
}
