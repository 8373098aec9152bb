//! services/api/src/adapters/insight_llm.rs
//!
//! This module contains the adapter for the insight-generating LLM.
//! It implements the `InsightGenerationService` port from the `core` crate.

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
    domain::{ReadingInsight, ReadingSession},
    ports::{InsightGenerationService, PortError, PortResult},
};
use serde::Deserialize;

const SYSTEM_INSTRUCTIONS: &str = r#"You analyze a user's recent reading sessions and produce short insights.

Respond with a single JSON object and nothing else, shaped exactly like:
{
  "insights": [
    { "message": string, "type": "encouragement" | "analysis" | "tip" }
  ]
}

Provide 3 brief insights. Keep each message to one or two sentences."#;

/// The envelope the model is asked to wrap its list in (json_object mode
/// requires a top-level object).
#[derive(Deserialize)]
struct InsightEnvelope {
    insights: Vec<ReadingInsight>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `InsightGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiInsightAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiInsightAdapter {
    /// Creates a new `OpenAiInsightAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn summarize(sessions: &[ReadingSession]) -> String {
        sessions
            .iter()
            .map(|s| {
                format!(
                    "Date: {}, WPM: {}, Duration: {}s, Type: {:?}",
                    s.date.to_rfc3339(),
                    s.wpm,
                    s.duration_seconds,
                    s.kind
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

//=========================================================================================
// `InsightGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl InsightGenerationService for OpenAiInsightAdapter {
    /// Generates insights from the given sessions. The empty-log shortcut
    /// and the failure fallback both live in the web layer; this adapter
    /// only reports success or a `PortError`.
    async fn generate_insights(
        &self,
        sessions: &[ReadingSession],
    ) -> PortResult<Vec<ReadingInsight>> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!(
                    "Analyze these reading sessions and provide 3 brief insights/tips.\nSessions:\n{}",
                    Self::summarize(sessions)
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
                    "Insight LLM response contained no text content.".to_string(),
                )
            })?;

        let envelope: InsightEnvelope = serde_json::from_str(&content)
            .map_err(|e| PortError::Unexpected(format!("Insight LLM returned invalid JSON: {e}")))?;
        Ok(envelope.insights)
    }
}
