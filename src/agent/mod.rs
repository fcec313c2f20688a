use async_trait::async_trait;
use rig::client::Nothing;
use rig::completion::Chat;
use rig::message::Message as RigMessage;
use rig::prelude::CompletionClient;
use rig::providers::ollama;
use tracing::error;

use crate::errors::AppError;
use crate::models::Turn;

const PREAMBLE: &str = "You are an expert flight-log analyst helping a user understand \
                        telemetry recorded by an autopilot. \
                        Answer from the table overview and statistics below. \
                        Be concise, mention the tables and columns you relied on, \
                        and if the data cannot answer the question, say so.";

/// Answers one question about a session's telemetry.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    async fn answer(
        &self,
        context: &str,
        history: &[Turn],
        question: &str,
    ) -> Result<String, AppError>;
}

/// Builds a rig [`RigMessage`] history list from completed turns.
fn to_rig_history(history: &[Turn]) -> Vec<RigMessage> {
    history
        .iter()
        .flat_map(|turn| {
            [RigMessage::user(&turn.question), RigMessage::assistant(&turn.answer)]
        })
        .collect()
}

/// [`ChatAgent`] backed by the rig [`ollama::Client`].
/// A fresh agent is built per request so the preamble always carries the
/// session's current telemetry context.
#[derive(Clone)]
pub struct OllamaAgentService {
    client: ollama::Client,
    base_url: String,
    model: String,
}

impl OllamaAgentService {
    pub fn new(base_url: &str, model: &str) -> Result<Self, AppError> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(base_url)
            .build()
            .map_err(|e| AppError::Unexpected(format!("Failed to build Ollama client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }

    fn classify(&self, err: impl std::fmt::Display) -> AppError {
        let msg = err.to_string();
        if msg.contains("Connection refused") || msg.contains("connect") {
            AppError::OllamaUnavailable { host: self.base_url.clone() }
        } else if msg.contains("model") {
            AppError::ModelNotFound { model_name: self.model.clone() }
        } else {
            AppError::InferenceError { message: msg }
        }
    }
}

#[async_trait]
impl ChatAgent for OllamaAgentService {
    async fn answer(
        &self,
        context: &str,
        history: &[Turn],
        question: &str,
    ) -> Result<String, AppError> {
        let preamble = format!("{PREAMBLE}\n\n{context}");
        let agent = self.client.agent(&self.model).preamble(&preamble).build();

        agent
            .chat(question, to_rig_history(history))
            .await
            .map_err(|e| {
                error!("Ollama inference failed: {e}");
                self.classify(e)
            })
    }
}
