use std::sync::Arc;

use chat_widget_core::{ChatRequest, ChatResponse, InitializeRequest, InitializeResponse};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::agent::ChatAgent;
use crate::errors::AppError;
use crate::models::Turn;
use crate::session::store::SessionStore;
use crate::session::Session;
use crate::telemetry;

#[derive(Clone)]
pub struct ChatService {
    sessions: SessionStore,
    agent: Arc<dyn ChatAgent>,
    max_message_length: usize,
}

impl ChatService {
    pub fn new(sessions: SessionStore, agent: Arc<dyn ChatAgent>, max_message_length: usize) -> Self {
        Self { sessions, agent, max_message_length }
    }

    /// Loads an uploaded flight log into a fresh session.
    pub fn initialize(&self, request: InitializeRequest) -> Result<InitializeResponse, AppError> {
        if request.parsed_messages.is_empty() {
            return Err(AppError::NoTelemetry);
        }

        let tables = telemetry::ingest(&request.parsed_messages);
        let session_id = Uuid::new_v4().to_string();
        info!("Initializing session {session_id} with {} tables", tables.len());

        self.sessions.insert(Session::new(session_id.clone(), tables, chrono::Utc::now()));
        debug!("{} live sessions", self.sessions.len());

        Ok(InitializeResponse {
            message: "Agent initialized successfully".to_string(),
            session_id,
        })
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        // ── Validation ────────────────────────────────────────────────────────
        if request.message.trim().is_empty() {
            return Err(AppError::EmptyField { field_name: "message".to_string() });
        }
        if request.message.len() > self.max_message_length {
            return Err(AppError::FieldTooLong {
                field_name: "message".to_string(),
                max_length: self.max_message_length,
                actual_length: request.message.len(),
            });
        }

        // ── Snapshot session state; the lock is released before the agent call ─
        let (context, history) = self
            .sessions
            .with_session(&request.session_id, |session| {
                let context = session.prompt_context(&request.message);
                let history: Vec<Turn> = session.history().cloned().collect();
                (context, history)
            })
            .ok_or_else(|| AppError::SessionNotFound { id: request.session_id.clone() })?;

        let answer = self.agent.answer(&context, &history, &request.message).await?;

        let recorded = self.sessions.with_session(&request.session_id, |session| {
            session.record_turn(Turn::new(request.message.clone(), answer.clone()));
        });
        if recorded.is_none() {
            warn!("Session {} expired before its answer was recorded", request.session_id);
        }

        Ok(ChatResponse { response: answer })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use serde_json::json;

    use super::*;
    use crate::agent::testing::StubAgent;

    fn service(agent: Arc<StubAgent>) -> ChatService {
        ChatService::new(SessionStore::new(4, TimeDelta::seconds(600)), agent, 50)
    }

    fn upload() -> InitializeRequest {
        serde_json::from_value(json!({
            "parsedMessages": {
                "ATT": { "Roll": [1, 2, 3, 4] },
                "PARM": { "Name": ["X"] }
            }
        }))
        .unwrap()
    }

    fn ask(session_id: &str, message: &str) -> ChatRequest {
        ChatRequest { message: message.to_string(), session_id: session_id.to_string() }
    }

    #[test]
    fn initialize_rejects_empty_upload() {
        let svc = service(Arc::new(StubAgent::default()));
        let empty = InitializeRequest { parsed_messages: Default::default() };
        assert!(matches!(svc.initialize(empty), Err(AppError::NoTelemetry)));
    }

    #[tokio::test]
    async fn chat_answers_and_remembers_turns() {
        let agent = Arc::new(StubAgent::default());
        let svc = service(agent.clone());
        let session_id = svc.initialize(upload()).unwrap().session_id;

        let first = svc.chat(ask(&session_id, "How did ATT roll look?")).await.unwrap();
        assert_eq!(first.response, "answer to: How did ATT roll look?");
        svc.chat(ask(&session_id, "And then?")).await.unwrap();

        let calls = agent.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        let (context, history, _) = &calls[0];
        assert!(context.contains("Available tables: ATT"));
        assert!(context.contains("Summary of `ATT` Table"));
        assert!(history.is_empty());
        let (_, history, question) = &calls[1];
        assert_eq!(question, "And then?");
        assert_eq!(history, &vec![Turn::new("How did ATT roll look?", "answer to: How did ATT roll look?")]);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let svc = service(Arc::new(StubAgent::default()));
        let err = svc.chat(ask("nope", "hi")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn blank_and_oversized_messages_are_rejected() {
        let agent = Arc::new(StubAgent::default());
        let svc = service(agent.clone());
        let session_id = svc.initialize(upload()).unwrap().session_id;

        assert!(svc.chat(ask(&session_id, "   ")).await.unwrap_err().is_validation());
        let long = "x".repeat(51);
        assert!(matches!(
            svc.chat(ask(&session_id, &long)).await,
            Err(AppError::FieldTooLong { actual_length: 51, .. })
        ));
        assert!(agent.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn agent_failure_is_not_recorded() {
        let agent = Arc::new(StubAgent::failing());
        let svc = service(agent);
        let session_id = svc.initialize(upload()).unwrap().session_id;

        let err = svc.chat(ask(&session_id, "hello")).await.unwrap_err();
        assert!(err.is_agent_unavailable());
        let turns = svc.sessions.with_session(&session_id, |s| s.history().count());
        assert_eq!(turns, Some(0));
    }
}
