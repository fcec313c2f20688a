//! JSON bodies exchanged between the widget and the chat backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Reply to `POST /api/chat`. Only `response` is read; anything else the
/// server sends is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Body of `POST /api/initialize`: decoded flight-log messages keyed by type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeRequest {
    #[serde(rename = "parsedMessages")]
    pub parsed_messages: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub message: String,
    pub session_id: String,
}

/// Body of every non-2xx backend response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_uses_camel_case_session_id() {
        let req = ChatRequest { message: "hi".into(), session_id: "s1".into() };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "hi", "sessionId": "s1" }));
    }

    #[test]
    fn chat_response_ignores_extra_fields() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"response":"Hi there","elapsed_ms":12}"#).unwrap();
        assert_eq!(resp.response, "Hi there");
    }

    #[test]
    fn chat_response_without_response_field_is_rejected() {
        let parsed = serde_json::from_str::<ChatResponse>(r#"{"error":"nope"}"#);
        assert!(parsed.is_err());
    }
}
