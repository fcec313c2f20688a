use chat_widget_core::{ChatRequest, ChatResponse, ChatTransport, TransportError};
use gloo_net::http::Request;

/// Base URL of the chat backend. Override at build time with `CHAT_API_BASE`.
const API_BASE: &str = match option_env!("CHAT_API_BASE") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// Sends chat turns to the backend over plain HTTP (non-streaming).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let resp = Request::post(&self.chat_url())
            .json(request)
            .map_err(|e| TransportError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !resp.ok() {
            return Err(TransportError::Status(resp.status()));
        }

        resp.json::<ChatResponse>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
