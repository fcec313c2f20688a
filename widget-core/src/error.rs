use thiserror::Error;

/// Why an outbound chat call did not produce a usable reply.
///
/// None of these ever reach the UI as an error: the dispatcher folds every
/// variant into the fallback bot message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Serialize error: {0}")]
    Encode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Decode(String),
}
