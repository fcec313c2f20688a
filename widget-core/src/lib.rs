//! Message lifecycle for the floating chat widget.
//!
//! The widget owns one [`ChatSession`]: an append-only [`Conversation`] plus an
//! [`InputController`] holding the draft and the busy flag. A successful
//! [`ChatSession::submit`] hands back a [`Submission`] which the
//! [`RequestDispatcher`] turns into exactly one outbound call; the resulting
//! [`Settlement`] is fed back through [`ChatSession::settle`].
//!
//! Nothing in here touches the DOM or the network directly, so the same state
//! machine runs in the browser and in native tests.

pub mod conversation;
pub mod dispatcher;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod message;
pub mod protocol;
pub mod session;

pub use conversation::Conversation;
pub use dispatcher::{ChatTransport, FALLBACK_REPLY, RequestDispatcher};
pub use error::TransportError;
pub use input::InputController;
pub use lifecycle::{ChatSession, Phase, Settlement, Submission};
pub use message::{Message, Role};
pub use protocol::{ChatRequest, ChatResponse, ErrorBody, InitializeRequest, InitializeResponse};
pub use session::SessionContext;
