use log::{debug, warn};

use crate::error::TransportError;
use crate::lifecycle::{Settlement, Submission};
use crate::protocol::{ChatRequest, ChatResponse};
use crate::session::SessionContext;

/// Bot message shown whenever a request fails for any reason.
pub const FALLBACK_REPLY: &str = "Something went wrong. Please try again.";

/// One request/response exchange with the chat backend.
///
/// Futures are not required to be `Send`; the widget runs on a single UI
/// thread.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}

/// Turns a [`Submission`] into exactly one call on the transport.
///
/// The session id is read from the injected [`SessionContext`] at call time.
/// The dispatcher does not gate concurrency itself; that is the busy flag's job.
#[derive(Debug, Clone)]
pub struct RequestDispatcher<T> {
    transport: T,
    session: SessionContext,
}

impl<T: ChatTransport> RequestDispatcher<T> {
    pub fn new(transport: T, session: SessionContext) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Never fails: transport errors come back as [`Settlement::Failed`].
    pub async fn dispatch(&self, submission: &Submission) -> Settlement {
        let request = ChatRequest {
            message: submission.text().to_owned(),
            session_id: self.session.id().to_owned(),
        };
        debug!("Dispatching message #{}", submission.position());

        match self.transport.send(&request).await {
            Ok(ChatResponse { response }) => Settlement::Replied(response),
            Err(err) => {
                warn!("Chat request failed: {err}");
                Settlement::Failed(err)
            }
        }
    }
}
