use chat_widget_core::{ChatSession, Message, RequestDispatcher, SessionContext};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::api::HttpTransport;

/// Widget state, provided via Leptos context.
///
/// All lifecycle rules live in [`ChatSession`]; this only wires it to
/// signals and to the browser's task queue.
#[derive(Clone, Copy)]
pub struct WidgetState {
    pub session: RwSignal<ChatSession>,
    /// Entries are append-only, so this changes exactly when the history does.
    /// Draft edits also write `session`; list rendering tracks this instead.
    pub message_count: Memo<usize>,
    dispatcher: StoredValue<RequestDispatcher<HttpTransport>>,
}

impl WidgetState {
    /// Create a new `WidgetState` and provide it in the current Leptos context.
    pub fn provide(context: SessionContext) -> Self {
        let dispatcher = RequestDispatcher::new(HttpTransport::default(), context);
        let session = RwSignal::new(ChatSession::new());
        let state = Self {
            session,
            message_count: Memo::new(move |_| session.with(|s| s.conversation().len())),
            dispatcher: StoredValue::new(dispatcher),
        };
        provide_context(state);
        state
    }

    /// Snapshot of the history without subscribing to the session.
    pub fn messages_untracked(&self) -> Vec<(usize, Message)> {
        self.session
            .with_untracked(|s| s.messages().iter().cloned().enumerate().collect())
    }

    pub fn draft(&self) -> String {
        self.session.with(|s| s.draft().to_string())
    }

    pub fn is_busy(&self) -> bool {
        self.session.with(ChatSession::is_busy)
    }

    pub fn can_submit(&self) -> bool {
        self.session.with(ChatSession::can_submit)
    }

    pub fn set_draft(&self, text: String) {
        self.session.update(|s| s.set_draft(text));
    }

    /// Shared by the Send button and the Enter key.
    pub fn submit(&self) {
        // Gate, draft clear and user append happen before anything is spawned.
        let Some(submission) = self.session.try_update(ChatSession::submit).flatten() else {
            return;
        };

        let session = self.session;
        let dispatcher = self.dispatcher.get_value();
        spawn_local(async move {
            let settlement = dispatcher.dispatch(&submission).await;
            if session.try_update(|s| s.settle(submission, settlement)).is_none() {
                debug!("Widget unmounted before the reply arrived");
            }
        });
    }
}
