/// Draft text plus the busy flag that gates submission.
///
/// The draft is freely editable; the busy flag is only flipped by
/// [`ChatSession`](crate::ChatSession) as a request is dispatched and settled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputController {
    draft: String,
    busy: bool,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Non-blank draft and nothing in flight.
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.draft.trim().is_empty()
    }

    /// Takes the draft verbatim (untrimmed) and marks the controller busy.
    /// Returns `None` and leaves everything untouched when the gate is closed.
    pub(crate) fn take_for_dispatch(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        self.busy = true;
        Some(std::mem::take(&mut self.draft))
    }

    pub(crate) fn release(&mut self) {
        self.busy = false;
    }
}
