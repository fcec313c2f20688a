use std::sync::Arc;

/// Read-only handle on the process-wide session identifier.
///
/// Built once at startup and handed to the dispatcher; nothing downstream can
/// rotate or rewrite it. Clones share the same string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    id: Arc<str>,
}

impl SessionContext {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when no identifier was supplied at startup.
    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identifier() {
        let ctx = SessionContext::new("abc-123");
        let other = ctx.clone();
        assert_eq!(other.id(), "abc-123");
        assert!(!ctx.is_anonymous());
        assert!(SessionContext::new("").is_anonymous());
    }
}
