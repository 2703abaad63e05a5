//! Streaming session state.

use std::collections::VecDeque;
use ulid::Ulid;

/// One end-to-end attempt to satisfy a streamed generation request.
///
/// Owned exclusively by the request handler that created it. Once
/// `commit` is called the model queue is abandoned: partial output has
/// already reached the consumer, so switching models would corrupt the
/// document being assembled downstream.
#[derive(Debug)]
pub struct StreamSession {
    id: Ulid,
    remaining: VecDeque<usize>,
    current: Option<String>,
    committed: bool,
    closed: bool,
}

impl StreamSession {
    /// Create a session over a priority list of `len` providers.
    pub fn new(len: usize) -> Self {
        Self {
            id: Ulid::new(),
            remaining: (0..len).collect(),
            current: None,
            committed: false,
            closed: false,
        }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    /// Next provider index to try, or `None` once committed or closed.
    pub fn next(&mut self) -> Option<usize> {
        if self.committed || self.closed {
            return None;
        }
        self.remaining.pop_front()
    }

    pub fn set_current(&mut self, model: &str) {
        self.current = Some(model.to_string());
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Lock the session to the current model.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    pub fn committed(&self) -> bool {
        self.committed
    }

    /// Mark the caller as disconnected; no further attempts are made.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_the_priority_list_in_order() {
        let mut session = StreamSession::new(3);
        assert_eq!(session.next(), Some(0));
        assert_eq!(session.next(), Some(1));
        assert_eq!(session.next(), Some(2));
        assert_eq!(session.next(), None);
    }

    #[test]
    fn test_commit_stops_fallback() {
        let mut session = StreamSession::new(3);
        assert_eq!(session.next(), Some(0));
        session.commit();
        assert!(session.committed());
        assert_eq!(session.next(), None);
    }

    #[test]
    fn test_close_stops_fallback() {
        let mut session = StreamSession::new(2);
        session.close();
        assert_eq!(session.next(), None);
    }
}
