//! One-tick deferred action queue.
//!
//! Actions pushed during a tick are dispatched at the start of the next
//! one, after that tick's outputs have been published, so a host that
//! recomputes lazily sees a complete output set when it handles them.

use serde::{Deserialize, Serialize};

/// Side-effecting request to the host that must not run mid-tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Regenerate rest positions from the live point data.
    RegenerateRestPositions,
}

/// Pending actions, deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeferredQueue {
    pending: Vec<DeferredAction>,
}

impl DeferredQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` for the next tick. Returns false if it was already
    /// queued.
    pub fn push(&mut self, action: DeferredAction) -> bool {
        if self.pending.contains(&action) {
            return false;
        }
        self.pending.push(action);
        true
    }

    /// Take everything queued so far, leaving the queue empty.
    pub fn take_due(&mut self) -> Vec<DeferredAction> {
        std::mem::take(&mut self.pending)
    }

    /// Whether `action` is queued.
    #[must_use]
    pub fn contains(&self, action: DeferredAction) -> bool {
        self.pending.contains(&action)
    }

    /// Number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_deduplicates() {
        let mut queue = DeferredQueue::new();
        assert!(queue.push(DeferredAction::RegenerateRestPositions));
        assert!(!queue.push(DeferredAction::RegenerateRestPositions));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn take_due_drains() {
        let mut queue = DeferredQueue::new();
        let _ = queue.push(DeferredAction::RegenerateRestPositions);
        assert_eq!(
            queue.take_due(),
            vec![DeferredAction::RegenerateRestPositions]
        );
        assert!(queue.is_empty());
        assert!(queue.take_due().is_empty());
    }
}
