//! In-memory queue of pending envelopes.
//!
//! The buffer itself is a plain ordered collection; callers share it behind
//! an `Arc<Mutex<_>>` so that `append` and `drain_all` are observed as
//! indivisible steps by all concurrent loggers. The drained batch preserves
//! insertion order, and each envelope ends up in exactly one drain result.

use crate::envelope::Envelope;

#[derive(Debug, Default)]
pub struct EventBuffer {
    entries: Vec<Envelope>,
}

impl EventBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an envelope at the tail and return the new length, so the
    /// caller can evaluate the flush threshold without a second locked read.
    pub fn append(&mut self, envelope: Envelope) -> usize {
        self.entries.push(envelope);
        self.entries.len()
    }

    /// Take the entire current contents in insertion order, leaving the
    /// buffer empty. One indivisible swap.
    pub fn drain_all(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.entries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
