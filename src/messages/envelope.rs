//! # Priority-ordering wrapper for queued messages.
//!
//! [`Envelope`] pairs a [`Message`] with its priority rank and an
//! insertion sequence number. The comparison key is `(rank, seq)`: lower
//! rank dispatches first, and `seq` breaks ties in insertion order, giving
//! a total order with FIFO behavior among equal priorities (no starvation
//! from unstable comparison).
//!
//! The sequence counter lives inside the owning queue's lock, so each bus
//! orders its own traffic independently; there is no process-wide state.
//! An envelope exists only between enqueue and dequeue.

use std::cmp::Ordering;

use super::message::Message;

/// Internal wrapper giving a [`Message`] a total queue order.
#[derive(Debug)]
pub(crate) struct Envelope {
    /// Snapshot of `message.priority.rank()` at enqueue time.
    rank: u8,
    /// Monotonic insertion counter assigned under the queue lock.
    seq: u64,
    /// The wrapped message.
    pub(crate) message: Message,
}

impl Envelope {
    pub(crate) fn new(seq: u64, message: Message) -> Self {
        Self {
            rank: message.priority.rank(),
            seq,
            message,
        }
    }

    #[inline]
    fn key(&self) -> (u8, u64) {
        (self.rank, self.seq)
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Envelope {}

impl PartialOrd for Envelope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Envelope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::message::Priority;

    fn envelope(seq: u64, priority: Priority) -> Envelope {
        let message = Message::new("a", "b", "act")
            .unwrap()
            .with_priority(priority);
        Envelope::new(seq, message)
    }

    #[test]
    fn lower_rank_sorts_first() {
        let critical = envelope(10, Priority::Critical);
        let low = envelope(1, Priority::Low);
        assert!(critical < low, "rank dominates sequence");
    }

    #[test]
    fn equal_rank_breaks_ties_by_sequence() {
        let first = envelope(1, Priority::Normal);
        let second = envelope(2, Priority::Normal);
        assert!(first < second);
    }

    #[test]
    fn ordering_is_transitive_across_ranks() {
        let a = envelope(3, Priority::Critical);
        let b = envelope(2, Priority::High);
        let c = envelope(1, Priority::Normal);
        assert!(a < b && b < c && a < c);
    }
}
