//! # Central priority queue with drain accounting.
//!
//! A binary heap of [`Envelope`]s ordered by `(priority rank, insertion
//! sequence)`, shared between publishers and the single dispatch worker.
//!
//! ## Rules
//! - **Non-suspending push**: `push()` takes the lock, assigns the next
//!   sequence number, and returns; it never awaits, so sequence assignment
//!   is race-free even with many concurrent publishers.
//! - **Conceptually unbounded**: publishers are never blocked or refused.
//! - **Drain accounting**: every push increments an `outstanding` counter;
//!   the dispatcher calls [`PriorityQueue::task_done`] after it finishes a
//!   dispatch step. [`PriorityQueue::join`] suspends until the counter hits
//!   zero — the "all currently enqueued items processed" condition.
//!
//! The lock is a short-critical-section `parking_lot::Mutex`, never held
//! across an await.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::messages::{Envelope, Message};

struct State {
    heap: BinaryHeap<Reverse<Envelope>>,
    next_seq: u64,
    outstanding: usize,
}

/// Priority-ordered queue feeding the bus dispatch loop.
pub(crate) struct PriorityQueue {
    state: Mutex<State>,
    /// Signaled on push; wakes the dispatcher's empty-queue wait.
    pushed: Notify,
    /// Signaled when `outstanding` reaches zero; wakes `join` callers.
    drained: Notify,
}

impl PriorityQueue {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                heap: BinaryHeap::new(),
                next_seq: 0,
                outstanding: 0,
            }),
            pushed: Notify::new(),
            drained: Notify::new(),
        }
    }

    /// Enqueues a message, assigning its tie-break sequence number.
    pub(crate) fn push(&self, message: Message) {
        {
            let mut state = self.state.lock();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.heap.push(Reverse(Envelope::new(seq, message)));
            state.outstanding += 1;
        }
        self.pushed.notify_one();
    }

    /// Dequeues the lowest `(rank, seq)` envelope, suspending while empty.
    pub(crate) async fn pop(&self) -> Envelope {
        loop {
            // A push landing between the check and the await leaves a
            // stored permit on `pushed`, so the await completes anyway.
            let pushed = self.pushed.notified();
            if let Some(envelope) = self.try_pop() {
                return envelope;
            }
            pushed.await;
        }
    }

    fn try_pop(&self) -> Option<Envelope> {
        self.state.lock().heap.pop().map(|Reverse(envelope)| envelope)
    }

    /// Marks one dequeued item as fully processed.
    pub(crate) fn task_done(&self) {
        let idle = {
            let mut state = self.state.lock();
            state.outstanding = state.outstanding.saturating_sub(1);
            state.outstanding == 0
        };
        if idle {
            self.drained.notify_waiters();
        }
    }

    /// Suspends until every item enqueued so far has been processed.
    ///
    /// Returns immediately if the queue is already idle. Does not guard
    /// against concurrent pushes; callers wanting a precise quiescence
    /// point must stop producers first.
    pub(crate) async fn join(&self) {
        loop {
            // `notify_waiters` wakes only already-registered waiters, so
            // interest must be registered before the counter check.
            let drained = self.drained.notified();
            tokio::pin!(drained);
            drained.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            drained.await;
        }
    }

    /// Number of items enqueued but not yet fully processed.
    pub(crate) fn outstanding(&self) -> usize {
        self.state.lock().outstanding
    }
}
