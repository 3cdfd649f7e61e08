//! # Global runtime configuration.
//!
//! Provides [`Config`], the centralized defaults applied by a
//! [`Brigade`](crate::Brigade) when wiring stations to its bus.
//!
//! Kept deliberately small: the central priority queue is unbounded by
//! design, so the only tunable is the per-station inbox bound.

/// Runtime defaults for a brigade.
///
/// ## Field semantics
/// - `inbox_capacity`: bound of each station's inbox, applied when the
///   station does not override [`Station::inbox_capacity`](crate::Station::inbox_capacity).
///   When an inbox is full, further deliveries to that station are dropped
///   with a warning (best-effort, at-most-once delivery; the publisher is
///   never blocked or notified).
#[derive(Clone, Debug)]
pub struct Config {
    /// Default bounded capacity of a station inbox (min 1; clamped).
    pub inbox_capacity: usize,
}

impl Config {
    /// Returns the inbox capacity clamped to a minimum of 1.
    ///
    /// A zero-capacity inbox would reject every delivery; station actors
    /// use this value when creating their channel.
    #[inline]
    pub fn inbox_capacity_clamped(&self) -> usize {
        self.inbox_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration: `inbox_capacity = 100`.
    fn default() -> Self {
        Self {
            inbox_capacity: 100,
        }
    }
}
