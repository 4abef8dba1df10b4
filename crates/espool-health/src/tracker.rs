//! Danger-zone tracking for a single node.
//!
//! Outcome counters are plain atomics so the transport layer never
//! contends with selection. Zone transitions are serialized by a mutex
//! scoped to the one node.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use espool_core::HealthPolicy;

/// Result of one request, as reported by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Zone change caused by a `record` or `aggregate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Entered,
    Cleared,
}

/// Outcome counts accumulated since the last tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowCounts {
    pub successes: u32,
    pub failures: u32,
}

impl WindowCounts {
    pub fn total(&self) -> u32 {
        self.successes.saturating_add(self.failures)
    }

    /// Failure share of the window; zero for an empty window.
    pub fn failure_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            f64::from(self.failures) / f64::from(total)
        }
    }
}

/// What one aggregation step saw and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregation {
    pub window: WindowCounts,
    pub transition: Transition,
}

#[derive(Debug, Default)]
struct Zone {
    in_danger: bool,
    cooldown_remaining: u32,
}

/// Live health state of one pooled node.
#[derive(Debug)]
pub struct NodeHealth {
    enabled: bool,
    policy: HealthPolicy,
    successes: AtomicU32,
    failures: AtomicU32,
    /// Mirror of `zone.in_danger` for lock-free eligibility reads.
    in_danger_zone: AtomicBool,
    zone: Mutex<Zone>,
    ticks: AtomicU64,
}

impl NodeHealth {
    /// Fresh baseline: no counts, outside the danger zone.
    pub fn new(enabled: bool, policy: HealthPolicy) -> Self {
        Self {
            enabled,
            policy,
            successes: AtomicU32::new(0),
            failures: AtomicU32::new(0),
            in_danger_zone: AtomicBool::new(false),
            zone: Mutex::new(Zone::default()),
            ticks: AtomicU64::new(0),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn in_danger_zone(&self) -> bool {
        self.in_danger_zone.load(Ordering::Acquire)
    }

    /// `enabled AND NOT in_danger_zone`.
    pub fn is_eligible(&self) -> bool {
        self.enabled && !self.in_danger_zone()
    }

    /// Counts of the current window, without resetting them.
    pub fn window(&self) -> WindowCounts {
        WindowCounts {
            successes: self.successes.load(Ordering::Acquire),
            failures: self.failures.load(Ordering::Acquire),
        }
    }

    /// Number of aggregation steps run on this node.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Record one request outcome.
    ///
    /// A failure that brings the window's failure count up to
    /// `failure_threshold` trips the node right away instead of waiting
    /// for the next tick.
    pub fn record(&self, outcome: Outcome) -> Transition {
        match outcome {
            Outcome::Success => {
                self.successes.fetch_add(1, Ordering::AcqRel);
                Transition::Unchanged
            }
            Outcome::Failure => {
                let failures = self.failures.fetch_add(1, Ordering::AcqRel).saturating_add(1);
                if failures < self.policy.failure_threshold || self.in_danger_zone() {
                    return Transition::Unchanged;
                }

                let mut zone = self.zone();
                if zone.in_danger {
                    return Transition::Unchanged;
                }
                self.trip(&mut zone);
                debug!(
                    failures,
                    threshold = self.policy.failure_threshold,
                    "failure threshold reached, node entered danger zone"
                );
                Transition::Entered
            }
        }
    }

    /// Close the current window: take and reset both counters, then
    /// either run down the cooldown of a tripped node or evaluate the
    /// window's failure ratio against the policy.
    pub fn aggregate(&self) -> Aggregation {
        let window = WindowCounts {
            successes: self.successes.swap(0, Ordering::AcqRel),
            failures: self.failures.swap(0, Ordering::AcqRel),
        };
        self.ticks.fetch_add(1, Ordering::AcqRel);

        let mut zone = self.zone();
        let transition = if zone.in_danger {
            zone.cooldown_remaining = zone.cooldown_remaining.saturating_sub(1);
            if zone.cooldown_remaining == 0 {
                zone.in_danger = false;
                self.in_danger_zone.store(false, Ordering::Release);
                debug!("cooldown elapsed, node left danger zone");
                Transition::Cleared
            } else {
                Transition::Unchanged
            }
        } else if self.window_trips(&window) {
            self.trip(&mut zone);
            debug!(
                failures = window.failures,
                total = window.total(),
                ratio = self.policy.failure_ratio,
                "failure ratio reached, node entered danger zone"
            );
            Transition::Entered
        } else {
            Transition::Unchanged
        };

        Aggregation { window, transition }
    }

    fn window_trips(&self, window: &WindowCounts) -> bool {
        let total = window.total();
        total > 0
            && total >= self.policy.min_requests
            && window.failure_ratio() >= self.policy.failure_ratio
    }

    fn trip(&self, zone: &mut Zone) {
        zone.in_danger = true;
        zone.cooldown_remaining = self.policy.cooldown_ticks.max(1);
        self.in_danger_zone.store(true, Ordering::Release);
    }

    fn zone(&self) -> MutexGuard<'_, Zone> {
        self.zone.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
