//! espool-health: per-node health tracking for the espool node pool.
//!
//! Each pooled node owns a `NodeHealth`. The transport layer reports
//! request outcomes into it, and a periodic tick aggregates the counters
//! of the current window against the configured `HealthPolicy`.
//!
//! # Danger zone
//!
//! ```text
//!            record(Failure) x failure_threshold
//!            or tick with failure ratio >= failure_ratio
//!   healthy ───────────────────────────────────────────► danger zone
//!      ▲                                                      │
//!      └──────────────── cooldown_ticks ticks ────────────────┘
//! ```
//!
//! A node in the danger zone receives no traffic, so it cannot earn its
//! way back through successes. Recovery is driven by ticks alone.

pub mod tracker;

pub use tracker::{Aggregation, NodeHealth, Outcome, Transition, WindowCounts};
