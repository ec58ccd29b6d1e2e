//! The analytics core: pure, synchronous functions over already-fetched
//! data. No module here does I/O or holds state between calls; the
//! [`ProgressService`](crate::ProgressService) fetches once and runs these
//! in sequence.
//!
//! # Modules
//!
//! - [`progress`]: per-metric daily progress against the active plan
//! - [`guidance`]: call-to-action text for a day's unmet metrics
//! - [`range`]: per-day aggregates across a date range
//! - [`trend`]: per-meal trend averages, direction, and narratives
//! - [`streak`]: consecutive logged-meal days ending at the range end

pub mod guidance;
pub mod progress;
pub mod range;
pub mod streak;
pub mod trend;
