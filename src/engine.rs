//! Reduction engine.
//!
//! This module drives the multi-round linking of a node sequence into a
//! [`Meaning`](crate::Meaning). The round logic lives in `src/engine/`
//! submodules while the public paths stay flat (`crate::engine::Reducer`,
//! `crate::engine::RoundObserver`).
//!
//! ## How the parts work together
//!
//! ```text
//! nodes ──┐
//!         v
//!   Reducer::reduce (reducer.rs)
//!     round 0: walk adjacent pairs left to right
//!       - hide filter gate      (previous pair's `hideFilter`)
//!       - Grammar::obtain       (binding.rs / grammar.rs)
//!       - Binding::bind + controls -> carry source? skip? filter?
//!     round 1..: survivors of the previous round
//!     stop when nothing survives (or the round limit is hit)
//!         │
//!         v
//!   Meaning::new (dedup + source index)
//! ```
//!
//! Every decision is reported to a [`RoundObserver`] (observer.rs) instead of
//! being logged inline; `LogObserver` forwards to the `log` facade and
//! `RecordingObserver` collects [`RoundMetrics`] (metrics.rs).
//!
//! ## Debugging
//!
//! Run the CLI with `LINKFORM_DEBUG_ROUNDS=1` (or `RUST_LOG=linkform=trace`) to
//! print per-pair decisions.

#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/observer.rs"]
mod observer;
#[path = "engine/reducer.rs"]
mod reducer;
#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use metrics::{ReductionMetrics, RoundMetrics};
pub use observer::{LogObserver, NoopObserver, PairEvent, RecordingObserver, RoundObserver};
pub use reducer::Reducer;
