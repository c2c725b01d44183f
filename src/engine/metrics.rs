//! Reduction metrics.
//!
//! Collected by [`RecordingObserver`](super::RecordingObserver) for the
//! verbose API and the CLI report. The plain reduction path never allocates
//! these.

use std::time::Duration;

/// What one round did.
#[derive(Debug, Default, Clone)]
pub struct RoundMetrics {
    /// Zero-based round number.
    pub round: usize,
    /// Elapsed time for the round.
    pub duration: Duration,
    /// Nodes in the round's input sequence.
    pub nodes_in: usize,
    /// `Extra` signatures of the input sequence joined with `>`.
    pub signature: String,
    /// Adjacent pairs that were queried against the grammar.
    pub pairs_evaluated: usize,
    /// Pairs that produced a link.
    pub pairs_bound: usize,
    /// Size of the link accumulator after the round.
    pub links_total: usize,
    /// Nodes carried into the next round.
    pub carried: usize,
    /// Link descriptions formed this round.
    pub links: Vec<String>,
}

/// Per-round metrics for one complete reduction.
#[derive(Debug, Default, Clone)]
pub struct ReductionMetrics {
    pub total: Duration,
    pub rounds: Vec<RoundMetrics>,
}
