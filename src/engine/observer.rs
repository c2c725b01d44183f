//! Round observers.
//!
//! The reducer reports each decision through [`RoundObserver`] rather than
//! writing diagnostics itself. All methods default to no-ops so observers only
//! implement what they care about.

use super::metrics::{ReductionMetrics, RoundMetrics};
use crate::binding::Controls;
use crate::link::Link;
use crate::node::{Node, Verbosity};
use std::sync::Arc;
use std::time::Instant;

/// A pair that produced a link.
#[derive(Debug)]
pub struct PairEvent<'a> {
    pub round: usize,
    /// Name of the rule that matched.
    pub rule: &'a str,
    pub link: &'a Link,
    pub controls: &'a Controls,
    /// Whether the link's source goes on to the next round.
    pub carried: bool,
}

pub trait RoundObserver {
    fn round_started(&mut self, _round: usize, _nodes: &[Arc<Node>]) {}

    fn pair_bound(&mut self, _event: &PairEvent<'_>) {}

    fn pair_unbound(&mut self, _round: usize, _left: &Node, _right: &Node) {}

    /// `node` matched the active hide filter and is kept out of the next round.
    fn filter_matched(&mut self, _round: usize, _node: &Node, _filter: &[String]) {}

    /// `node` did not match the active hide filter, which is dropped.
    fn filter_broken(&mut self, _round: usize, _node: &Node) {}

    fn round_finished(&mut self, _round: usize, _links_total: usize, _survivors: &[Arc<Node>]) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RoundObserver for NoopObserver {}

/// Forwards events to the `log` facade as `event=... key=value` lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RoundObserver for LogObserver {
    fn round_started(&mut self, round: usize, nodes: &[Arc<Node>]) {
        log::debug!(
            "event=round_start round={} nodes={} signature={}",
            round,
            nodes.len(),
            Node::signature_of(nodes, Verbosity::Extra)
        );
    }

    fn pair_bound(&mut self, event: &PairEvent<'_>) {
        log::trace!(
            "event=pair_bound round={} rule=\"{}\" link={} carried={} hide_next={} skip_word={} hide_filter={:?}",
            event.round,
            event.rule,
            event.link.describe(),
            event.carried,
            event.controls.hide_next(),
            event.controls.skip_word(),
            event.controls.hide_filter,
        );
    }

    fn pair_unbound(&mut self, round: usize, left: &Node, right: &Node) {
        log::trace!("event=pair_unbound round={} left={} right={}", round, left, right);
    }

    fn filter_matched(&mut self, round: usize, node: &Node, filter: &[String]) {
        log::trace!("event=filter_hide round={} node={} filter={}", round, node, filter.join(","));
    }

    fn filter_broken(&mut self, round: usize, node: &Node) {
        log::trace!("event=filter_broken round={} node={}", round, node);
    }

    fn round_finished(&mut self, round: usize, links_total: usize, survivors: &[Arc<Node>]) {
        log::debug!("event=round_end round={} links={} survivors={}", round, links_total, survivors.len());
    }
}

/// Collects [`RoundMetrics`] for every round.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    metrics: ReductionMetrics,
    current: RoundMetrics,
    first_start: Option<Instant>,
    round_start: Option<Instant>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_metrics(self) -> ReductionMetrics {
        self.metrics
    }
}

impl RoundObserver for RecordingObserver {
    fn round_started(&mut self, round: usize, nodes: &[Arc<Node>]) {
        let now = Instant::now();
        self.first_start.get_or_insert(now);
        self.round_start = Some(now);
        self.current = RoundMetrics {
            round,
            nodes_in: nodes.len(),
            signature: Node::signature_of(nodes, Verbosity::Extra),
            ..RoundMetrics::default()
        };
    }

    fn pair_bound(&mut self, event: &PairEvent<'_>) {
        self.current.pairs_evaluated += 1;
        self.current.pairs_bound += 1;
        self.current.links.push(event.link.describe());
    }

    fn pair_unbound(&mut self, _round: usize, _left: &Node, _right: &Node) {
        self.current.pairs_evaluated += 1;
    }

    fn round_finished(&mut self, _round: usize, links_total: usize, survivors: &[Arc<Node>]) {
        self.current.links_total = links_total;
        self.current.carried = survivors.len();
        self.current.duration = self.round_start.map(|s| s.elapsed()).unwrap_or_default();
        self.metrics.total = self.first_start.map(|s| s.elapsed()).unwrap_or_default();
        self.metrics.rounds.push(std::mem::take(&mut self.current));
    }
}

/// Fan events out to two observers.
impl<A: RoundObserver, B: RoundObserver> RoundObserver for (A, B) {
    fn round_started(&mut self, round: usize, nodes: &[Arc<Node>]) {
        self.0.round_started(round, nodes);
        self.1.round_started(round, nodes);
    }

    fn pair_bound(&mut self, event: &PairEvent<'_>) {
        self.0.pair_bound(event);
        self.1.pair_bound(event);
    }

    fn pair_unbound(&mut self, round: usize, left: &Node, right: &Node) {
        self.0.pair_unbound(round, left, right);
        self.1.pair_unbound(round, left, right);
    }

    fn filter_matched(&mut self, round: usize, node: &Node, filter: &[String]) {
        self.0.filter_matched(round, node, filter);
        self.1.filter_matched(round, node, filter);
    }

    fn filter_broken(&mut self, round: usize, node: &Node) {
        self.0.filter_broken(round, node);
        self.1.filter_broken(round, node);
    }

    fn round_finished(&mut self, round: usize, links_total: usize, survivors: &[Arc<Node>]) {
        self.0.round_finished(round, links_total, survivors);
        self.1.round_finished(round, links_total, survivors);
    }
}
