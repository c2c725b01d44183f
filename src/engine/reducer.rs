//! Round-by-round reduction.
//!
//! Each round walks the current node sequence pair by pair, strictly left to
//! right:
//!
//! ```text
//! round n:   [A] [B] [C] [D]
//!             └─┬─┘           (A,B) bound, skipWord=yes -> jump past B
//!                     └─┬─┘   (C,D) bound
//! survivors: sources of bound pairs that were not hidden
//! round n+1: survivors ...
//! ```
//!
//! A pair's control attributes only affect pairs processed after it. The
//! per-round state (`RoundState`) is reset at the start of every round.
//!
//! Because only link sources are ever carried forward and the last node of a
//! round is never a pair's left side, a round of N nodes leaves at most N - 1
//! survivors, so a sequence of N nodes settles within N rounds. That is the
//! round limit unless `Options::max_rounds` sets a different one.

use super::observer::{PairEvent, RoundObserver};
use crate::api::Options;
use crate::binding::Grammar;
use crate::error::{Error, Result};
use crate::link::Link;
use crate::meaning::Meaning;
use crate::node::{Node, Verbosity};
use std::sync::Arc;

/// Drives rounds until nothing survives.
pub struct Reducer<'a> {
    grammar: &'a dyn Grammar,
    options: &'a Options,
}

/// Carry-over between pairs of one round.
#[derive(Debug, Default)]
struct RoundState {
    /// Substrings installed by a previous pair's `hideFilter`.
    hide_filter: Option<Vec<String>>,
    /// The current left node matched the filter.
    hide_this: bool,
    /// The previous bound pair asked to hide the next one (`hideNext`).
    hide_other: bool,
}

impl<'a> Reducer<'a> {
    pub fn new(grammar: &'a dyn Grammar, options: &'a Options) -> Self {
        Reducer { grammar, options }
    }

    /// Reduce `nodes`, appending every formed link to `links`.
    ///
    /// - `Ok(Some(meaning))`: links were formed and no node survived the last
    ///   round.
    /// - `Ok(None)`: a round ended with an empty accumulator.
    /// - `Err(Error::DidNotConverge)`: the round limit was reached and nodes
    ///   were still queued.
    pub fn reduce(
        &self,
        links: &mut Vec<Link>,
        mut nodes: Vec<Arc<Node>>,
        observer: &mut dyn RoundObserver,
    ) -> Result<Option<Meaning>> {
        let limit = self.options.max_rounds.unwrap_or(nodes.len().max(1));
        let mut round = 0;

        loop {
            if round >= limit {
                log::warn!("event=reduction_diverged rounds={} remaining={}", round, nodes.len());
                return Err(Error::DidNotConverge { rounds: round, remaining: nodes.len() });
            }

            observer.round_started(round, &nodes);
            let survivors = self.run_round(round, links, &nodes, observer);
            observer.round_finished(round, links.len(), &survivors);

            if links.is_empty() {
                return Ok(None);
            }
            if survivors.is_empty() {
                return Ok(Meaning::new(links.clone(), self.options.source_index));
            }

            nodes = survivors;
            round += 1;
        }
    }

    /// One pass over adjacent pairs. Returns the nodes carried into the next
    /// round.
    fn run_round(
        &self,
        round: usize,
        links: &mut Vec<Link>,
        nodes: &[Arc<Node>],
        observer: &mut dyn RoundObserver,
    ) -> Vec<Arc<Node>> {
        let mut survivors = Vec::new();
        let mut state = RoundState::default();

        // A two-node sequence is the single pair (front, back); a single node
        // has no pair at all. Both fall out of the general walk.
        let mut i = 0;
        while i + 1 < nodes.len() {
            let (left, right) = (&nodes[i], &nodes[i + 1]);

            if let Some(filter) = &state.hide_filter {
                let signature = left.signature(Verbosity::Extra);
                if filter.iter().any(|f| signature.contains(f.as_str())) {
                    state.hide_this = true;
                    observer.filter_matched(round, left, filter);
                } else {
                    state.hide_filter = None;
                    state.hide_this = false;
                    observer.filter_broken(round, left);
                }
            }

            let Some(binding) = self.grammar.obtain(left, right) else {
                observer.pair_unbound(round, left, right);
                i += 1;
                continue;
            };

            let link = binding.bind(left, right);
            let controls = binding.controls();

            let carried = !state.hide_this && !state.hide_other && !controls.hide();
            if carried {
                survivors.push(Arc::clone(link.source()));
            }
            state.hide_other = controls.hide_next();

            observer.pair_bound(&PairEvent { round, rule: &binding.rule, link: &link, controls: &controls, carried });
            links.push(link);

            if controls.skip_word() {
                i += 1;
            }
            if let Some(filter) = controls.hide_filter {
                state.hide_filter = Some(filter);
            }
            i += 1;
        }

        survivors
    }
}
