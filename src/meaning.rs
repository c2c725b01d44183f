//! The aggregate produced by a completed reduction.
//!
//! A [`Meaning`] only exists once the reduction reached a fixed point with at
//! least one link. Construction removes exact duplicate links (keeping the
//! first occurrence) and builds a source → link index whose conflict policy is
//! chosen by [`SourceIndexPolicy`].

use crate::api::Options;
use crate::binding::Grammar;
use crate::engine::{Reducer, RoundObserver};
use crate::error::Result;
use crate::link::Link;
use crate::node::Node;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Which link the source index keeps when one source has several outgoing
/// links. [`Meaning::is_linked_to`] always returns all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceIndexPolicy {
    KeepFirst,
    /// Later links overwrite earlier ones.
    #[default]
    KeepLast,
}

#[derive(Debug, Clone)]
pub struct Meaning {
    links: Vec<Link>,
    by_source: HashMap<Arc<Node>, usize>,
}

impl Meaning {
    /// Run the reduction over `nodes`, appending to `links`.
    ///
    /// Returns `Ok(None)` when no link could ever be formed.
    pub fn form(
        links: &mut Vec<Link>,
        nodes: Vec<Arc<Node>>,
        grammar: &dyn Grammar,
        options: &Options,
        observer: &mut dyn RoundObserver,
    ) -> Result<Option<Meaning>> {
        Reducer::new(grammar, options).reduce(links, nodes, observer)
    }

    /// Build from a link set. `None` for an empty set.
    pub fn new(links: Vec<Link>, policy: SourceIndexPolicy) -> Option<Meaning> {
        if links.is_empty() {
            return None;
        }

        let mut seen = HashSet::new();
        let links: Vec<Link> = links.into_iter().filter(|l| seen.insert(l.clone())).collect();

        let mut by_source = HashMap::new();
        for (idx, link) in links.iter().enumerate() {
            match policy {
                SourceIndexPolicy::KeepLast => {
                    by_source.insert(Arc::clone(link.source()), idx);
                }
                SourceIndexPolicy::KeepFirst => {
                    by_source.entry(Arc::clone(link.source())).or_insert(idx);
                }
            }
        }

        log::debug!("event=meaning_formed links={} sources={}", links.len(), by_source.len());
        Some(Meaning { links, by_source })
    }

    /// The last link formed.
    pub fn base(&self) -> &Link {
        // Never empty: `new` refuses empty link sets.
        &self.links[self.links.len() - 1]
    }

    /// All links, in formation order.
    pub fn siblings(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links whose source is `node`.
    pub fn is_linked_to(&self, node: &Node) -> Vec<&Link> {
        self.links.iter().filter(|l| **l.source() == *node).collect()
    }

    /// Links whose destination is `node`.
    pub fn is_linked_by(&self, node: &Node) -> Vec<&Link> {
        self.links.iter().filter(|l| **l.destination() == *node).collect()
    }

    /// The indexed outgoing link of `node`.
    pub fn link_from(&self, node: &Node) -> Option<&Link> {
        self.by_source.get(node).map(|&idx| &self.links[idx])
    }

    /// Distinct source nodes, in order of first appearance.
    pub fn sources(&self) -> Vec<&Arc<Node>> {
        let mut seen = HashSet::new();
        self.links.iter().map(Link::source).filter(|s| seen.insert(Arc::clone(s))).collect()
    }

    /// One described link per line.
    pub fn to_text(&self) -> String {
        self.links.iter().map(Link::describe).collect::<Vec<_>>().join("\n")
    }
}
