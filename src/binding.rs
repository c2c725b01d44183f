//! Bindings: a grammar rule matched against an ordered pair of nodes.
//!
//! The reduction asks a [`Grammar`] whether `(left, right)` may be linked. A
//! `None` answer just means "no link for this pair". A [`Binding`] knows how
//! to materialize the [`Link`] and carries the rule's named control
//! attributes, which the reduction reads once through [`Binding::controls`].

use crate::link::Link;
use crate::node::Node;
use std::collections::HashMap;
use std::sync::Arc;

pub const ATTR_HIDE: &str = "hide";
pub const ATTR_HIDE_NEXT: &str = "hideNext";
pub const ATTR_SKIP_WORD: &str = "skipWord";
pub const ATTR_HIDE_FILTER: &str = "hideFilter";

bitflags::bitflags! {
    /// Boolean control attributes of a matched rule.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        /// Drop the link's source from the next round.
        const HIDE      = 1 << 0;
        /// Drop the source of the next bound pair from the next round.
        const HIDE_NEXT = 1 << 1;
        /// Do not re-evaluate this pair's destination as a source this round.
        const SKIP_WORD = 1 << 2;
    }
}

/// Control attributes parsed once per binding.
///
/// Empty or missing attributes take their defaults: `hide=no`,
/// `hideNext=no`, `skipWord=yes`, no hide filter. Values are compared
/// exactly: a source is carried only when `hide` is `no`, while `hideNext`
/// and `skipWord` only take effect on `yes`.
///
/// `hideFilter` is split on `,` with empty segments kept. An empty segment
/// is contained in every signature, so `"foo,"` hides every following node
/// until the filter is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub flags: ControlFlags,
    pub hide_filter: Option<Vec<String>>,
}

impl Default for Controls {
    fn default() -> Self {
        Controls { flags: ControlFlags::SKIP_WORD, hide_filter: None }
    }
}

impl Controls {
    pub fn hide(&self) -> bool {
        self.flags.contains(ControlFlags::HIDE)
    }

    pub fn hide_next(&self) -> bool {
        self.flags.contains(ControlFlags::HIDE_NEXT)
    }

    pub fn skip_word(&self) -> bool {
        self.flags.contains(ControlFlags::SKIP_WORD)
    }
}

/// A rule match for one ordered node pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Name of the rule that matched.
    pub rule: String,
    /// Link type written into the materialized link.
    pub flags: String,
    pub locale: String,
    /// Materialize the link right-to-left (source is the right node).
    pub reverse: bool,
    pub attributes: HashMap<String, String>,
}

impl Binding {
    /// Build the link for the pair this binding was obtained for.
    pub fn bind(&self, left: &Arc<Node>, right: &Arc<Node>) -> Link {
        let (source, destination) = if self.reverse { (right, left) } else { (left, right) };
        Link::form(Arc::clone(source), Arc::clone(destination), self.flags.clone(), self.locale.clone())
    }

    /// Raw attribute value, or `""` if the rule does not set it.
    pub fn attr_value(&self, name: &str) -> &str {
        self.attributes.get(name).map(String::as_str).unwrap_or("")
    }

    fn attr_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.attr_value(name) {
            "" => default,
            value => value,
        }
    }

    pub fn controls(&self) -> Controls {
        let mut flags = ControlFlags::empty();
        flags.set(ControlFlags::HIDE, self.attr_or(ATTR_HIDE, "no") != "no");
        flags.set(ControlFlags::HIDE_NEXT, self.attr_or(ATTR_HIDE_NEXT, "no") == "yes");
        flags.set(ControlFlags::SKIP_WORD, self.attr_or(ATTR_SKIP_WORD, "yes") == "yes");

        let filter = self.attr_value(ATTR_HIDE_FILTER);
        let hide_filter =
            if filter.is_empty() { None } else { Some(filter.split(',').map(str::to_string).collect()) };

        Controls { flags, hide_filter }
    }
}

/// Source of bindings. Implementations must be safe to share between
/// concurrently reduced sentences.
pub trait Grammar: Send + Sync {
    fn obtain(&self, left: &Node, right: &Node) -> Option<Binding>;
}
