//! Lexical nodes.
//!
//! A [`Node`] is an immutable view of one lexical entry: identity (`id` +
//! `locale`), surface `symbol`, and the ordered grammatical [`FlagMap`]. Nodes
//! are compared and hashed by identity only, so the sense variants produced by
//! [`Node::expand`] all count as "the same word".
//!
//! During a reduction nodes are shared through `Arc<Node>`: the working
//! sequence and every [`Link`](crate::Link) endpoint point at the same
//! allocation, so rebuilding the sequence each round never invalidates a link.

use crate::error::{Error, Result};
use crate::lexicon::{FlagMap, LexicalData, LexicalStore};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Flag key given to pseudo nodes.
pub const PSEUDO_FLAG_KEY: &str = "-1";
/// Flag value given to pseudo nodes.
pub const PSEUDO_FLAG_VALUE: &str = "Bz";

/// How much of the first flag [`Node::signature`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// First character of the flag key.
    Minimal,
    /// The flag value.
    Extra,
    /// `value[key]`.
    #[default]
    Full,
}

#[derive(Debug, Clone)]
pub struct Node {
    data: LexicalData,
}

impl Node {
    /// Wrap already-loaded lexical data.
    pub fn from_data(data: LexicalData) -> Self {
        Node { data }
    }

    /// Load the node for `(locale, id)` from `store`. `None` means the word is
    /// out of vocabulary.
    pub fn obtain(store: &dyn LexicalStore, locale: &str, id: &str) -> Option<Node> {
        store.load(locale, id).map(Node::from_data)
    }

    /// Persist `data` and hand back the node as the store now sees it.
    pub fn create(store: &dyn LexicalStore, data: &LexicalData) -> Result<Node> {
        store.save(data)?;
        Node::obtain(store, &data.locale, &data.id)
            .ok_or_else(|| Error::NotPersisted { locale: data.locale.clone(), id: data.id.clone() })
    }

    /// Build an in-memory node for a word with no dictionary entry
    /// (punctuation, unknown tokens). It carries a single placeholder flag.
    pub fn build_pseudo(id: &str, locale: &str, symbol: &str) -> Node {
        let mut flags = FlagMap::new();
        flags.insert(PSEUDO_FLAG_KEY, PSEUDO_FLAG_VALUE);
        Node::from_data(LexicalData::new(id, locale, symbol, flags))
    }

    pub fn exists(store: &dyn LexicalStore, locale: &str, id: &str) -> bool {
        store.exists(locale, id)
    }

    /// Split a node with N flags into N nodes carrying one flag each, in flag
    /// order.
    pub fn expand(&self) -> Vec<Node> {
        self.data
            .flags
            .iter()
            .map(|(key, value)| {
                let mut flags = FlagMap::new();
                flags.insert(key, value);
                self.with_flags(flags)
            })
            .collect()
    }

    /// Rebind to the `index`-th flag only.
    pub fn variant(&self, index: usize) -> Option<Node> {
        let (key, value) = self.data.flags.nth(index)?;
        let mut flags = FlagMap::new();
        flags.insert(key, value);
        Some(self.with_flags(flags))
    }

    fn with_flags(&self, flags: FlagMap) -> Node {
        Node::from_data(LexicalData::new(&self.data.id, &self.data.locale, &self.data.symbol, flags))
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn locale(&self) -> &str {
        &self.data.locale
    }

    pub fn symbol(&self) -> &str {
        &self.data.symbol
    }

    pub fn flags(&self) -> &FlagMap {
        &self.data.flags
    }

    pub fn data(&self) -> &LexicalData {
        &self.data
    }

    /// Compact signature built from the first flag only. Nodes without flags
    /// render as an empty string.
    pub fn signature(&self, verbosity: Verbosity) -> String {
        let Some((key, value)) = self.data.flags.first() else {
            return String::new();
        };
        match verbosity {
            Verbosity::Minimal => key.chars().next().map(String::from).unwrap_or_default(),
            Verbosity::Extra => value.to_string(),
            Verbosity::Full => format!("{value}[{key}]"),
        }
    }

    /// Signatures of `nodes` joined with `>`.
    pub fn signature_of(nodes: &[impl AsRef<Node>], verbosity: Verbosity) -> String {
        nodes.iter().map(|n| n.as_ref().signature(verbosity)).collect::<Vec<_>>().join(">")
    }

    /// `<locale>,<id>`, the node half of the canonical link text.
    pub fn repr(&self) -> String {
        format!("{},{}", self.data.locale, self.data.id)
    }
}

impl AsRef<Node> for Node {
    fn as_ref(&self) -> &Node {
        self
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.data.id == other.data.id && self.data.locale == other.data.locale
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.id.hash(state);
        self.data.locale.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ({})]", self.data.symbol, self.signature(Verbosity::Extra))
    }
}
