//! Rule-driven syntactic linking.
//!
//! Given the lexical nodes of one sentence, the linker binds adjacent nodes
//! into directed [`Link`]s over repeated rounds until no node is left to carry
//! forward, then packages the links as a [`Meaning`].
//!
//! ```text
//! ids ──> Node::obtain / build_pseudo ──> Node::expand (senses)
//!                                              │
//!                 Grammar::obtain per pair <───┤ engine::Reducer rounds
//!                                              v
//!                                     Meaning (dedup + source index)
//! ```
//!
//! The lexical store ([`LexicalStore`]) and the rule engine ([`Grammar`]) are
//! traits; [`MemoryLexicon`] and [`RuleSet`] are the bundled implementations.

#[macro_use]
mod macros;
mod api;
mod binding;
pub mod engine;
mod error;
mod grammar;
mod lexicon;
mod link;
mod meaning;
mod node;
mod rules;

pub use api::{
    CombinationTrace, DEFAULT_LOCALE, Options, ParseDetails, ParseResult, ParseResultVerbose, Reading, default_grammar,
    default_lexicon, parse, parse_verbose_with, parse_with,
};
pub use binding::{
    ATTR_HIDE, ATTR_HIDE_FILTER, ATTR_HIDE_NEXT, ATTR_SKIP_WORD, Binding, ControlFlags, Controls, Grammar,
};
pub use error::{Error, Result};
pub use grammar::{BindingRule, RuleSet, RuleSpec};
pub use lexicon::{FlagMap, LexicalData, LexicalStore, MemoryLexicon};
pub use link::{CanonicalLink, Link};
pub use meaning::{Meaning, SourceIndexPolicy};
pub use node::{Node, PSEUDO_FLAG_KEY, PSEUDO_FLAG_VALUE, Verbosity};
