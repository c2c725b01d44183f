//! Rule-based [`Grammar`] implementation.
//!
//! A [`RuleSet`] is an ordered list of [`BindingRule`]s indexed by locale.
//! Each rule carries two regexes that are matched against the `Extra`
//! signature (first flag value) of the left and right node of a pair. The
//! first rule in declaration order whose locale and both patterns match wins.
//!
//! ## Invariants
//!
//! - Indices stored in `RuleSet::by_locale` point into `RuleSet::rules`; the
//!   two are only ever built together.
//! - Rule order is significant and preserved from the input.

use crate::binding::{Binding, Grammar};
use crate::error::{Error, Result};
use crate::node::{Node, Verbosity};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Rule identifier (index into `RuleSet::rules`).
pub(crate) type RuleId = usize;

/// One pairwise binding rule.
#[derive(Debug, Clone)]
pub struct BindingRule {
    pub name: String,
    pub locale: String,
    /// Matched against the left node's signature.
    pub source: Regex,
    /// Matched against the right node's signature.
    pub destination: Regex,
    /// Link type of the produced link.
    pub flags: String,
    /// Link right-to-left instead of left-to-right.
    pub reverse: bool,
    /// Control attributes (`hide`, `hideNext`, `skipWord`, `hideFilter`, ...).
    pub attributes: HashMap<String, String>,
}

impl BindingRule {
    fn matches(&self, left: &str, right: &str) -> bool {
        self.source.is_match(left) && self.destination.is_match(right)
    }

    fn to_binding(&self) -> Binding {
        Binding {
            rule: self.name.clone(),
            flags: self.flags.clone(),
            locale: self.locale.clone(),
            reverse: self.reverse,
            attributes: self.attributes.clone(),
        }
    }
}

/// Serialized form of a [`BindingRule`], as found in grammar files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub locale: String,
    pub source: String,
    pub destination: String,
    pub flags: String,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl RuleSpec {
    pub fn compile(self) -> Result<BindingRule> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| Error::InvalidPattern { rule: self.name.clone(), source })
        };
        Ok(BindingRule {
            source: compile(&self.source)?,
            destination: compile(&self.destination)?,
            name: self.name,
            locale: self.locale,
            flags: self.flags,
            reverse: self.reverse,
            attributes: self.attributes,
        })
    }
}

#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<BindingRule>,
    by_locale: HashMap<String, Vec<RuleId>>,
}

impl RuleSet {
    pub fn new(rules: Vec<BindingRule>) -> Self {
        let mut by_locale: HashMap<String, Vec<RuleId>> = HashMap::new();
        for (id, rule) in rules.iter().enumerate() {
            by_locale.entry(rule.locale.clone()).or_default().push(id);
        }
        RuleSet { rules, by_locale }
    }

    /// Parse a JSON array of [`RuleSpec`]s.
    pub fn from_json(text: &str) -> Result<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(text)?;
        let rules = specs.into_iter().map(RuleSpec::compile).collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn rules(&self) -> &[BindingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Grammar for RuleSet {
    fn obtain(&self, left: &Node, right: &Node) -> Option<Binding> {
        let ids = self.by_locale.get(left.locale())?;
        let (l, r) = (left.signature(Verbosity::Extra), right.signature(Verbosity::Extra));

        let rule = ids.iter().map(|&id| &self.rules[id]).find(|rule| rule.matches(&l, &r))?;
        log::trace!("event=rule_match rule=\"{}\" left={} right={}", rule.name, l, r);
        Some(rule.to_binding())
    }
}
