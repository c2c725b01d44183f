//! Directed links between nodes and their canonical text form.
//!
//! ```text
//! <locale>,<source id>:<locale>,<destination id>:<flags>
//! en,dog:en,the:Ds
//! ```
//!
//! A link never owns its endpoints outright; it holds `Arc<Node>` handles into
//! the nodes of the reduction that produced it.

use crate::error::{Error, Result};
use crate::lexicon::LexicalStore;
use crate::node::Node;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    source: Arc<Node>,
    destination: Arc<Node>,
    flags: String,
    locale: String,
}

impl Link {
    /// Direct construction; nothing beyond storing the handles.
    pub fn form(
        source: Arc<Node>,
        destination: Arc<Node>,
        flags: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        Link { source, destination, flags: flags.into(), locale: locale.into() }
    }

    /// Decode canonical text, resolving both endpoints through `store`.
    pub fn from_canonical(text: &str, store: &dyn LexicalStore) -> Result<Link> {
        let parsed: CanonicalLink = text.parse()?;
        let resolve = |locale: &str, id: &str| {
            Node::obtain(store, locale, id)
                .map(Arc::new)
                .ok_or_else(|| Error::UnresolvedEndpoint { locale: locale.to_string(), id: id.to_string() })
        };
        let source = resolve(&parsed.source_locale, &parsed.source_id)?;
        let destination = resolve(&parsed.destination_locale, &parsed.destination_id)?;
        Ok(Link::form(source, destination, parsed.flags, parsed.source_locale))
    }

    pub fn source(&self) -> &Arc<Node> {
        &self.source
    }

    pub fn destination(&self) -> &Arc<Node> {
        &self.destination
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Human-oriented rendering: `(type: 'Ds') [dog (Nn)]->[the (Dd)]`.
    pub fn describe(&self) -> String {
        format!("(type: '{}') {}->{}", self.flags, self.source, self.destination)
    }
}

/// Canonical encoding.
impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source.repr(), self.destination.repr(), self.flags)
    }
}

/// The fields of a canonical link string, before the endpoints are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalLink {
    pub source_locale: String,
    pub source_id: String,
    pub destination_locale: String,
    pub destination_id: String,
    pub flags: String,
}

impl FromStr for CanonicalLink {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let malformed = |reason| Error::MalformedLink { text: text.to_string(), reason };

        let caps = crate::regex!(r"^([^:,]+),([^:]+):([^:,]+),([^:]+):([^:]+)$")
            .captures(text)
            .ok_or_else(|| malformed("expected '<locale>,<id>:<locale>,<id>:<flags>'"))?;
        let field = |i: usize| caps.get(i).map(|m| m.as_str().to_string()).ok_or_else(|| malformed("missing field"));

        Ok(CanonicalLink {
            source_locale: field(1)?,
            source_id: field(2)?,
            destination_locale: field(3)?,
            destination_id: field(4)?,
            flags: field(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{LexicalData, MemoryLexicon};

    fn store() -> MemoryLexicon {
        MemoryLexicon::with_entries([
            LexicalData::new("dog", "en", "dog", [("noun", "Nn")].into_iter().collect()),
            LexicalData::new("the", "en", "the", [("det", "Dd")].into_iter().collect()),
        ])
    }

    fn link(store: &MemoryLexicon) -> Link {
        let dog = Arc::new(Node::obtain(store, "en", "dog").unwrap());
        let the = Arc::new(Node::obtain(store, "en", "the").unwrap());
        Link::form(dog, the, "Ds", "en")
    }

    #[test]
    fn canonical_text_form() {
        let store = store();
        assert_eq!(link(&store).to_string(), "en,dog:en,the:Ds");
    }

    #[test]
    fn canonical_text_round_trips_through_the_store() {
        let store = store();
        let original = link(&store);
        let decoded = Link::from_canonical(&original.to_string(), &store).unwrap();

        assert_eq!(decoded.source().id(), "dog");
        assert_eq!(decoded.destination().id(), "the");
        assert_eq!(decoded.flags(), "Ds");
        assert_eq!(decoded.locale(), "en");
        assert_eq!(decoded, original);
    }

    #[test]
    fn unknown_endpoint_fails_to_decode() {
        let store = store();
        let err = Link::from_canonical("en,dog:en,cat:Ds", &store).unwrap_err();
        assert!(matches!(err, Error::UnresolvedEndpoint { ref id, .. } if id == "cat"));
    }

    #[test]
    fn malformed_text_is_rejected() {
        for text in ["", "en,dog", "en,dog:en,the", "dog:the:Ds", "en,dog:en,the:"] {
            let err = text.parse::<CanonicalLink>().unwrap_err();
            assert!(matches!(err, Error::MalformedLink { .. }), "accepted '{text}'");
        }
    }

    #[test]
    fn describe_names_both_endpoints() {
        let store = store();
        assert_eq!(link(&store).describe(), "(type: 'Ds') [dog (Nn)]->[the (Dd)]");
    }
}
