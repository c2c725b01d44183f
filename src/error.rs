use thiserror::Error;

/// Errors surfaced by the linker.
///
/// Resolution misses (unknown words, pairs with no licensing rule) are not
/// errors: they show up as `None` and the affected pair is skipped.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed link text '{text}': {reason}")]
    MalformedLink { text: String, reason: &'static str },

    #[error("link endpoint '{locale},{id}' does not resolve to a lexical entry")]
    UnresolvedEndpoint { locale: String, id: String },

    #[error("invalid pattern in rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("reduction did not converge after {rounds} rounds ({remaining} nodes still queued)")]
    DidNotConverge { rounds: usize, remaining: usize },

    #[error("lexical entry '{locale},{id}' was saved but cannot be loaded back")]
    NotPersisted { locale: String, id: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        let err = Error::MalformedLink { text: "en".into(), reason: "expected three ':' fields" };
        assert_eq!(err.to_string(), "malformed link text 'en': expected three ':' fields");

        let err = Error::UnresolvedEndpoint { locale: "en".into(), id: "dog".into() };
        assert_eq!(err.to_string(), "link endpoint 'en,dog' does not resolve to a lexical entry");

        let err = Error::NotPersisted { locale: "en".into(), id: "dog".into() };
        assert_eq!(err.to_string(), "lexical entry 'en,dog' was saved but cannot be loaded back");

        let err = Error::DidNotConverge { rounds: 4, remaining: 2 };
        assert_eq!(err.to_string(), "reduction did not converge after 4 rounds (2 nodes still queued)");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
