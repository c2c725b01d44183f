use crate::binding::Grammar;
use crate::engine::{LogObserver, RecordingObserver, ReductionMetrics, RoundObserver};
use crate::error::{Error, Result};
use crate::grammar::RuleSet;
use crate::lexicon::{LexicalStore, MemoryLexicon};
use crate::meaning::{Meaning, SourceIndexPolicy};
use crate::node::{Node, Verbosity};
use crate::rules;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::{Duration, Instant};

static DEFAULT_GRAMMAR: Lazy<RuleSet> = Lazy::new(|| RuleSet::new(rules::en::rules()));
static DEFAULT_LEXICON: Lazy<MemoryLexicon> = Lazy::new(|| MemoryLexicon::with_entries(rules::en::lexicon()));

/// Locale of the built-in grammar and lexicon.
pub const DEFAULT_LOCALE: &str = rules::en::LOCALE;

/// The built-in English lexicon.
pub fn default_lexicon() -> &'static MemoryLexicon {
    &DEFAULT_LEXICON
}

/// The built-in English grammar.
pub fn default_grammar() -> &'static RuleSet {
    &DEFAULT_GRAMMAR
}

/// Options that affect reduction behavior.
#[derive(Debug, Clone)]
pub struct Options {
    /// Rounds a single reduction may run before it is reported as
    /// non-convergent. `None` allows as many rounds as there are nodes.
    pub max_rounds: Option<usize>,
    /// Conflict policy for [`Meaning::link_from`].
    pub source_index: SourceIndexPolicy,
    /// Upper bound on sense combinations tried per sentence.
    pub max_variants: usize,
    /// Split multi-flag nodes into one node per flag before reducing.
    pub expand_senses: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { max_rounds: None, source_index: SourceIndexPolicy::default(), max_variants: 256, expand_senses: true }
    }
}

/// One sense combination that reduced to a meaning.
#[derive(Debug, Clone)]
pub struct Reading {
    /// `Full` signatures of the combination, joined with `>`.
    pub signature: String,
    pub meaning: Meaning,
}

/// Result from [`parse`] and [`parse_with`].
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Lexical ids as given.
    pub ids: Vec<String>,
    pub locale: String,
    /// Every combination that formed a meaning, in enumeration order.
    pub readings: Vec<Reading>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Trace of one sense combination, formed or not.
#[derive(Debug, Clone)]
pub struct CombinationTrace {
    pub signature: String,
    pub formed: bool,
    /// The reduction hit the round limit; the combination yields no reading.
    pub diverged: bool,
    pub metrics: ReductionMetrics,
}

/// Additional details returned by [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseDetails {
    pub total: Duration,
    /// Ids that had no lexical entry and were replaced by pseudo nodes.
    pub pseudo: Vec<String>,
    /// Combinations tried (bounded by `Options::max_variants`).
    pub combinations: Vec<CombinationTrace>,
    /// Whether enumeration stopped at `max_variants`.
    pub truncated: bool,
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub result: ParseResult,
    pub details: ParseDetails,
}

/// Parse `ids` with the built-in English grammar and lexicon.
///
/// # Example
/// ```
/// use linkform::parse;
///
/// let out = parse(&["the", "dog", "barks"]).unwrap();
/// assert_eq!(out.readings.len(), 1);
/// ```
pub fn parse(ids: &[&str]) -> Result<ParseResult> {
    parse_with(ids, DEFAULT_LOCALE, default_lexicon(), default_grammar(), &Options::default())
}

/// Parse `ids` (already-resolved lexical ids for one sentence) against the
/// given store and grammar.
pub fn parse_with(
    ids: &[&str],
    locale: &str,
    store: &dyn LexicalStore,
    grammar: &dyn Grammar,
    options: &Options,
) -> Result<ParseResult> {
    let start = Instant::now();
    let nodes = resolve_nodes(ids, locale, store);
    let mut readings = Vec::new();

    let truncated = for_each_combination(&nodes, options, |combination| {
        let signature = Node::signature_of(&combination, Verbosity::Full);
        if let Outcome::Formed(meaning) = form_combination(combination, grammar, options, &mut LogObserver)? {
            readings.push(Reading { signature, meaning });
        }
        Ok(())
    })?;
    if truncated {
        log::warn!("event=variants_truncated max_variants={}", options.max_variants);
    }

    Ok(ParseResult {
        ids: ids.iter().map(|s| s.to_string()).collect(),
        locale: locale.to_string(),
        readings,
        elapsed: start.elapsed(),
    })
}

/// Like [`parse_with`], also returning per-round metrics for every
/// combination tried.
pub fn parse_verbose_with(
    ids: &[&str],
    locale: &str,
    store: &dyn LexicalStore,
    grammar: &dyn Grammar,
    options: &Options,
) -> Result<ParseResultVerbose> {
    let start = Instant::now();
    let nodes = resolve_nodes(ids, locale, store);
    let pseudo = ids.iter().filter(|id| !Node::exists(store, locale, id)).map(|s| s.to_string()).collect();
    let mut readings = Vec::new();
    let mut combinations = Vec::new();

    let truncated = for_each_combination(&nodes, options, |combination| {
        let signature = Node::signature_of(&combination, Verbosity::Full);
        let mut observer = (LogObserver, RecordingObserver::new());
        let outcome = form_combination(combination, grammar, options, &mut observer)?;

        combinations.push(CombinationTrace {
            signature: signature.clone(),
            formed: matches!(outcome, Outcome::Formed(_)),
            diverged: matches!(outcome, Outcome::Diverged),
            metrics: observer.1.into_metrics(),
        });
        if let Outcome::Formed(meaning) = outcome {
            readings.push(Reading { signature, meaning });
        }
        Ok(())
    })?;

    let total = start.elapsed();
    let result = ParseResult {
        ids: ids.iter().map(|s| s.to_string()).collect(),
        locale: locale.to_string(),
        readings,
        elapsed: total,
    };

    Ok(ParseResultVerbose { result, details: ParseDetails { total, pseudo, combinations, truncated } })
}

enum Outcome {
    Formed(Meaning),
    NoMeaning,
    Diverged,
}

/// Reduce one sense combination. Hitting the round limit only discards this
/// combination; other errors abort the parse.
fn form_combination(
    combination: Vec<Arc<Node>>,
    grammar: &dyn Grammar,
    options: &Options,
    observer: &mut dyn RoundObserver,
) -> Result<Outcome> {
    let mut links = Vec::new();
    match Meaning::form(&mut links, combination, grammar, options, observer) {
        Ok(Some(meaning)) => Ok(Outcome::Formed(meaning)),
        Ok(None) => Ok(Outcome::NoMeaning),
        Err(Error::DidNotConverge { .. }) => Ok(Outcome::Diverged),
        Err(err) => Err(err),
    }
}

/// Load each id, falling back to a pseudo node for unknown words.
fn resolve_nodes(ids: &[&str], locale: &str, store: &dyn LexicalStore) -> Vec<Node> {
    ids.iter()
        .map(|id| {
            Node::obtain(store, locale, id).unwrap_or_else(|| {
                log::debug!("event=pseudo_node locale={} id={}", locale, id);
                Node::build_pseudo(id, locale, id)
            })
        })
        .collect()
}

/// Call `f` with every sense combination of `nodes`, leftmost word varying
/// slowest. Returns whether enumeration stopped at `max_variants`.
fn for_each_combination(
    nodes: &[Node],
    options: &Options,
    mut f: impl FnMut(Vec<Arc<Node>>) -> Result<()>,
) -> Result<bool> {
    let senses: Vec<Vec<Arc<Node>>> = nodes
        .iter()
        .map(|node| {
            let variants = if options.expand_senses { node.expand() } else { Vec::new() };
            if variants.is_empty() {
                vec![Arc::new(node.clone())]
            } else {
                variants.into_iter().map(Arc::new).collect()
            }
        })
        .collect();

    let mut cursor = vec![0usize; senses.len()];
    let mut tried = 0;

    loop {
        if tried >= options.max_variants {
            return Ok(true);
        }
        f(cursor.iter().zip(&senses).map(|(&i, variants)| Arc::clone(&variants[i])).collect())?;
        tried += 1;

        // Odometer step from the right.
        let mut pos = senses.len();
        loop {
            if pos == 0 {
                return Ok(false);
            }
            pos -= 1;
            cursor[pos] += 1;
            if cursor[pos] < senses[pos].len() {
                break;
            }
            cursor[pos] = 0;
        }
    }
}
