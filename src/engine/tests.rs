use super::{NoopObserver, RoundObserver};
use crate::api::Options;
use crate::binding::{Binding, Grammar};
use crate::error::Error;
use crate::lexicon::{FlagMap, LexicalData};
use crate::link::Link;
use crate::meaning::Meaning;
use crate::node::Node;
use std::collections::HashMap;
use std::sync::Arc;

/// Grammar keyed by the ids of the pair.
#[derive(Default)]
struct TableGrammar {
    bindings: HashMap<(String, String), Binding>,
}

impl TableGrammar {
    fn with(mut self, left: &str, right: &str, attrs: &[(&str, &str)]) -> Self {
        let binding = Binding {
            rule: format!("{left}-{right}"),
            flags: format!("{left}{right}"),
            locale: "en".into(),
            reverse: false,
            attributes: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        };
        self.bindings.insert((left.to_string(), right.to_string()), binding);
        self
    }
}

impl Grammar for TableGrammar {
    fn obtain(&self, left: &Node, right: &Node) -> Option<Binding> {
        self.bindings.get(&(left.id().to_string(), right.id().to_string())).cloned()
    }
}

/// Records the survivor ids of every round.
#[derive(Default)]
struct Survivors(Vec<Vec<String>>);

impl RoundObserver for Survivors {
    fn round_finished(&mut self, _round: usize, _links_total: usize, survivors: &[Arc<Node>]) {
        self.0.push(survivors.iter().map(|n| n.id().to_string()).collect());
    }
}

fn node(id: &str, tag: &str) -> Arc<Node> {
    let flags: FlagMap = [("k", tag)].into_iter().collect();
    Arc::new(Node::from_data(LexicalData::new(id, "en", id, flags)))
}

fn abc() -> Vec<Arc<Node>> {
    vec![node("a", "Aa"), node("b", "Bb"), node("c", "Cc")]
}

fn reduce(grammar: &TableGrammar, nodes: Vec<Arc<Node>>) -> (Option<Meaning>, Vec<Link>, Vec<Vec<String>>) {
    let mut links = Vec::new();
    let mut observer = Survivors::default();
    let meaning = Meaning::form(&mut links, nodes, grammar, &Options::default(), &mut observer).unwrap();
    (meaning, links, observer.0)
}

fn link_types(links: &[Link]) -> Vec<String> {
    links.iter().map(|l| l.flags().to_string()).collect()
}

#[test]
fn single_node_never_forms_a_meaning() {
    let grammar = TableGrammar::default().with("a", "a", &[]);
    let (meaning, links, rounds) = reduce(&grammar, vec![node("a", "Aa")]);

    assert!(meaning.is_none());
    assert!(links.is_empty());
    assert_eq!(rounds, vec![Vec::<String>::new()]);
}

#[test]
fn unbound_pair_forms_no_meaning() {
    let (meaning, links, rounds) = reduce(&TableGrammar::default(), vec![node("a", "Aa"), node("b", "Bb")]);

    assert!(meaning.is_none());
    assert!(links.is_empty());
    assert_eq!(rounds.len(), 1);
}

#[test]
fn two_nodes_bind_once_even_without_skipping() {
    let grammar = TableGrammar::default().with("a", "b", &[("skipWord", "no")]);
    let (meaning, links, rounds) = reduce(&grammar, vec![node("a", "Aa"), node("b", "Bb")]);

    assert_eq!(link_types(&links), vec!["ab"]);
    assert_eq!(rounds, vec![vec!["a".to_string()], vec![]]);
    assert_eq!(meaning.unwrap().len(), 1);
}

#[test]
fn default_skip_word_jumps_past_the_destination() {
    let grammar = TableGrammar::default().with("a", "b", &[]).with("b", "c", &[]);
    let (meaning, links, rounds) = reduce(&grammar, abc());

    // (b, c) is never evaluated: b was consumed as a destination.
    assert_eq!(link_types(&links), vec!["ab"]);
    assert_eq!(rounds, vec![vec!["a".to_string()], vec![]]);
    assert_eq!(meaning.unwrap().len(), 1);
}

#[test]
fn hidden_source_is_excluded_and_next_pair_carries() {
    let grammar = TableGrammar::default()
        .with("a", "b", &[("hide", "yes"), ("skipWord", "no")])
        .with("b", "c", &[("hide", "no")]);
    let (meaning, links, rounds) = reduce(&grammar, abc());

    assert_eq!(link_types(&links), vec!["ab", "bc"]);
    assert_eq!(rounds[0], vec!["b".to_string()]);
    let meaning = meaning.unwrap();
    assert_eq!(meaning.len(), 2);
    assert_eq!(meaning.is_linked_to(&node("a", "Aa")).len(), 1);
    assert_eq!(meaning.is_linked_by(&node("c", "Cc")).len(), 1);
}

#[test]
fn hide_drops_the_source_unless_exactly_no() {
    for value in ["No", "true", "1"] {
        let grammar =
            TableGrammar::default().with("a", "b", &[("hide", value), ("skipWord", "no")]).with("b", "c", &[]);
        let (_, links, rounds) = reduce(&grammar, abc());

        assert_eq!(link_types(&links), vec!["ab", "bc"], "hide={value}");
        assert_eq!(rounds[0], vec!["b".to_string()], "hide={value}");
    }
}

#[test]
fn hide_next_drops_the_following_bound_source() {
    let grammar =
        TableGrammar::default().with("a", "b", &[("hideNext", "yes"), ("skipWord", "no")]).with("b", "c", &[]);
    let (_, links, rounds) = reduce(&grammar, abc());

    assert_eq!(link_types(&links), vec!["ab", "bc"]);
    assert_eq!(rounds[0], vec!["a".to_string()]);
}

#[test]
fn hide_next_survives_an_unbound_pair() {
    let grammar =
        TableGrammar::default().with("a", "b", &[("hideNext", "yes"), ("skipWord", "no")]).with("c", "d", &[]);
    let nodes = vec![node("a", "Aa"), node("b", "Bb"), node("c", "Cc"), node("d", "Dd")];
    let (_, links, rounds) = reduce(&grammar, nodes);

    // (b, c) has no binding, so the pending hide applies to (c, d).
    assert_eq!(link_types(&links), vec!["ab", "cd"]);
    assert_eq!(rounds[0], vec!["a".to_string()]);
}

#[test]
fn hide_filter_gates_the_following_source_by_signature() {
    let cases: Vec<(&str, Vec<&str>)> = vec![
        ("Bfoo", vec!["a"]),
        ("barB", vec!["a"]),
        ("Bzz", vec!["a", "b"]),
        ("fo", vec!["a", "b"]),
    ];

    for (tag, expected) in cases {
        let grammar = TableGrammar::default()
            .with("a", "b", &[("hideFilter", "foo,bar"), ("skipWord", "no")])
            .with("b", "c", &[]);
        let nodes = vec![node("a", "Aa"), node("b", tag), node("c", "Cc")];
        let (_, links, rounds) = reduce(&grammar, nodes);

        assert_eq!(link_types(&links), vec!["ab", "bc"], "tag {tag}");
        assert_eq!(rounds[0], expected, "tag {tag}");
    }
}

#[test]
fn hide_filter_holds_until_a_node_breaks_it() {
    let grammar = TableGrammar::default()
        .with("a", "b", &[("hideFilter", "x"), ("skipWord", "no")])
        .with("b", "c", &[("skipWord", "no")])
        .with("c", "d", &[("skipWord", "no")])
        .with("d", "e", &[]);
    let nodes = vec![node("a", "Aa"), node("b", "Bx"), node("c", "Cx"), node("d", "Dd"), node("e", "Ee")];
    let (_, links, rounds) = reduce(&grammar, nodes);

    assert_eq!(link_types(&links), vec!["ab", "bc", "cd", "de"]);
    // b and c match the filter; d breaks it and is carried again.
    assert_eq!(rounds[0], vec!["a".to_string(), "d".to_string()]);
}

#[test]
fn empty_filter_segment_matches_every_node() {
    let nodes = || vec![node("a", "Aa"), node("b", "Bb"), node("c", "Cc"), node("d", "Dd")];
    let grammar = |filter: &str| {
        TableGrammar::default()
            .with("a", "b", &[("hideFilter", filter), ("skipWord", "no")])
            .with("b", "c", &[("skipWord", "no")])
            .with("c", "d", &[])
    };

    let (_, links, rounds) = reduce(&grammar("zz,"), nodes());
    assert_eq!(link_types(&links), vec!["ab", "bc", "cd"]);
    assert_eq!(rounds[0], vec!["a".to_string()]);

    let (_, _, rounds) = reduce(&grammar("zz"), nodes());
    assert_eq!(rounds[0], vec!["a".to_string(), "b".to_string(), "c".to_string()]);
}

#[test]
fn chain_of_n_nodes_settles_within_n_rounds() {
    let grammar = TableGrammar::default().with("a", "b", &[("skipWord", "no")]).with("b", "c", &[("skipWord", "no")]);
    let (meaning, links, rounds) = reduce(&grammar, abc());

    assert_eq!(rounds.len(), 3);
    assert_eq!(rounds[2], Vec::<String>::new());
    assert_eq!(link_types(&links), vec!["ab", "bc", "ab"]);
    assert_eq!(meaning.unwrap().len(), 2);
}

#[test]
fn reversed_bindings_carry_the_right_node() {
    let mut grammar = TableGrammar::default().with("a", "b", &[]);
    grammar.bindings.values_mut().for_each(|b| b.reverse = true);
    let (meaning, _, rounds) = reduce(&grammar, vec![node("a", "Aa"), node("b", "Bb")]);

    assert_eq!(rounds[0], vec!["b".to_string()]);
    let meaning = meaning.unwrap();
    assert_eq!(meaning.base().source().id(), "b");
    assert_eq!(meaning.base().destination().id(), "a");
}

#[test]
fn existing_accumulator_becomes_the_meaning() {
    let (a, b) = (node("a", "Aa"), node("b", "Bb"));
    let mut links = vec![Link::form(a.clone(), b, "ab", "en")];
    let meaning =
        Meaning::form(&mut links, vec![a], &TableGrammar::default(), &Options::default(), &mut NoopObserver).unwrap();

    assert_eq!(meaning.unwrap().len(), 1);
}

#[test]
fn round_limit_reports_non_convergence() {
    let grammar = TableGrammar::default().with("a", "b", &[("skipWord", "no")]).with("b", "c", &[]);
    let options = Options { max_rounds: Some(1), ..Options::default() };
    let mut links = Vec::new();
    let err = Meaning::form(&mut links, abc(), &grammar, &options, &mut NoopObserver).unwrap_err();

    assert!(matches!(err, Error::DidNotConverge { rounds: 1, remaining: 2 }));
    assert_eq!(links.len(), 2);
}
