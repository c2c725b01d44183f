//! English demo grammar and lexicon.
//!
//! Tags (first flag value of each entry):
//!
//! ```text
//! Dd determiner   Aa adjective   Nn noun   Vv verb
//! Rr adverb       Pp preposition Bz pseudo (punctuation, unknown words)
//! ```
//!
//! Heads are kept as link sources: `det <- noun` links the noun to its
//! determiner so the noun is what survives into the next round.

use crate::lexicon::{FlagMap, LexicalData};
use crate::{BindingRule, binding_rule};

pub(crate) const LOCALE: &str = "en";

/// Rules in priority order (first match wins).
pub(crate) fn rules() -> Vec<BindingRule> {
    vec![
        binding_rule! {
            name: "det -> adj",
            locale: LOCALE,
            source: r"^D",
            destination: r"^A",
            flags: "Dm",
            attrs: { "skipWord" => "no" },
        },
        binding_rule! {
            name: "det <- noun",
            locale: LOCALE,
            source: r"^D",
            destination: r"^N",
            flags: "Ds",
            reverse: true,
            attrs: { "skipWord" => "no" },
        },
        binding_rule! {
            name: "adj <- noun",
            locale: LOCALE,
            source: r"^A",
            destination: r"^N",
            flags: "Ma",
            reverse: true,
            attrs: { "skipWord" => "no" },
        },
        binding_rule! {
            name: "noun <- verb",
            locale: LOCALE,
            source: r"^N",
            destination: r"^V",
            flags: "Ss",
            reverse: true,
            attrs: { "skipWord" => "no" },
        },
        binding_rule! {
            name: "verb -> adv",
            locale: LOCALE,
            source: r"^V",
            destination: r"^R",
            flags: "Ev",
        },
        binding_rule! {
            name: "verb -> prep",
            locale: LOCALE,
            source: r"^V",
            destination: r"^P",
            flags: "Mv",
            attrs: { "skipWord" => "no" },
        },
        binding_rule! {
            name: "prep -> det",
            locale: LOCALE,
            source: r"^P",
            destination: r"^D",
            flags: "Jd",
            attrs: { "skipWord" => "no", "hideNext" => "yes" },
        },
        binding_rule! {
            name: "prep -> noun",
            locale: LOCALE,
            source: r"^P",
            destination: r"^N",
            flags: "Js",
            attrs: { "hide" => "yes" },
        },
        binding_rule! {
            name: "verb -> punct",
            locale: LOCALE,
            source: r"^V",
            destination: r"^Bz$",
            flags: "Xp",
        },
    ]
}

pub(crate) fn lexicon() -> Vec<LexicalData> {
    const ENTRIES: &[(&str, &[(&str, &str)])] = &[
        ("the", &[("det", "Dd")]),
        ("a", &[("det", "Dd")]),
        ("big", &[("adj", "Aa")]),
        ("small", &[("adj", "Aa")]),
        ("red", &[("adj", "Aa")]),
        ("dog", &[("noun", "Nn")]),
        ("cat", &[("noun", "Nn")]),
        ("house", &[("noun", "Nn")]),
        ("ball", &[("noun", "Nn")]),
        ("barks", &[("verb", "Vv")]),
        ("sleeps", &[("verb", "Vv")]),
        ("sees", &[("verb", "Vv")]),
        ("run", &[("verb", "Vv"), ("noun", "Nn")]),
        ("walk", &[("verb", "Vv"), ("noun", "Nn")]),
        ("loudly", &[("adv", "Rr")]),
        ("quickly", &[("adv", "Rr")]),
        ("in", &[("prep", "Pp")]),
        ("on", &[("prep", "Pp")]),
    ];

    ENTRIES
        .iter()
        .map(|(word, flags)| {
            let flags: FlagMap = flags.iter().copied().collect();
            LexicalData::new(*word, LOCALE, *word, flags)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Options, parse_with};
    use crate::grammar::RuleSet;
    use crate::lexicon::MemoryLexicon;

    fn run(words: &[&str]) -> Vec<Vec<String>> {
        let store = MemoryLexicon::with_entries(lexicon());
        let grammar = RuleSet::new(rules());
        let res = parse_with(words, LOCALE, &store, &grammar, &Options::default()).unwrap();
        res.readings.iter().map(|r| r.meaning.siblings().iter().map(|l| l.to_string()).collect()).collect()
    }

    #[test]
    fn determiner_noun_verb() {
        let readings = run(&["the", "dog", "barks"]);
        assert_eq!(readings, vec![vec!["en,dog:en,the:Ds".to_string(), "en,barks:en,dog:Ss".to_string()]]);
    }

    #[test]
    fn adjective_chain_keeps_noun_as_head() {
        let readings = run(&["the", "big", "dog", "barks"]);
        assert_eq!(readings.len(), 1);
        assert_eq!(
            readings[0],
            vec![
                "en,the:en,big:Dm".to_string(),
                "en,dog:en,big:Ma".to_string(),
                "en,barks:en,dog:Ss".to_string(),
                "en,dog:en,the:Ds".to_string(),
            ]
        );
    }

    #[test]
    fn multi_sense_words_yield_one_reading_per_parsable_sense() {
        // "run" as a verb binds to "dog"; as a noun nothing licenses it.
        let readings = run(&["dog", "run"]);
        assert_eq!(readings, vec![vec!["en,run:en,dog:Ss".to_string()]]);
    }

    #[test]
    fn every_entry_has_a_known_tag() {
        let tags = ["Dd", "Aa", "Nn", "Vv", "Rr", "Pp"];
        for entry in lexicon() {
            assert!(!entry.flags.is_empty(), "{} has no flags", entry.id);
            for (_, value) in entry.flags.iter() {
                assert!(tags.contains(&value), "{} has unknown tag {}", entry.id, value);
            }
        }
    }
}
