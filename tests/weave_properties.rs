use std::cell::RefCell;
use std::collections::HashMap;

use proptest::prelude::*;

use proseweave::nl::{default_grammar, Derivation, Deriver, ParseNode};
use proseweave::types::{Classification, TaggedToken};
use proseweave::weave::{merge_clauses, merge_phrases, weave_with_stats, Session};

/// Classifies by the first letter of a fragment: `n` noun phrase,
/// `v` verb phrase, `c` clause, `o` other. Counts calls per text.
#[derive(Default)]
struct ByInitial {
    calls: RefCell<HashMap<String, usize>>,
}

impl Deriver for ByInitial {
    fn derive(&self, text: &str) -> Derivation {
        *self.calls.borrow_mut().entry(text.to_string()).or_default() += 1;
        let leaf = |tag: &str| ParseNode::leaf(tag, text);
        let (tree, tags): (Option<ParseNode>, &[&str]) = match text.chars().next() {
            Some('v') => (None, &["VBD"][..]),
            Some('c') => (
                Some(ParseNode::interior("Root", vec![
                    ParseNode::interior("NounPhrase", vec![leaf("NNP")]),
                    ParseNode::interior("VerbPhrase", vec![leaf("VBD")]),
                ])),
                &["NNP", "VBD"][..],
            ),
            Some('o') => (Some(ParseNode::interior("Root", vec![leaf("UH")])), &["UH"][..]),
            _ => (None, &["NN"][..]),
        };
        Derivation { tree, tokens: tags.iter().map(|t| TaggedToken::new(text, *t)).collect() }
    }
}

/// Fragment kinds, with blanks mixed in.
fn fragments(kinds: &'static str, max: usize) -> impl Strategy<Value = Vec<String>> {
    let kinds: Vec<char> = kinds.chars().collect();
    prop::collection::vec(prop::sample::select(kinds), 0..max).prop_map(|picked| {
        picked
            .into_iter()
            .enumerate()
            .map(|(i, k)| if k == ' ' { "  ".to_string() } else { format!("{}{:03}", k, i) })
            .collect()
    })
}

fn is_phrase(c: Classification) -> bool {
    matches!(c, Classification::NounPhrase | Classification::VerbPhrase)
}

proptest! {
    #[test]
    fn phrase_merger_leaves_no_adjacent_same_type(input in fragments("nvco ", 24)) {
        let deriver = ByInitial::default();
        let mut session = Session::new(default_grammar(), &deriver);
        let merged = merge_phrases(&mut session, &input);
        let classes: Vec<Classification> = merged.iter().map(|f| session.classify(f)).collect();

        for pair in classes.windows(2) {
            prop_assert!(
                !(is_phrase(pair[0]) && pair[0] == pair[1]),
                "adjacent {:?} in {:?}", pair, merged
            );
        }
        prop_assert!(merged.iter().all(|f| !f.trim().is_empty()));
    }

    #[test]
    fn noun_phrases_join_with_and(input in fragments("n", 12)) {
        let deriver = ByInitial::default();
        let mut session = Session::new(default_grammar(), &deriver);
        let merged = merge_phrases(&mut session, &input);

        if input.is_empty() {
            prop_assert!(merged.is_empty());
        } else {
            prop_assert_eq!(merged.len(), 1);
            prop_assert_eq!(&merged[0], &input.join(" and "));
            prop_assert_eq!(session.classify(&merged[0]), Classification::NounPhrase);
        }
    }

    #[test]
    fn clause_merger_leaves_no_noun_before_verb(input in fragments("nvco ", 24)) {
        let deriver = ByInitial::default();
        let mut session = Session::new(default_grammar(), &deriver);
        let phrases = merge_phrases(&mut session, &input);
        let clauses = merge_clauses(&mut session, &phrases);
        let classes: Vec<Classification> = clauses.iter().map(|f| session.classify(f)).collect();

        for pair in classes.windows(2) {
            prop_assert!(
                !(pair[0] == Classification::NounPhrase && pair[1] == Classification::VerbPhrase),
                "unmerged noun/verb pair in {:?}", clauses
            );
        }
    }

    #[test]
    fn weave_derives_each_text_once_and_keeps_every_fragment(input in fragments("nvco ", 24)) {
        let deriver = ByInitial::default();
        let (text, stats) = weave_with_stats(&input, default_grammar(), &deriver);

        prop_assert!(deriver.calls.borrow().values().all(|&n| n == 1));
        let live: Vec<&String> = input.iter().filter(|f| !f.trim().is_empty()).collect();
        prop_assert_eq!(stats.derivations, live.len());
        for fragment in live {
            prop_assert!(text.contains(fragment.as_str()), "{:?} lost from {:?}", fragment, text);
        }
    }

    #[test]
    fn noun_verb_pairs_never_fall_back(pairs in 0usize..10) {
        let input: Vec<String> = (0..pairs)
            .flat_map(|i| [format!("n{:03}", 2 * i), format!("v{:03}", 2 * i + 1)])
            .collect();
        let deriver = ByInitial::default();
        let (text, stats) = weave_with_stats(&input, default_grammar(), &deriver);

        prop_assert_eq!(stats.fallback_joins, 0);
        prop_assert_eq!(stats.clause_merges, pairs);
        prop_assert_eq!(text.lines().count(), pairs);
    }

    #[test]
    fn weave_is_deterministic(input in fragments("nvco ", 16)) {
        let first = weave_with_stats(&input, default_grammar(), &ByInitial::default());
        let second = weave_with_stats(&input, default_grammar(), &ByInitial::default());
        prop_assert_eq!(first, second);
    }
}
