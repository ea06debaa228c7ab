//! Classification of cache entries.
//!
//! A real or synthetic tree gives a precise answer. Without a tree the
//! tag sequence decides: any verb tag makes a verb phrase, none makes a
//! noun phrase. A fragment with no tree is therefore never a clause and
//! never `Other`.

use crate::nl::earley::ParseNode;
use crate::nl::grammar::ProseGrammar;
use crate::types::Classification;
use crate::weave::cache::ParseEntry;

/// The tree, if it is rooted at the grammar's top symbol.
fn rooted<'e>(entry: &'e ParseEntry, grammar: &ProseGrammar) -> Option<&'e ParseNode> {
    entry.tree().filter(|t| !t.is_leaf() && t.label() == grammar.start())
}

fn single_child_labeled(entry: &ParseEntry, grammar: &ProseGrammar, label: &str) -> bool {
    match rooted(entry, grammar) {
        Some(root) => matches!(root.children(), [only] if !only.is_leaf() && only.label() == label),
        None => false,
    }
}

fn has_verb_tag(entry: &ParseEntry, grammar: &ProseGrammar) -> bool {
    entry.tags().any(|t| grammar.is_verb_tag(t))
}

/// Root over `[NounPhrase, VerbPhrase]`, or a joined compound
/// `[Root, connective, Root]`.
pub fn is_clause(entry: &ParseEntry, grammar: &ProseGrammar) -> bool {
    let Some(root) = rooted(entry, grammar) else {
        return false;
    };
    match root.children() {
        [np, vp] => {
            !np.is_leaf()
                && !vp.is_leaf()
                && np.label() == grammar.noun_phrase
                && vp.label() == grammar.verb_phrase
        }
        [left, connective, right] => {
            !left.is_leaf()
                && connective.is_leaf()
                && !right.is_leaf()
                && left.label() == grammar.start()
                && right.label() == grammar.start()
        }
        _ => false,
    }
}

pub fn is_noun_phrase(entry: &ParseEntry, grammar: &ProseGrammar) -> bool {
    if entry.tree.is_some() {
        single_child_labeled(entry, grammar, &grammar.noun_phrase)
    } else {
        !has_verb_tag(entry, grammar)
    }
}

pub fn is_verb_phrase(entry: &ParseEntry, grammar: &ProseGrammar) -> bool {
    if entry.tree.is_some() {
        single_child_labeled(entry, grammar, &grammar.verb_phrase)
    } else {
        has_verb_tag(entry, grammar)
    }
}

/// Both noun phrases, or both verb phrases.
pub fn same_phrase_type(a: &ParseEntry, b: &ParseEntry, grammar: &ProseGrammar) -> bool {
    (is_noun_phrase(a, grammar) && is_noun_phrase(b, grammar))
        || (is_verb_phrase(a, grammar) && is_verb_phrase(b, grammar))
}

pub fn classify(entry: &ParseEntry, grammar: &ProseGrammar) -> Classification {
    if is_clause(entry, grammar) {
        Classification::Clause
    } else if is_noun_phrase(entry, grammar) {
        Classification::NounPhrase
    } else if is_verb_phrase(entry, grammar) {
        Classification::VerbPhrase
    } else {
        Classification::Other
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
