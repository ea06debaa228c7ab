//! Hand-built derivations for merged fragments.
//!
//! A merge produces text the grammar was never asked about ("A and B",
//! "A before B", ...). Rather than re-derive it, the merge builds the tree
//! itself from its inputs and stores that. Inputs are only ever cloned;
//! a tree already in the cache is never touched.
//!
//! Shapes (with the default symbol names):
//!
//! ```text
//! coordinate   Root[NounPhrase[l, 'CC' and, r]]         (or VerbPhrase)
//! clause       Root[NounPhrase, VerbPhrase]
//! join         Root[Root(l), 'CC' and, Root(r)]
//! attach       Root[NounPhrase, VerbPhrase[VerbPhrase, PrepPhrase['IN' before, x]]]
//! fallback     Root[l, 'CC' and, r]
//! ```

use crate::nl::earley::ParseNode;
use crate::nl::grammar::ProseGrammar;
use crate::types::TaggedToken;
use crate::weave::cache::ParseEntry;

pub const AND: &str = "and";
pub const BEFORE: &str = "before";
pub const AFTER: &str = "after";

// ---------------------------------------------------------------------------
// Subtree extraction
// ---------------------------------------------------------------------------

/// The phrase label a fragment would get from its tags alone.
fn inferred_label<'g>(entry: &ParseEntry, grammar: &'g ProseGrammar) -> &'g str {
    if entry.tags().any(|t| grammar.is_verb_tag(t)) {
        &grammar.verb_phrase
    } else {
        &grammar.noun_phrase
    }
}

fn token_leaves(entry: &ParseEntry) -> Vec<ParseNode> {
    entry.tokens.iter().map(|t| ParseNode::leaf(&t.tag, &t.token)).collect()
}

/// The phrase node standing for `entry` inside a larger tree.
///
/// A tree rooted at the top symbol over a single phrase yields a copy of
/// that phrase. Anything else becomes a flat phrase over the entry's
/// tokens, labeled by its tags. The result is never a top-symbol node, so
/// it cannot make a combined tree look like a compound clause.
pub fn constituent(entry: &ParseEntry, grammar: &ProseGrammar) -> ParseNode {
    if let Some(root) = entry.tree().filter(|t| t.label() == grammar.start()) {
        if let [only] = root.children() {
            if !only.is_leaf() && only.label() != grammar.start() {
                return only.clone();
            }
        }
    }
    ParseNode::interior(inferred_label(entry, grammar), token_leaves(entry))
}

/// Like [`constituent`], but the node is guaranteed to carry `label`.
fn phrase_as(entry: &ParseEntry, label: &str, grammar: &ProseGrammar) -> ParseNode {
    let node = constituent(entry, grammar);
    if node.label() == label {
        node
    } else {
        ParseNode::interior(label, token_leaves(entry))
    }
}

/// A copy of the entry's top-symbol tree, or a top-symbol node over its
/// constituent when it has none.
fn root_of(entry: &ParseEntry, grammar: &ProseGrammar) -> ParseNode {
    match entry.tree() {
        Some(tree) if tree.label() == grammar.start() => tree.clone(),
        _ => ParseNode::interior(grammar.start(), vec![constituent(entry, grammar)]),
    }
}

fn joined_tokens(left: &ParseEntry, word: Option<TaggedToken>, right: &ParseEntry) -> Vec<TaggedToken> {
    let mut tokens = Vec::with_capacity(left.tokens.len() + right.tokens.len() + 1);
    tokens.extend(left.tokens.iter().cloned());
    tokens.extend(word);
    tokens.extend(right.tokens.iter().cloned());
    tokens
}

fn connective(grammar: &ProseGrammar) -> ParseNode {
    ParseNode::leaf(&grammar.connective_tag, AND)
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// `left and right`, where both are phrases labeled `label`.
pub fn coordinate(left: &ParseEntry, right: &ParseEntry, label: &str, grammar: &ProseGrammar) -> ParseEntry {
    let phrase = ParseNode::interior(label, vec![
        phrase_as(left, label, grammar),
        connective(grammar),
        phrase_as(right, label, grammar),
    ]);
    let tree = ParseNode::interior(grammar.start(), vec![phrase]);
    let word = TaggedToken::new(AND, &grammar.connective_tag);
    ParseEntry::synthetic(tree, joined_tokens(left, Some(word), right))
}

/// `subject predicate` as a clause.
pub fn clause(subject: &ParseEntry, predicate: &ParseEntry, grammar: &ProseGrammar) -> ParseEntry {
    let tree = ParseNode::interior(grammar.start(), vec![
        phrase_as(subject, &grammar.noun_phrase, grammar),
        phrase_as(predicate, &grammar.verb_phrase, grammar),
    ]);
    ParseEntry::synthetic(tree, joined_tokens(subject, None, predicate))
}

/// Two clauses as one compound clause.
pub fn join_clauses(left: &ParseEntry, right: &ParseEntry, grammar: &ProseGrammar) -> ParseEntry {
    let tree = ParseNode::interior(grammar.start(), vec![
        root_of(left, grammar),
        connective(grammar),
        root_of(right, grammar),
    ]);
    let word = TaggedToken::new(AND, &grammar.connective_tag);
    ParseEntry::synthetic(tree, joined_tokens(left, Some(word), right))
}

/// `clause <preposition> other`: the clause's predicate gains a
/// prepositional phrase over `other`. In a compound clause the last
/// clause receives it.
pub fn attach(clause: &ParseEntry, preposition: &str, other: &ParseEntry, grammar: &ProseGrammar) -> ParseEntry {
    let object = ParseNode::interior(grammar.attachment_phrase.as_str(), vec![
        ParseNode::leaf(&grammar.preposition_tag, preposition),
        constituent(other, grammar),
    ]);
    let tree = attach_to(&root_of(clause, grammar), object, grammar);
    let word = TaggedToken::new(preposition, &grammar.preposition_tag);
    ParseEntry::synthetic(tree, joined_tokens(clause, Some(word), other))
}

fn attach_to(root: &ParseNode, object: ParseNode, grammar: &ProseGrammar) -> ParseNode {
    match root.children() {
        [subject, predicate] if predicate.label() == grammar.verb_phrase => {
            let predicate = ParseNode::interior(grammar.verb_phrase.as_str(), vec![predicate.clone(), object]);
            ParseNode::interior(grammar.start(), vec![subject.clone(), predicate])
        }
        [left, conj, right] if right.label() == grammar.start() => {
            ParseNode::interior(grammar.start(), vec![
                left.clone(),
                conj.clone(),
                attach_to(right, object, grammar),
            ])
        }
        children => {
            let mut children = children.to_vec();
            children.push(object);
            ParseNode::interior(grammar.start(), children)
        }
    }
}

/// `left and right` for two fragments neither of which is a clause.
/// The result is a top-symbol node over three children, which classifies
/// as neither phrase nor clause.
pub fn fallback_join(left: &ParseEntry, right: &ParseEntry, grammar: &ProseGrammar) -> ParseEntry {
    let tree = ParseNode::interior(grammar.start(), vec![
        constituent(left, grammar),
        connective(grammar),
        constituent(right, grammar),
    ]);
    let word = TaggedToken::new(AND, &grammar.connective_tag);
    ParseEntry::synthetic(tree, joined_tokens(left, Some(word), right))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nl::derive::Derivation;
    use crate::nl::grammar::default_grammar;
    use crate::types::Classification;
    use crate::weave::classify::classify;

    fn entry(tree: Option<ParseNode>, tokens: &[(&str, &str)]) -> ParseEntry {
        ParseEntry::derived(Derivation {
            tree,
            tokens: tokens.iter().map(|(w, t)| TaggedToken::new(*w, *t)).collect(),
        })
    }

    fn np(word: &str) -> ParseEntry {
        let tree = ParseNode::interior("Root", vec![
            ParseNode::interior("NounPhrase", vec![ParseNode::leaf("NN", word)]),
        ]);
        entry(Some(tree), &[(word, "NN")])
    }

    fn vp(word: &str) -> ParseEntry {
        let tree = ParseNode::interior("Root", vec![
            ParseNode::interior("VerbPhrase", vec![ParseNode::leaf("VBD", word)]),
        ]);
        entry(Some(tree), &[(word, "VBD")])
    }

    fn tags(e: &ParseEntry) -> Vec<&str> {
        e.tags().collect()
    }

    #[test]
    fn test_coordinate_noun_phrases() {
        let g = default_grammar();
        let merged = coordinate(&np("dog"), &np("cat"), "NounPhrase", g);
        let tree = merged.tree().unwrap();

        assert!(merged.is_synthetic());
        assert_eq!(tree.child_labels(), vec!["NounPhrase"]);
        assert_eq!(tree.children()[0].child_labels(), vec!["NounPhrase", "CC", "NounPhrase"]);
        assert_eq!(tree.leaf_tokens(), vec!["dog", "and", "cat"]);
        assert_eq!(tags(&merged), vec!["NN", "CC", "NN"]);
        assert_eq!(classify(&merged, g), Classification::NounPhrase);
    }

    #[test]
    fn test_coordinate_without_trees() {
        let g = default_grammar();
        let left = entry(None, &[("ran", "VBD")]);
        let right = entry(None, &[("quickly", "RB"), ("jumped", "VBD")]);
        let merged = coordinate(&left, &right, "VerbPhrase", g);
        assert_eq!(classify(&merged, g), Classification::VerbPhrase);
        assert_eq!(merged.tree().unwrap().leaf_tokens(), vec!["ran", "and", "quickly", "jumped"]);
    }

    #[test]
    fn test_clause_shape() {
        let g = default_grammar();
        let merged = clause(&np("dog"), &vp("barked"), g);
        assert_eq!(merged.tree().unwrap().child_labels(), vec!["NounPhrase", "VerbPhrase"]);
        assert_eq!(tags(&merged), vec!["NN", "VBD"]);
        assert_eq!(classify(&merged, g), Classification::Clause);
    }

    #[test]
    fn test_join_clauses_shape() {
        let g = default_grammar();
        let a = clause(&np("dog"), &vp("barked"), g);
        let b = clause(&np("cat"), &vp("slept"), g);
        let joined = join_clauses(&a, &b, g);

        assert_eq!(joined.tree().unwrap().child_labels(), vec!["Root", "CC", "Root"]);
        assert_eq!(tags(&joined), vec!["NN", "VBD", "CC", "NN", "VBD"]);
        assert_eq!(classify(&joined, g), Classification::Clause);
    }

    #[test]
    fn test_attach_wraps_predicate() {
        let g = default_grammar();
        let c = clause(&np("it"), &vp("rained"), g);
        let other = entry(None, &[("quickly", "RB")]);
        let attached = attach(&c, BEFORE, &other, g);
        let tree = attached.tree().unwrap();

        assert_eq!(tree.child_labels(), vec!["NounPhrase", "VerbPhrase"]);
        let predicate = &tree.children()[1];
        assert_eq!(predicate.child_labels(), vec!["VerbPhrase", "PrepPhrase"]);
        assert_eq!(predicate.children()[1].leaf_tokens(), vec!["before", "quickly"]);
        assert_eq!(tags(&attached), vec!["NN", "VBD", "IN", "RB"]);
        assert_eq!(classify(&attached, g), Classification::Clause);
    }

    #[test]
    fn test_attach_to_compound_clause_targets_last_clause() {
        let g = default_grammar();
        let joined = join_clauses(&clause(&np("a"), &vp("x"), g), &clause(&np("b"), &vp("y"), g), g);
        let attached = attach(&joined, AFTER, &np("noon"), g);
        let tree = attached.tree().unwrap();

        assert_eq!(tree.child_labels(), vec!["Root", "CC", "Root"]);
        assert_eq!(tree.children()[0], joined.tree().unwrap().children()[0]);
        assert_eq!(tree.children()[2].children()[1].child_labels(), vec!["VerbPhrase", "PrepPhrase"]);
        assert_eq!(classify(&attached, g), Classification::Clause);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let g = default_grammar();
        let c = clause(&np("it"), &vp("rained"), g);
        let before = c.tree().unwrap().clone();
        let _ = attach(&c, BEFORE, &np("noon"), g);
        assert_eq!(c.tree().unwrap(), &before);
    }

    #[test]
    fn test_fallback_join_is_other() {
        let g = default_grammar();
        let joined = fallback_join(&vp("ran"), &np("dog"), g);
        assert_eq!(joined.tree().unwrap().child_labels(), vec!["VerbPhrase", "CC", "NounPhrase"]);
        assert_eq!(classify(&joined, g), Classification::Other);
    }

    #[test]
    fn test_constituent_of_other_is_flat() {
        let g = default_grammar();
        let uh = entry(Some(ParseNode::interior("Root", vec![ParseNode::leaf("UH", "oh")])), &[("oh", "UH")]);
        let node = constituent(&uh, g);
        assert_eq!(node.label(), "NounPhrase");
        assert_eq!(node.leaf_tokens(), vec!["oh"]);
    }
}
