//! The derivation service: tag a fragment, then parse its tags.

use crate::nl::earley::{self, ParseNode};
use crate::nl::grammar::ProseGrammar;
use crate::nl::tagger::Tagger;
use crate::types::TaggedToken;

/// Result of deriving one fragment. `tree` is `None` when the grammar
/// has no derivation for the fragment's tags; that is not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub tree: Option<ParseNode>,
    pub tokens: Vec<TaggedToken>,
}

/// Anything that can derive a fragment. Must behave as a pure function of
/// `text` from the caller's point of view; it may be slow.
pub trait Deriver {
    fn derive(&self, text: &str) -> Derivation;
}

/// Derives fragments by tagging them and taking the first Earley parse
/// under the parser's ranking.
pub struct GrammarDeriver<'a> {
    grammar: &'a ProseGrammar,
    tagger: &'a dyn Tagger,
}

impl<'a> GrammarDeriver<'a> {
    pub fn new(grammar: &'a ProseGrammar, tagger: &'a dyn Tagger) -> Self {
        Self { grammar, tagger }
    }
}

impl Deriver for GrammarDeriver<'_> {
    fn derive(&self, text: &str) -> Derivation {
        let tokens = self.tagger.tag(text);
        let tree = earley::first_parse(&self.grammar.cfg, &tokens);
        if tree.is_none() {
            let tags: Vec<&str> = tokens.iter().map(|t| t.tag.as_str()).collect();
            tracing::debug!(fragment = text, ?tags, "no derivation");
        }
        Derivation { tree, tokens }
    }
}
