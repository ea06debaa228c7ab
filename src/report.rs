//! Plain-text reports printed by the CLI.

use std::fmt::Write as _;

use crate::nl::derive::Derivation;
use crate::nl::earley;
use crate::nl::grammar::ProseGrammar;
use crate::nl::tagger::Tagger;
use crate::types::{Classification, TaggedToken};
use crate::weave::cache::ParseEntry;
use crate::weave::classify::classify;

fn tag_list(tokens: &[TaggedToken]) -> String {
    tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
}

/// Tag `text`, parse it, and describe the result.
///
/// With `all`, every ranked parse is listed with its score; otherwise
/// only the one the derivation service would pick.
pub fn describe_parse(text: &str, grammar: &ProseGrammar, tagger: &dyn Tagger, all: bool) -> String {
    let tokens = tagger.tag(text);
    let parses = earley::parse(&grammar.cfg, &tokens);

    let mut out = String::new();
    let _ = writeln!(out, "Parsing \"{}\"...", text);
    let _ = writeln!(out, "    Tagged as: {}", tag_list(&tokens));
    let _ = writeln!(out);

    let Some(best) = parses.first() else {
        let _ = writeln!(out, "ERROR: Could not parse \"{}\".", text);
        return out;
    };

    let shown = if all { parses.len() } else { 1 };
    for (rank, parse) in parses.iter().take(shown).enumerate() {
        if all {
            let _ = writeln!(out, "#{} (score {:.1}, start rule {})", rank + 1, parse.score, parse.rule_index);
        }
        let _ = write!(out, "{}", parse.tree);
    }

    let entry = ParseEntry::derived(Derivation { tree: Some(best.tree.clone()), tokens });
    let _ = writeln!(out);
    let _ = writeln!(out, "Classified as: {}", classify(&entry, grammar));
    out
}

/// Classification of a fragment as the weaver sees it, including the
/// tag fallback for fragments with no derivation.
pub fn classify_text(text: &str, grammar: &ProseGrammar, tagger: &dyn Tagger) -> Classification {
    let tokens = tagger.tag(text);
    let tree = earley::first_parse(&grammar.cfg, &tokens);
    classify(&ParseEntry::derived(Derivation { tree, tokens }), grammar)
}
