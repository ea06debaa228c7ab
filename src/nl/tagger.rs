//! Tokenizer and part-of-speech tagger for fragments.
//!
//! Tokenization splits on whitespace and peels punctuation and possessive
//! markers into their own tokens. Tagging is lexicon-first with a small
//! amount of left context, then suffix heuristics, then `NN`.
//!
//! The tagger is deliberately simple and fully deterministic: the same
//! text always produces the same tags.

use crate::nl::lexicon::Lexicon;
use crate::types::TaggedToken;

/// Turns a fragment into tagged tokens.
pub trait Tagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

/// Tags after which a noun reading is preferred over a verb reading.
const NOMINAL_CONTEXT: &[&str] = &["DT", "PDT", "PRP$", "WP$", "JJ", "JJR", "JJS", "POS", "CD"];

const LEADING_PUNCT: &[char] = &['(', '[', '{', '"', '`', '\''];
const TRAILING_PUNCT: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '"', '`'];

// ---------------------------------------------------------------------------
// Tokenization
// ---------------------------------------------------------------------------

/// Split text into word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for word in text.split_whitespace() {
        let mut core = word;

        while let Some(c) = core.chars().next().filter(|c| LEADING_PUNCT.contains(c)) {
            tokens.push(c.to_string());
            core = &core[c.len_utf8()..];
        }

        let mut trailing = Vec::new();
        while let Some(c) = core.chars().last().filter(|c| TRAILING_PUNCT.contains(c)) {
            trailing.push(c.to_string());
            core = &core[..core.len() - c.len_utf8()];
        }
        trailing.reverse();

        let possessive = if core.len() > 2 && (core.ends_with("'s") || core.ends_with("'S")) {
            let split = core.len() - 2;
            let marker = &core[split..];
            core = &core[..split];
            Some(marker)
        } else if core.len() > 1 && core.ends_with("s'") {
            let split = core.len() - 1;
            core = &core[..split];
            Some("'")
        } else {
            None
        };

        if !core.is_empty() {
            tokens.push(core.to_string());
        }
        if let Some(marker) = possessive {
            tokens.push(marker.to_string());
        }
        tokens.extend(trailing);
    }

    tokens
}

// ---------------------------------------------------------------------------
// LexiconTagger
// ---------------------------------------------------------------------------

/// A tagger backed by a [`Lexicon`].
pub struct LexiconTagger<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> LexiconTagger<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    fn tag_token(&self, token: &str, prev: Option<&TaggedToken>, position: usize) -> String {
        if let Some(tag) = punctuation_tag(token) {
            return tag;
        }
        if token == "'s" || token == "'S" || token == "'" {
            return "POS".into();
        }
        if is_numeral(token) {
            return "CD".into();
        }

        let prev_tag = prev.map(|p| p.tag.as_str());
        let after_auxiliary = prev.is_some_and(|p| self.lexicon.is_auxiliary(&p.token));

        if let Some(candidates) = self.lexicon.candidates(token) {
            return choose(candidates, prev_tag, after_auxiliary);
        }

        let lower = token.to_lowercase();
        let capitalized = token.chars().next().is_some_and(char::is_uppercase);
        if capitalized && position > 0 {
            return "NNP".into();
        }
        if lower.len() > 3 && lower.ends_with("ly") {
            return "RB".into();
        }
        if lower.len() > 4 && lower.ends_with("ing") {
            return "VBG".into();
        }
        if lower.len() > 3 && lower.ends_with("ed") {
            return if after_auxiliary { "VBN".into() } else { "VBD".into() };
        }
        if lower.len() > 4 && lower.ends_with("est") {
            return "JJS".into();
        }
        if lower.len() > 3 && lower.ends_with('s') && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s)) {
            return "NNS".into();
        }
        "NN".into()
    }
}

impl Tagger for LexiconTagger<'_> {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tagged: Vec<TaggedToken> = Vec::new();
        for (i, token) in tokenize(text).into_iter().enumerate() {
            let tag = self.tag_token(&token, tagged.last(), i);
            tagged.push(TaggedToken { token, tag });
        }
        tagged
    }
}

/// Pick one reading from the lexicon's candidates using left context.
fn choose(candidates: &[String], prev_tag: Option<&str>, after_auxiliary: bool) -> String {
    if prev_tag.is_some_and(|t| NOMINAL_CONTEXT.contains(&t)) {
        if let Some(noun) = candidates.iter().find(|t| t.as_str() == "NN" || t.as_str() == "NNS") {
            return noun.clone();
        }
    }
    if after_auxiliary {
        if let Some(participle) = candidates.iter().find(|t| t.as_str() == "VBN") {
            return participle.clone();
        }
    }
    candidates.first().cloned().unwrap_or_else(|| "NN".into())
}

fn punctuation_tag(token: &str) -> Option<String> {
    if token.is_empty() || token.chars().any(char::is_alphanumeric) {
        return None;
    }
    let tag = match token {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" => ":",
        "\"" | "`" => "``",
        other => other,
    };
    Some(tag.to_string())
}

fn is_numeral(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty()
        && digits.chars().next().is_some_and(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',' || c == '_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
