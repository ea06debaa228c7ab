use std::fmt;

use serde::{Deserialize, Serialize};

use crate::nl::grammar::GrammarError;

// ---------------------------------------------------------------------------
// Tagged tokens
// ---------------------------------------------------------------------------

/// One token of a fragment together with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { token: token.into(), tag: tag.into() }
    }
}

impl fmt::Display for TaggedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token, self.tag)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Grammatical role of a fragment. Always recomputed from its cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    NounPhrase,
    VerbPhrase,
    Clause,
    Other,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::NounPhrase => "NounPhrase",
            Classification::VerbPhrase => "VerbPhrase",
            Classification::Clause => "Clause",
            Classification::Other => "Other",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("lexicon error: {0}")]
    Lexicon(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

pub type Result<T> = std::result::Result<T, WeaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_token_display() {
        let tok = TaggedToken::new("dog", "NN");
        assert_eq!(tok.to_string(), "dog/NN");
    }

    #[test]
    fn test_grammar_error_converts() {
        let err: WeaveError = GrammarError::MissingArrow { line: 3, text: "Root".into() }.into();
        let msg = err.to_string();
        assert!(msg.starts_with("grammar error"), "got: {}", msg);
        assert!(msg.contains("line 3"), "got: {}", msg);
    }
}
