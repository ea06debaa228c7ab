//! The phrase grammar used to derive fragments.
//!
//! Productions are written in plain CFG text, one non-terminal per line,
//! alternatives separated by `|`, terminals as single-quoted POS tags:
//!
//! ```text
//! Root       -> Root '.' | NounPhrase VerbPhrase | NounPhrase | VerbPhrase | 'UH'
//! NounPhrase -> NounPhrase 'CC' NounPhrase | AdjPhrase NounPhrase | NounWord
//! NounWord   -> 'NN' | 'NNS' | 'PRP'
//! ```
//!
//! Alongside the productions a grammar names its top symbol, the two phrase
//! non-terminals the weaver reasons about, the verb tags used when no
//! derivation exists, and the tags given to injected connectives.
//!
//! Loaded from `data/grammar.yaml` (disk first, embedded copy as fallback).

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::nl::earley::{Grammar, Rule, Symbol};
use crate::types::Result;

// ---------------------------------------------------------------------------
// Embedded fallback
// ---------------------------------------------------------------------------

const EMBEDDED_GRAMMAR: &str = include_str!("../../data/grammar.yaml");

const GRAMMAR_PATH: &str = "data/grammar.yaml";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("line {line}: expected `LHS -> RHS`, got {text:?}")]
    MissingArrow { line: usize, text: String },

    #[error("line {line}: more than one `->` in {text:?}")]
    ExtraArrow { line: usize, text: String },

    #[error("line {line}: left-hand side must be a single non-terminal, got {lhs:?}")]
    BadLhs { line: usize, lhs: String },

    #[error("line {line}: empty alternative for {lhs}")]
    EmptyAlternative { line: usize, lhs: String },

    #[error("line {line}: unterminated terminal quote in {text:?}")]
    UnterminatedQuote { line: usize, text: String },

    #[error("non-terminal {name} is referenced by {referenced_by} but never defined")]
    Undefined { name: String, referenced_by: String },

    #[error("{role} symbol {name} has no productions")]
    MissingSymbol { role: &'static str, name: String },

    #[error("grammar has no productions")]
    Empty,
}

// ---------------------------------------------------------------------------
// YAML schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GrammarYaml {
    #[serde(default = "default_start")]
    start: String,
    #[serde(default = "default_noun_phrase")]
    noun_phrase: String,
    #[serde(default = "default_verb_phrase")]
    verb_phrase: String,
    #[serde(default = "default_verb_tags")]
    verb_tags: Vec<String>,
    #[serde(default = "default_connective_tag")]
    connective_tag: String,
    #[serde(default = "default_preposition_tag")]
    preposition_tag: String,
    #[serde(default = "default_attachment_phrase")]
    attachment_phrase: String,
    productions: String,
}

fn default_start() -> String { "Root".into() }
fn default_noun_phrase() -> String { "NounPhrase".into() }
fn default_verb_phrase() -> String { "VerbPhrase".into() }
fn default_connective_tag() -> String { "CC".into() }
fn default_preposition_tag() -> String { "IN".into() }
fn default_attachment_phrase() -> String { "PrepPhrase".into() }

fn default_verb_tags() -> Vec<String> {
    ["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"].iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Runtime grammar
// ---------------------------------------------------------------------------

/// A validated grammar plus the symbols the weaver needs to name.
#[derive(Debug, Clone)]
pub struct ProseGrammar {
    pub cfg: Grammar,
    pub noun_phrase: String,
    pub verb_phrase: String,
    pub verb_tags: HashSet<String>,
    /// Tag given to an injected "and".
    pub connective_tag: String,
    /// Tag given to an injected "before"/"after".
    pub preposition_tag: String,
    /// Label of the phrase wrapping an injected "before"/"after" and its object.
    pub attachment_phrase: String,
}

impl ProseGrammar {
    /// Build a grammar from production text with the default symbol names.
    pub fn from_productions(productions: &str) -> Result<Self> {
        let raw = GrammarYaml {
            start: default_start(),
            noun_phrase: default_noun_phrase(),
            verb_phrase: default_verb_phrase(),
            verb_tags: default_verb_tags(),
            connective_tag: default_connective_tag(),
            preposition_tag: default_preposition_tag(),
            attachment_phrase: default_attachment_phrase(),
            productions: productions.to_string(),
        };
        Self::from_raw(raw)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: GrammarYaml = serde_yaml::from_str(yaml)?;
        Self::from_raw(raw)
    }

    /// Load strictly from a file: any read or parse failure is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    fn from_raw(raw: GrammarYaml) -> Result<Self> {
        let rules = parse_productions(&raw.productions)?;
        let cfg = Grammar::new(raw.start, rules);
        validate(&cfg, &raw.noun_phrase, &raw.verb_phrase)?;

        Ok(Self {
            cfg,
            noun_phrase: raw.noun_phrase,
            verb_phrase: raw.verb_phrase,
            verb_tags: raw.verb_tags.into_iter().collect(),
            connective_tag: raw.connective_tag,
            preposition_tag: raw.preposition_tag,
            attachment_phrase: raw.attachment_phrase,
        })
    }

    /// The distinguished top symbol.
    pub fn start(&self) -> &str {
        &self.cfg.start
    }

    /// Unknown tags are simply not verb tags.
    pub fn is_verb_tag(&self, tag: &str) -> bool {
        self.verb_tags.contains(tag)
    }
}

// ---------------------------------------------------------------------------
// Production text parser
// ---------------------------------------------------------------------------

/// Parse CFG production text into rules, in source order.
pub fn parse_productions(text: &str) -> std::result::Result<Vec<Rule>, GrammarError> {
    let mut rules = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (lhs, rhs) = line.split_once("->").ok_or_else(|| GrammarError::MissingArrow {
            line: line_no,
            text: line.to_string(),
        })?;

        if rhs.contains("->") {
            return Err(GrammarError::ExtraArrow { line: line_no, text: line.to_string() });
        }

        let lhs = lhs.trim();
        if lhs.is_empty() || lhs.contains(char::is_whitespace) || lhs.contains('\'') {
            return Err(GrammarError::BadLhs { line: line_no, lhs: lhs.to_string() });
        }

        for alternative in rhs.split('|') {
            let symbols = parse_alternative(alternative, line_no)?;
            if symbols.is_empty() {
                return Err(GrammarError::EmptyAlternative { line: line_no, lhs: lhs.to_string() });
            }
            rules.push(Rule::new(lhs, symbols));
        }
    }

    if rules.is_empty() {
        return Err(GrammarError::Empty);
    }
    Ok(rules)
}

fn parse_alternative(text: &str, line: usize) -> std::result::Result<Vec<Symbol>, GrammarError> {
    let mut symbols = Vec::new();
    for word in text.split_whitespace() {
        if let Some(quoted) = word.strip_prefix('\'') {
            let tag = quoted.strip_suffix('\'').filter(|t| !t.is_empty()).ok_or_else(|| {
                GrammarError::UnterminatedQuote { line, text: text.trim().to_string() }
            })?;
            symbols.push(Symbol::Terminal(tag.to_string()));
        } else {
            symbols.push(Symbol::NonTerminal(word.to_string()));
        }
    }
    Ok(symbols)
}

fn validate(cfg: &Grammar, noun_phrase: &str, verb_phrase: &str) -> std::result::Result<(), GrammarError> {
    for (role, name) in [("start", cfg.start.as_str()), ("noun phrase", noun_phrase), ("verb phrase", verb_phrase)] {
        if !cfg.defines(name) {
            return Err(GrammarError::MissingSymbol { role, name: name.to_string() });
        }
    }

    for rule in &cfg.rules {
        for sym in &rule.rhs {
            if let Symbol::NonTerminal(name) = sym {
                if !cfg.defines(name) {
                    return Err(GrammarError::Undefined {
                        name: name.clone(),
                        referenced_by: rule.lhs.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Singleton
// ---------------------------------------------------------------------------

static GRAMMAR: OnceLock<ProseGrammar> = OnceLock::new();

/// The default grammar (loaded on first call).
pub fn default_grammar() -> &'static ProseGrammar {
    GRAMMAR.get_or_init(load_default)
}

fn load_default() -> ProseGrammar {
    match std::fs::read_to_string(GRAMMAR_PATH) {
        Ok(yaml) => ProseGrammar::from_yaml_str(&yaml).unwrap_or_else(|e| {
            tracing::warn!("failed to parse {} ({}), using embedded", GRAMMAR_PATH, e);
            embedded()
        }),
        Err(_) => embedded(),
    }
}

fn embedded() -> ProseGrammar {
    ProseGrammar::from_yaml_str(EMBEDDED_GRAMMAR).expect("embedded grammar.yaml must parse")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
