//! Lexicon loader for the fragment tagger.
//!
//! Loads word → POS-tag readings from `data/lexicon.yaml`. Closed-class
//! words are listed per tag; regular verbs are listed once and their
//! inflections generated here. Adding a word is a YAML edit, not a code
//! change.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::types::{Result, WeaveError};

// ---------------------------------------------------------------------------
// Embedded fallback
// ---------------------------------------------------------------------------

const EMBEDDED_LEXICON: &str = include_str!("../../data/lexicon.yaml");

const LEXICON_PATH: &str = "data/lexicon.yaml";

// ---------------------------------------------------------------------------
// YAML schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LexiconYaml {
    #[serde(default)]
    tags: HashMap<String, Vec<String>>,
    #[serde(default)]
    auxiliaries: Vec<String>,
    #[serde(default)]
    irregular_verbs: Vec<IrregularVerbEntry>,
    #[serde(default)]
    verbs: Vec<String>,
    #[serde(default)]
    nouns: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IrregularVerbEntry {
    base: String,
    present: String,
    past: String,
    participle: String,
    gerund: String,
    #[serde(default)]
    plural_present: Option<String>,
    #[serde(default)]
    plural_past: Option<String>,
}

// ---------------------------------------------------------------------------
// Runtime lexicon
// ---------------------------------------------------------------------------

/// The loaded lexicon, indexed for lookup.
#[derive(Debug, Default)]
pub struct Lexicon {
    /// Lowercased word → candidate tags, preferred reading first.
    pub entries: HashMap<String, Vec<String>>,

    /// Words after which an `-ed` form reads as a participle.
    pub auxiliaries: HashSet<String>,
}

impl Lexicon {
    /// Candidate tags for a word (case-insensitive).
    pub fn candidates(&self, word: &str) -> Option<&[String]> {
        self.entries.get(&word.to_lowercase()).map(|v| v.as_slice())
    }

    pub fn is_auxiliary(&self, word: &str) -> bool {
        self.auxiliaries.contains(&word.to_lowercase())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        parse_lexicon(yaml)
    }

    /// Load strictly from a file: any read or parse failure is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        parse_lexicon(&yaml)
    }

    fn add(&mut self, word: &str, tag: &str) -> Result<()> {
        let lower = word.trim().to_lowercase();
        if lower.is_empty() {
            return Err(WeaveError::Lexicon(format!("empty word listed under {}", tag)));
        }
        let tags = self.entries.entry(lower).or_default();
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Singleton
// ---------------------------------------------------------------------------

static LEXICON: OnceLock<Lexicon> = OnceLock::new();

/// Get the default lexicon (singleton, loaded on first call).
pub fn lexicon() -> &'static Lexicon {
    LEXICON.get_or_init(load_default)
}

fn load_default() -> Lexicon {
    let yaml_str = std::fs::read_to_string(LEXICON_PATH)
        .ok()
        .unwrap_or_else(|| EMBEDDED_LEXICON.to_string());

    parse_lexicon(&yaml_str).unwrap_or_else(|e| {
        tracing::warn!("failed to parse {} ({}), using embedded", LEXICON_PATH, e);
        parse_lexicon(EMBEDDED_LEXICON).expect("embedded lexicon.yaml must parse")
    })
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

fn parse_lexicon(yaml_str: &str) -> Result<Lexicon> {
    let raw: LexiconYaml = serde_yaml::from_str(yaml_str)?;
    let mut lex = Lexicon::default();

    // Closed classes first, in tag-name order so readings are stable
    // regardless of map iteration order.
    let mut tag_names: Vec<&String> = raw.tags.keys().collect();
    tag_names.sort();
    for tag in tag_names {
        for word in &raw.tags[tag] {
            lex.add(word, tag)?;
        }
    }

    for verb in &raw.irregular_verbs {
        lex.add(&verb.base, "VB")?;
        lex.add(&verb.base, "VBP")?;
        lex.add(&verb.present, "VBZ")?;
        lex.add(&verb.past, "VBD")?;
        lex.add(&verb.participle, "VBN")?;
        lex.add(&verb.gerund, "VBG")?;
        if let Some(ref plural) = verb.plural_present {
            lex.add(plural, "VBP")?;
        }
        if let Some(ref plural) = verb.plural_past {
            lex.add(plural, "VBD")?;
        }
    }

    for base in &raw.verbs {
        let base = base.trim().to_lowercase();
        lex.add(&base, "VB")?;
        lex.add(&third_person(&base), "VBZ")?;
        let past = past_tense(&base);
        lex.add(&past, "VBD")?;
        lex.add(&past, "VBN")?;
        lex.add(&gerund(&base), "VBG")?;
    }

    for noun in &raw.nouns {
        let noun = noun.trim().to_lowercase();
        lex.add(&noun, "NN")?;
        lex.add(&plural(&noun), "NNS")?;
    }

    lex.auxiliaries = raw.auxiliaries.iter().map(|w| w.to_lowercase()).collect();

    Ok(lex)
}

// ---------------------------------------------------------------------------
// Inflection
// ---------------------------------------------------------------------------

fn ends_with_sibilant(word: &str) -> bool {
    ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s))
}

fn consonant_y(word: &str) -> bool {
    let mut rev = word.chars().rev();
    matches!((rev.next(), rev.next()), (Some('y'), Some(c)) if !"aeiou".contains(c))
}

fn third_person(base: &str) -> String {
    if consonant_y(base) {
        format!("{}ies", &base[..base.len() - 1])
    } else if ends_with_sibilant(base) {
        format!("{}es", base)
    } else {
        format!("{}s", base)
    }
}

fn plural(noun: &str) -> String {
    third_person(noun)
}

/// Short consonant-vowel-consonant stems double the final consonant
/// ("stop" → "stopped").
fn doubles_final(base: &str) -> bool {
    let chars: Vec<char> = base.chars().collect();
    let n = chars.len();
    if n < 3 || n > 4 {
        return false;
    }
    let vowel = |c: char| "aeiou".contains(c);
    if n == 4 && vowel(chars[0]) {
        return false;
    }
    let (a, b, c) = (chars[n - 3], chars[n - 2], chars[n - 1]);
    c.is_ascii_lowercase() && !vowel(a) && vowel(b) && !vowel(c) && !"wxy".contains(c)
}

/// The final character to repeat before `-ed` / `-ing`, if any.
fn doubled_final(base: &str) -> Option<char> {
    if doubles_final(base) {
        base.chars().last()
    } else {
        None
    }
}

fn past_tense(base: &str) -> String {
    if base.ends_with('e') {
        format!("{}d", base)
    } else if consonant_y(base) {
        format!("{}ied", &base[..base.len() - 1])
    } else if let Some(last) = doubled_final(base) {
        format!("{}{}ed", base, last)
    } else {
        format!("{}ed", base)
    }
}

fn gerund(base: &str) -> String {
    if base.ends_with('e') && !base.ends_with("ee") && base.len() > 2 {
        format!("{}ing", &base[..base.len() - 1])
    } else if let Some(last) = doubled_final(base) {
        format!("{}{}ing", base, last)
    } else {
        format!("{}ing", base)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
