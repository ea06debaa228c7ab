//! Fragment weaving: classify fragments and fuse them into prose.
//!
//! ```text
//! fragments ─► merge_phrases ─► merge_clauses ─► reduce ─► passage
//!                    └──────────── Session (cache + grammar) ──┘
//! ```
//!
//! Every pass works against one [`Session`], which owns the document's
//! [`ClassificationCache`]. A new session starts with an empty cache; the
//! free functions [`weave`] and [`weave_with_stats`] build one per call.

pub mod cache;
pub mod classify;
pub mod clause;
pub mod paragraph;
pub mod phrase;
pub mod synth;

use crate::nl::derive::Deriver;
use crate::nl::grammar::ProseGrammar;
use crate::types::Classification;

pub use cache::{CacheStats, ClassificationCache, EntryOrigin, ParseEntry};
pub use clause::merge_clauses;
pub use paragraph::{concat, reduce};
pub use phrase::merge_phrases;

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// What a session did, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeaveStats {
    /// Calls made to the derivation service.
    pub derivations: usize,
    pub cache_hits: usize,
    pub synthetic_entries: usize,
    /// "A and B" phrase coordinations.
    pub phrase_merges: usize,
    /// "A B" noun phrase + verb phrase fusions.
    pub clause_merges: usize,
    /// Clause-to-clause joins in the reducer.
    pub clause_joins: usize,
    /// "before"/"after" attachments in the reducer.
    pub attachments: usize,
    /// Reducer joins where neither side was a clause.
    pub fallback_joins: usize,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Grammar, derivation service, and the cache for one document.
pub struct Session<'a> {
    grammar: &'a ProseGrammar,
    deriver: &'a dyn Deriver,
    cache: ClassificationCache,
    counts: WeaveStats,
}

/// The output of each pass of a full weave.
#[derive(Debug, Clone, PartialEq)]
pub struct Woven {
    /// After phrase merging.
    pub phrases: Vec<String>,
    /// After clause merging.
    pub clauses: Vec<String>,
    pub text: String,
    pub stats: WeaveStats,
}

impl<'a> Session<'a> {
    pub fn new(grammar: &'a ProseGrammar, deriver: &'a dyn Deriver) -> Self {
        Self {
            grammar,
            deriver,
            cache: ClassificationCache::new(),
            counts: WeaveStats::default(),
        }
    }

    pub fn grammar(&self) -> &'a ProseGrammar {
        self.grammar
    }

    /// Memoized derivation of `text`.
    pub fn lookup(&mut self, text: &str) -> ParseEntry {
        self.cache.lookup(text, self.deriver)
    }

    pub fn classify(&mut self, text: &str) -> Classification {
        let entry = self.lookup(text);
        classify::classify(&entry, self.grammar)
    }

    pub fn is_clause(&mut self, text: &str) -> bool {
        let entry = self.lookup(text);
        classify::is_clause(&entry, self.grammar)
    }

    pub fn is_noun_phrase(&mut self, text: &str) -> bool {
        let entry = self.lookup(text);
        classify::is_noun_phrase(&entry, self.grammar)
    }

    pub fn is_verb_phrase(&mut self, text: &str) -> bool {
        let entry = self.lookup(text);
        classify::is_verb_phrase(&entry, self.grammar)
    }

    /// Store the hand-built entry for text a merge just produced.
    pub(crate) fn inject(&mut self, text: &str, entry: ParseEntry) {
        self.cache.insert_synthetic(text, entry);
    }

    pub(crate) fn counts_mut(&mut self) -> &mut WeaveStats {
        &mut self.counts
    }

    pub fn cache(&self) -> &ClassificationCache {
        &self.cache
    }

    pub fn stats(&self) -> WeaveStats {
        let cache = self.cache.stats();
        WeaveStats {
            derivations: cache.derivations,
            cache_hits: cache.hits,
            synthetic_entries: cache.synthetic,
            ..self.counts
        }
    }

    /// Run all three passes over `fragments`.
    pub fn weave<S: AsRef<str>>(&mut self, fragments: &[S]) -> Woven {
        let phrases = merge_phrases(self, fragments);
        let clauses = merge_clauses(self, &phrases);
        let text = reduce(self, &clauses);
        tracing::debug!(
            fragments = fragments.len(),
            phrases = phrases.len(),
            clauses = clauses.len(),
            "woven"
        );
        Woven { phrases, clauses, text, stats: self.stats() }
    }
}

/// Weave `fragments` into one passage with a fresh cache.
pub fn weave<S: AsRef<str>>(fragments: &[S], grammar: &ProseGrammar, deriver: &dyn Deriver) -> String {
    weave_with_stats(fragments, grammar, deriver).0
}

pub fn weave_with_stats<S: AsRef<str>>(
    fragments: &[S],
    grammar: &ProseGrammar,
    deriver: &dyn Deriver,
) -> (String, WeaveStats) {
    let woven = Session::new(grammar, deriver).weave(fragments);
    (woven.text, woven.stats)
}

/// True when a fragment has nothing to contribute.
pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
