//! Memoized derivation lookup.
//!
//! The cache maps exact fragment text to its [`ParseEntry`]. It is both a
//! memo for the (slow) derivation service and the sole source of truth for
//! merged fragments, whose entries are synthesized by the merge passes and
//! never re-derived. One cache serves one document.

use std::collections::HashMap;
use std::sync::Arc;

use crate::nl::derive::{Derivation, Deriver};
use crate::nl::earley::ParseNode;
use crate::types::TaggedToken;

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    /// Produced by the derivation service.
    Derived,
    /// Built by a merge for text it just constructed.
    Synthetic,
}

/// A derivation (or its absence) plus the tagged tokens of a fragment.
///
/// Cloning is cheap; the tree and tokens are shared and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseEntry {
    pub tree: Option<Arc<ParseNode>>,
    pub tokens: Arc<[TaggedToken]>,
    pub origin: EntryOrigin,
}

impl ParseEntry {
    pub fn derived(derivation: Derivation) -> Self {
        Self {
            tree: derivation.tree.map(Arc::new),
            tokens: derivation.tokens.into(),
            origin: EntryOrigin::Derived,
        }
    }

    pub fn synthetic(tree: ParseNode, tokens: Vec<TaggedToken>) -> Self {
        Self {
            tree: Some(Arc::new(tree)),
            tokens: tokens.into(),
            origin: EntryOrigin::Synthetic,
        }
    }

    pub fn tree(&self) -> Option<&ParseNode> {
        self.tree.as_deref()
    }

    /// The tag sequence, in token order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.tag.as_str())
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == EntryOrigin::Synthetic
    }
}

/// Counters kept by the cache over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls made to the derivation service.
    pub derivations: usize,
    pub hits: usize,
    /// Entries inserted by merges.
    pub synthetic: usize,
}

/// Fragment text → [`ParseEntry`], scoped to one document.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: HashMap<String, ParseEntry>,
    stats: CacheStats,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `text`, deriving and storing it on first sight.
    ///
    /// A present entry is returned unchanged, whether derived or synthetic;
    /// the deriver is called at most once per distinct text.
    pub fn lookup(&mut self, text: &str, deriver: &dyn Deriver) -> ParseEntry {
        if let Some(entry) = self.entries.get(text) {
            self.stats.hits += 1;
            tracing::trace!(fragment = text, synthetic = entry.is_synthetic(), "cache hit");
            return entry.clone();
        }

        let entry = ParseEntry::derived(deriver.derive(text));
        self.stats.derivations += 1;
        tracing::debug!(fragment = text, parsed = entry.tree.is_some(), "derived");
        self.entries.insert(text.to_string(), entry.clone());
        entry
    }

    /// Store a synthetic entry for text a merge just built. A later merge
    /// that builds the same text again replaces it.
    pub fn insert_synthetic(&mut self, text: &str, entry: ParseEntry) {
        debug_assert!(entry.is_synthetic());
        self.stats.synthetic += 1;
        if self.entries.insert(text.to_string(), entry).is_some() {
            tracing::trace!(fragment = text, "synthetic entry replaced");
        }
    }

    pub fn get(&self, text: &str) -> Option<&ParseEntry> {
        self.entries.get(text)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Deriver that counts calls and tags every word `NN`.
    struct CountingDeriver {
        calls: Cell<usize>,
    }

    impl Deriver for CountingDeriver {
        fn derive(&self, text: &str) -> Derivation {
            self.calls.set(self.calls.get() + 1);
            Derivation {
                tree: None,
                tokens: text.split_whitespace().map(|w| TaggedToken::new(w, "NN")).collect(),
            }
        }
    }

    fn counting() -> CountingDeriver {
        CountingDeriver { calls: Cell::new(0) }
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let deriver = counting();
        let mut cache = ClassificationCache::new();

        let first = cache.lookup("the dog", &deriver);
        let second = cache.lookup("the dog", &deriver);

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first.tokens, &second.tokens), "second lookup should share the stored entry");
        assert_eq!(deriver.calls.get(), 1);
        assert_eq!(cache.stats(), CacheStats { derivations: 1, hits: 1, synthetic: 0 });
    }

    #[test]
    fn test_distinct_texts_derive_separately() {
        let deriver = counting();
        let mut cache = ClassificationCache::new();
        cache.lookup("a", &deriver);
        cache.lookup("b", &deriver);
        cache.lookup("a ", &deriver);
        assert_eq!(deriver.calls.get(), 3, "keys are exact text");
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_synthetic_entry_wins_over_deriver() {
        let deriver = counting();
        let mut cache = ClassificationCache::new();
        let tree = ParseNode::interior("Root", vec![ParseNode::leaf("NN", "x")]);
        let synthetic = ParseEntry::synthetic(tree, vec![TaggedToken::new("x", "NN")]);

        cache.insert_synthetic("x and y", synthetic.clone());
        let found = cache.lookup("x and y", &deriver);

        assert_eq!(found, synthetic);
        assert!(found.is_synthetic());
        assert_eq!(deriver.calls.get(), 0);
        assert_eq!(cache.stats().synthetic, 1);
    }

    #[test]
    fn test_entry_tags() {
        let entry = ParseEntry::derived(Derivation {
            tree: None,
            tokens: vec![TaggedToken::new("dogs", "NNS"), TaggedToken::new("bark", "VBP")],
        });
        assert_eq!(entry.tags().collect::<Vec<_>>(), vec!["NNS", "VBP"]);
        assert!(!entry.is_synthetic());
        assert!(entry.tree().is_none());
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = ClassificationCache::new();
        assert!(cache.is_empty());
        assert!(!cache.contains("anything"));
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
