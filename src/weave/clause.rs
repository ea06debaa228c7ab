//! The clause merger: a noun phrase followed by a verb phrase becomes the
//! clause `"A B"`.
//!
//! One pass only. The merged clause is emitted and the scan moves past the
//! pair; clauses are combined with each other later, by the reducer.

use crate::weave::classify::{is_noun_phrase, is_verb_phrase};
use crate::weave::{is_blank, synth, Session};

pub fn merge_clauses<S: AsRef<str>>(session: &mut Session<'_>, fragments: &[S]) -> Vec<String> {
    let grammar = session.grammar();
    let live: Vec<&str> = fragments.iter().map(AsRef::as_ref).filter(|f| !is_blank(f)).collect();

    let mut merged = Vec::with_capacity(live.len());
    let mut i = 0;
    while i < live.len() {
        let subject = live[i];
        if let Some(&predicate) = live.get(i + 1) {
            let subject_entry = session.lookup(subject);
            let predicate_entry = session.lookup(predicate);

            if is_noun_phrase(&subject_entry, grammar) && is_verb_phrase(&predicate_entry, grammar) {
                let text = format!("{subject} {predicate}");
                tracing::debug!(subject, predicate, "clause formed");
                session.inject(&text, synth::clause(&subject_entry, &predicate_entry, grammar));
                session.counts_mut().clause_merges += 1;
                merged.push(text);
                i += 2;
                continue;
            }
        }
        merged.push(subject.to_string());
        i += 1;
    }
    merged
}
