//! The phrase merger: adjacent phrases of one kind become `"A and B"`.
//!
//! A merged phrase stays in place and is compared against the next
//! fragment, so a run of noun phrases collapses into one in a single
//! left-to-right traversal.

use crate::weave::classify::{is_noun_phrase, same_phrase_type};
use crate::weave::{is_blank, synth, Session};

pub fn merge_phrases<S: AsRef<str>>(session: &mut Session<'_>, fragments: &[S]) -> Vec<String> {
    let grammar = session.grammar();
    let mut live = fragments.iter().map(AsRef::as_ref).filter(|f| !is_blank(f));

    let mut merged = Vec::new();
    let Some(first) = live.next() else {
        return merged;
    };

    let mut current = first.to_string();
    let mut current_entry = session.lookup(&current);

    for next in live {
        let next_entry = session.lookup(next);

        if !same_phrase_type(&current_entry, &next_entry, grammar) {
            merged.push(std::mem::replace(&mut current, next.to_string()));
            current_entry = next_entry;
            continue;
        }

        let label = if is_noun_phrase(&current_entry, grammar) && is_noun_phrase(&next_entry, grammar) {
            &grammar.noun_phrase
        } else {
            &grammar.verb_phrase
        };
        let text = format!("{current} {} {next}", synth::AND);
        let entry = synth::coordinate(&current_entry, &next_entry, label, grammar);
        tracing::debug!(left = %current, right = next, phrase = %label, "phrases merged");

        session.inject(&text, entry.clone());
        session.counts_mut().phrase_merges += 1;
        current = text;
        current_entry = entry;
    }

    merged.push(current);
    merged
}
