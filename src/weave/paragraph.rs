//! The paragraph reducer: fold the merged fragments into one passage.
//!
//! | accumulator | next      | result                   |
//! |-------------|-----------|--------------------------|
//! | clause      | clause    | `acc\nnext`              |
//! | clause      | other     | `acc before next`        |
//! | other       | clause    | `next after acc`         |
//! | other       | other     | `acc and next` (logged)  |
//!
//! The fold is not associative; it must run left to right.

use crate::weave::classify::is_clause;
use crate::weave::{is_blank, synth, Session};

/// Separator between two joined clauses.
pub const CLAUSE_SEPARATOR: &str = "\n";

pub fn concat(session: &mut Session<'_>, acc: &str, next: &str) -> String {
    if is_blank(next) {
        return acc.to_string();
    }
    if is_blank(acc) {
        return next.to_string();
    }

    let grammar = session.grammar();
    let acc_entry = session.lookup(acc);
    let next_entry = session.lookup(next);

    let (text, entry) = match (is_clause(&acc_entry, grammar), is_clause(&next_entry, grammar)) {
        (true, true) => {
            session.counts_mut().clause_joins += 1;
            tracing::debug!(left = acc, right = next, "clauses joined");
            (
                format!("{acc}{CLAUSE_SEPARATOR}{next}"),
                synth::join_clauses(&acc_entry, &next_entry, grammar),
            )
        }
        (true, false) => {
            session.counts_mut().attachments += 1;
            tracing::debug!(clause = acc, attached = next, "attached before");
            (
                format!("{acc} {} {next}", synth::BEFORE),
                synth::attach(&acc_entry, synth::BEFORE, &next_entry, grammar),
            )
        }
        (false, true) => {
            session.counts_mut().attachments += 1;
            tracing::debug!(clause = next, attached = acc, "attached after");
            (
                format!("{next} {} {acc}", synth::AFTER),
                synth::attach(&next_entry, synth::AFTER, &acc_entry, grammar),
            )
        }
        (false, false) => {
            session.counts_mut().fallback_joins += 1;
            tracing::warn!(left = acc, right = next, "joining two fragments that are not clauses");
            (
                format!("{acc} {} {next}", synth::AND),
                synth::fallback_join(&acc_entry, &next_entry, grammar),
            )
        }
    };

    session.inject(&text, entry);
    text
}

/// Fold `fragments` through [`concat`], starting from the empty string.
pub fn reduce<S: AsRef<str>>(session: &mut Session<'_>, fragments: &[S]) -> String {
    fragments
        .iter()
        .fold(String::new(), |acc, next| concat(session, &acc, next.as_ref()))
}
