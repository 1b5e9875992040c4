// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Surgical rewrite pass: turns each resolved citation's link span
//! into a citation command, leaving everything else byte-for-byte intact.
//! Uses the spans produced by [`crate::extract::extract`] directly rather
//! than re-parsing or re-serializing the document.

use std::collections::HashMap;

use model::CitationOccurrence;

pub const DEFAULT_SURFACE_FORM: &str = "citep";

/// Result of a rewrite: the new Markdown text, and the indices of any
/// occurrences that had no bound key and were therefore left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementOutcome {
    pub markdown: String,
    pub unresolved: Vec<usize>,
}

/// Replaces every occurrence with a bound key in `keys` by
/// `\<surface_form>{key}`; occurrences absent from `keys` are left as the
/// original `[text](url)` and reported in `unresolved`.
pub fn replace(
    markdown_text: &str,
    occurrences: &[CitationOccurrence],
    keys: &HashMap<usize, String>,
    surface_form: &str,
) -> ReplacementOutcome {
    let mut ordered: Vec<&CitationOccurrence> = occurrences.iter().collect();
    ordered.sort_by_key(|occ| occ.span.start);

    let mut out = String::with_capacity(markdown_text.len());
    let mut cursor = 0usize;
    let mut unresolved = Vec::new();

    for occ in ordered {
        out.push_str(&markdown_text[cursor..occ.span.start]);
        match keys.get(&occ.index) {
            Some(key) => out.push_str(&format!("\\{surface_form}{{{key}}}")),
            None => {
                out.push_str(&markdown_text[occ.span.start..occ.span.end]);
                unresolved.push(occ.index);
            }
        }
        cursor = occ.span.end;
    }
    out.push_str(&markdown_text[cursor..]);

    ReplacementOutcome { markdown: out, unresolved }
}
