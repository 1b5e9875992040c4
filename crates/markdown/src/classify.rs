// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The "does this link look like a citation" heuristic. Deliberately
//! narrow: a missed classification just leaves an ordinary hyperlink alone,
//! which is always the safe default.

use ident::{extract_arxiv, extract_doi};

/// A link is an academic citation when its text carries a bare four-digit
/// year and either an author-shaped token precedes it, or the destination
/// itself resolves to a DOI or arXiv id.
pub fn is_academic_citation(link_text: &str, dest_url: &str) -> bool {
    let Some(year_pos) = find_year(link_text) else {
        return false;
    };
    let preceding = &link_text[..year_pos];
    if has_author_token(preceding) {
        return true;
    }
    extract_doi(dest_url).is_some() || extract_arxiv(dest_url).is_some()
}

/// Byte offset of the first run of exactly four ASCII digits not embedded
/// in a longer digit run (so "12345" and "20" don't count, but "2020" and
/// "2020a" do).
fn find_year(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i + 4 <= bytes.len() {
        if bytes[i..i + 4].iter().all(u8::is_ascii_digit) {
            let before_ok = i == 0 || !bytes[i - 1].is_ascii_digit();
            let after_ok = i + 4 >= bytes.len() || !bytes[i + 4].is_ascii_digit();
            if before_ok && after_ok {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn has_author_token(preceding: &str) -> bool {
    if preceding.contains("et al.") {
        return true;
    }
    preceding
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.len() > 1 && word.chars().next().is_some_and(char::is_uppercase))
}
