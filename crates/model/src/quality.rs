// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Deny-lists and pattern tables shared by the auto-add gateway's entry
//! validator and the pre-emit sanitizer, so the two stay in
//! sync on what counts as a stub title or an organization masquerading as
//! a person author.

/// Hosts that show up as a BibTeX title when a fetch or a lazy import
/// copied the URL's domain instead of the real title.
pub const KNOWN_DOMAIN_TITLES: &[&str] = &[
    "amazon.com",
    "amazon.de",
    "amazon.co.uk",
    "github.com",
    "arxiv.org",
    "doi.org",
    "dx.doi.org",
    "scholar.google.com",
    "researchgate.net",
];

/// Prefixes/whole-string patterns that mark a title as a placeholder
/// rather than a real one. Checked case-insensitively.
pub const STUB_TITLE_PATTERNS: &[&str] = &["web page by ", "untitled"];

/// Single-word titles that show up verbatim when a lazy import or a
/// failed scrape captured a page's navigation label instead of its real
/// title. Checked only against titles with no internal whitespace — a
/// genuine one-word title ("Dune", "Frankenstein") never matches this
/// list, so the check stays a deny-list lookup rather than a "one word is
/// suspicious" heuristic.
pub const STUB_SINGLE_WORD_TITLES: &[&str] =
    &["home", "index", "abstract", "article", "document", "page", "loading", "error", "pdf"];

/// Words that mark an author's family name as an organization rather than
/// a person, when there's no given name to go with it.
pub const ORGANIZATION_DENYLIST: &[&str] = &[
    "inc", "inc.", "ltd", "ltd.", "llc", "commission", "institute", "university",
    "council", "foundation", "corporation", "corp", "corp.", "association",
    "committee", "organization", "society", "consortium",
];

pub fn is_known_domain_title(title: &str) -> bool {
    let lower = title.trim().to_lowercase();
    KNOWN_DOMAIN_TITLES.iter().any(|domain| lower == *domain)
}

pub fn is_stub_title(title: &str) -> bool {
    let lower = title.trim().to_lowercase();
    if lower.is_empty() {
        return true;
    }
    if STUB_TITLE_PATTERNS.iter().any(|p| lower.starts_with(p) || lower == *p) {
        return true;
    }
    // A bare four-digit year, or a single trailing word with no spaces
    // and no letters worth indexing, reads as a stub rather than a title.
    if lower.chars().all(|c| c.is_ascii_digit()) && lower.len() == 4 {
        return true;
    }
    if !lower.contains(' ') && STUB_SINGLE_WORD_TITLES.contains(&lower.as_str()) {
        return true;
    }
    false
}

pub fn looks_like_organization(name: &str) -> bool {
    let lower = name.to_lowercase();
    ORGANIZATION_DENYLIST
        .iter()
        .any(|word| lower.split(|c: char| !c.is_alphanumeric()).any(|token| token == *word))
}

/// Whole-token markers that mean a citation key is a placeholder rather
/// than a resolved reference. Shared by the emitter's key generator
/// and the post-compile verifier, which both need to recognize the
/// exact same shapes.
pub const FORBIDDEN_KEY_TOKENS: &[&str] = &["dryrun", "tmp", "unresolved", "todo", "pending"];

pub fn is_forbidden_key(key: &str) -> bool {
    key.split('_').any(|token| FORBIDDEN_KEY_TOKENS.contains(&token))
}

/// Literal substrings that mark a citation as unresolved wherever they
/// show up in compiled output — the PDF body or the `.bbl`.
pub const UNRESOLVED_MARKERS: &[&str] = &["(?)", "(Unknown", "(Anonymous", "[?]"];

pub fn find_unresolved_markers(text: &str) -> Vec<&'static str> {
    UNRESOLVED_MARKERS
        .iter()
        .copied()
        .filter(|marker| text.contains(marker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_domain_titles() {
        assert!(is_known_domain_title("github.com"));
        assert!(!is_known_domain_title("Attention Is All You Need"));
    }

    #[test]
    fn detects_stub_titles() {
        assert!(is_stub_title("Web page by John Smith"));
        assert!(is_stub_title("Untitled"));
        assert!(is_stub_title("2020"));
        assert!(!is_stub_title("Attention Is All You Need"));
    }

    #[test]
    fn detects_single_trailing_word_stub_titles() {
        assert!(is_stub_title("Home"));
        assert!(is_stub_title("index"));
        // A real one-word title is never in the deny-list, so it passes.
        assert!(!is_stub_title("Frankenstein"));
    }

    #[test]
    fn detects_organizations() {
        assert!(looks_like_organization("European Commission"));
        assert!(looks_like_organization("Acme Institute"));
        assert!(!looks_like_organization("Smith"));
    }

    #[test]
    fn detects_forbidden_key_tokens_as_whole_words_only() {
        assert!(is_forbidden_key("url_x_com_tmp_placeholder"));
        assert!(!is_forbidden_key("doi_10_1038_nature12373"));
    }

    #[test]
    fn finds_unresolved_markers_in_text() {
        assert_eq!(find_unresolved_markers("Smith (?) argues"), vec!["(?)"]);
        assert!(find_unresolved_markers("Smith (2020) argues").is_empty());
    }
}
