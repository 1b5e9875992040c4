// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! DOI extraction and canonicalization.

/// Canonical form: lowercase, resolver prefix stripped, trailing punctuation
/// and any query/fragment removed. Returns `None` for anything that doesn't
/// look like a DOI (`10.<registrant>/<suffix>`).
pub fn extract_doi(input: &str) -> Option<String> {
    let mut s = input.trim();

    for prefix in [
        "https://doi.org/",
        "http://doi.org/",
        "https://dx.doi.org/",
        "http://dx.doi.org/",
        "doi:",
        "DOI:",
    ] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
            break;
        }
    }

    // Tolerate a leading "doi.org/" with no scheme, and percent-encoding in
    // the DOI suffix (common in resolver URLs).
    if let Some(rest) = s.strip_prefix("doi.org/") {
        s = rest;
    }

    // Cut query/fragment before looking for the registrant prefix, so a DOI
    // followed by `?utm_source=...` still extracts cleanly.
    let s = s.split(['?', '#']).next().unwrap_or(s);

    let idx = s.find("10.")?;
    let candidate = &s[idx..];

    // Must contain a '/' separating registrant code from suffix.
    let slash = candidate.find('/')?;
    let (registrant, _) = candidate.split_at(slash);
    if !registrant[3..].chars().all(|c| c.is_ascii_digit()) || registrant.len() < 4 {
        return None;
    }

    let decoded = percent_decode(candidate);
    let trimmed = decoded.trim_end_matches(|c: char| {
        matches!(c, '.' | ',' | ')' | ']' | '>' | ';' | '"' | '\'' | '/')
    });

    if trimmed.is_empty() || !trimmed.contains('/') {
        return None;
    }

    Some(trimmed.to_ascii_lowercase())
}

fn percent_decode(s: &str) -> String {
    percent_decode_str(s)
}

fn percent_decode_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(byte) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                out.push(byte as char);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i] as char);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_resolver_prefixes() {
        assert_eq!(
            extract_doi("https://doi.org/10.1145/3618394"),
            Some("10.1145/3618394".to_string())
        );
        assert_eq!(
            extract_doi("http://dx.doi.org/10.1145/3618394/"),
            Some("10.1145/3618394".to_string())
        );
    }

    #[test]
    fn lowercases() {
        assert_eq!(
            extract_doi("https://doi.org/10.1145/ABCdef"),
            Some("10.1145/abcdef".to_string())
        );
    }

    #[test]
    fn strips_trailing_punctuation() {
        assert_eq!(
            extract_doi("see doi:10.1000/xyz123)."),
            Some("10.1000/xyz123".to_string())
        );
    }

    #[test]
    fn rejects_non_doi_urls() {
        assert_eq!(extract_doi("https://example.com/paper"), None);
    }

    #[test]
    fn variant_forms_of_same_doi_converge() {
        let a = extract_doi("https://doi.org/10.1145/3618394").unwrap();
        let b = extract_doi("http://dx.doi.org/10.1145/3618394/").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(
            extract_doi("https://doi.org/10.1000/xyz123?utm_source=x#frag"),
            Some("10.1000/xyz123".to_string())
        );
    }
}
