// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! arXiv identifier extraction and canonicalization.

/// A canonical arXiv id, version-stripped for indexing but retained for
/// citing purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivId {
    /// e.g. "2401.12345" or "math.GT/0309136", without a version suffix.
    pub id: String,
    /// The version suffix as authored, e.g. `Some("2")` for `v2`.
    pub version: Option<String>,
}

/// Extracts an arXiv id (and optional version) from a bare id or a
/// `arxiv.org/abs/` / `arxiv.org/pdf/` URL. Returns `None` for anything
/// that doesn't match either the new-style (`YYYY.NNNNN`) or legacy-style
/// (`subject/NNNNNNN`) shape.
pub fn extract_arxiv(input: &str) -> Option<ArxivId> {
    let mut s = input.trim();

    for prefix in ["arXiv:", "arxiv:", "arXiv ", "arxiv "] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }

    if let Some(rest) = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
    {
        let (host, path) = rest.split_once('/')?;
        let host = host.to_ascii_lowercase();
        if !host.ends_with("arxiv.org") {
            return None;
        }
        let mut path = path.split(['?', '#']).next().unwrap_or(path);
        path = path.trim_start_matches('/');
        if let Some(rest) = path.strip_prefix("abs/") {
            s = rest;
        } else if let Some(rest) = path.strip_prefix("pdf/") {
            s = rest.strip_suffix(".pdf").unwrap_or(rest);
        } else {
            return None;
        }
    }

    let s = s.trim_matches('/');
    parse_bare(s)
}

fn parse_bare(s: &str) -> Option<ArxivId> {
    // New style: 4 digits, '.', 4-5 digits, optional version.
    if let Some((core, version)) = split_version(s) {
        if is_new_style(core) {
            return Some(ArxivId {
                id: core.to_string(),
                version,
            });
        }
        if is_legacy_style(core) {
            return Some(ArxivId {
                id: core.to_string(),
                version,
            });
        }
    }
    None
}

fn split_version(s: &str) -> Option<(&str, Option<String>)> {
    if let Some(v_pos) = s.rfind('v') {
        let (core, rest) = s.split_at(v_pos);
        let version = &rest[1..];
        if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) {
            return Some((core, Some(version.to_string())));
        }
    }
    Some((s, None))
}

fn is_new_style(s: &str) -> bool {
    let Some((year_month, suffix)) = s.split_once('.') else {
        return false;
    };
    year_month.len() == 4
        && year_month.chars().all(|c| c.is_ascii_digit())
        && (4..=5).contains(&suffix.len())
        && suffix.chars().all(|c| c.is_ascii_digit())
}

fn is_legacy_style(s: &str) -> bool {
    let Some((subject, number)) = s.split_once('/') else {
        return false;
    };
    !subject.is_empty()
        && subject
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '.' || c == '-')
        && number.len() == 7
        && number.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_from_abs_url() {
        let id = extract_arxiv("https://arxiv.org/abs/2401.12345").unwrap();
        assert_eq!(id.id, "2401.12345");
        assert_eq!(id.version, None);
    }

    #[test]
    fn extracts_from_pdf_url_with_suffix_stripped() {
        let id = extract_arxiv("https://arxiv.org/pdf/2401.12345v2.pdf").unwrap();
        assert_eq!(id.id, "2401.12345");
        assert_eq!(id.version, Some("2".to_string()));
    }

    #[test]
    fn extracts_legacy_style() {
        let id = extract_arxiv("https://arxiv.org/abs/math.GT/0309136").unwrap();
        assert_eq!(id.id, "math.GT/0309136");
    }

    #[test]
    fn bare_id_with_prefix() {
        let id = extract_arxiv("arXiv:2401.12345").unwrap();
        assert_eq!(id.id, "2401.12345");
    }

    #[test]
    fn rejects_non_arxiv_host() {
        assert_eq!(extract_arxiv("https://example.com/abs/2401.12345"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(extract_arxiv("not an id"), None);
    }
}
