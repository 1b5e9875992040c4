// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Defect-pattern scanning shared by the PDF-text check and the `.bbl`
//! body check: literal unresolved-citation markers, stub/domain titles,
//! and temp-key shapes, surfaced via `model::quality` so every component
//! agrees on what counts as a defect.

use model::{find_unresolved_markers, is_known_domain_title, is_stub_title};

use crate::report::{Finding, Severity};

/// Scans a block of rendered text (PDF body or one `.bbl` item) for
/// literal unresolved-citation markers. Always `hard`: reaching compiled
/// output at all means every earlier stage believed the citation was
/// resolved.
pub fn scan_unresolved_markers(label: &str, text: &str) -> Vec<Finding> {
    find_unresolved_markers(text)
        .into_iter()
        .map(|marker| Finding {
            severity: Severity::Hard,
            kind: "unresolved_marker".to_string(),
            detail: format!("{label} contains the unresolved marker `{marker}`"),
            example: Some(excerpt_around(text, marker)),
        })
        .collect()
}

/// Scans one `.bbl` item's rendered body for the stub/domain-title
/// deny-lists. These only make sense against the title-shaped line of a
/// bibliography entry, so the caller passes the full item body and this
/// checks whether any line in it matches a known placeholder shape.
pub fn scan_title_defects(key: &str, body: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    for line in body.lines() {
        let candidate = line.trim();
        if candidate.is_empty() {
            continue;
        }
        if is_known_domain_title(candidate) {
            findings.push(Finding {
                severity: Severity::Hard,
                kind: "domain_title".to_string(),
                detail: format!("entry `{key}` renders a bare domain name as its title"),
                example: Some(candidate.to_string()),
            });
        } else if is_stub_title(candidate) {
            findings.push(Finding {
                severity: Severity::Hard,
                kind: "stub_title".to_string(),
                detail: format!("entry `{key}` renders a placeholder-shaped title"),
                example: Some(candidate.to_string()),
            });
        }
    }
    findings
}

fn excerpt_around(text: &str, marker: &str) -> String {
    const RADIUS: usize = 40;
    match text.find(marker) {
        Some(pos) => {
            let start = text[..pos].char_indices().rev().nth(RADIUS).map(|(i, _)| i).unwrap_or(0);
            let end_offset = pos + marker.len();
            let end = text[end_offset..]
                .char_indices()
                .nth(RADIUS)
                .map(|(i, _)| end_offset + i)
                .unwrap_or(text.len());
            text[start..end].trim().to_string()
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_unresolved_marker_with_excerpt() {
        let findings = scan_unresolved_markers("pdf page 3", "as shown by Smith (?) in prior work");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Hard);
        assert!(findings[0].example.as_ref().unwrap().contains("Smith (?)"));
    }

    #[test]
    fn clean_text_has_no_findings() {
        assert!(scan_unresolved_markers("pdf page 1", "Smith (2020) argues").is_empty());
    }

    #[test]
    fn flags_domain_title_and_stub_title_as_hard() {
        let domain = scan_title_defects("k1", "github.com\nSmith, J.\n");
        assert_eq!(domain[0].severity, Severity::Hard);
        assert_eq!(domain[0].kind, "domain_title");

        let stub = scan_title_defects("k2", "Untitled\nSmith, J.\n");
        assert_eq!(stub[0].severity, Severity::Hard);
        assert_eq!(stub[0].kind, "stub_title");
    }
}
