// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pre-Emit Sanitizer: a deterministic, idempotent rule set that runs
//! between bibliography emission and LaTeX compilation. Every repair is sourced from the
//! library snapshot — the sanitizer never invents metadata.

use std::collections::BTreeMap;

use biblatex::{Bibliography, ChunksExt};
use ident::extract_arxiv;
use model::{is_known_domain_title, is_stub_title, looks_like_organization, LibrarySnapshot};

use crate::error::SanitizeError;
use crate::render::escape_latex;

#[derive(Debug, Clone, Default)]
pub struct SanitizeReport {
    pub domain_as_title: Vec<String>,
    pub stub_title: Vec<String>,
    pub organization_as_author: Vec<String>,
    pub missing_arxiv_eprint: Vec<String>,
    pub unknown_author: Vec<String>,
    pub repaired: Vec<String>,
    pub needs_manual_review: Vec<String>,
}

pub fn sanitize(
    bibtex_text: &str,
    snapshot: &LibrarySnapshot,
    strict: bool,
) -> Result<(String, SanitizeReport), SanitizeError> {
    let bibliography = Bibliography::parse(bibtex_text)
        .map_err(|e| SanitizeError::ParseFailed { reason: e.to_string() })?;

    let mut report = SanitizeReport::default();
    let mut out = String::new();

    for entry in bibliography.into_iter() {
        let key = entry.key.clone();
        let entry_type = entry.entry_type.to_string().to_lowercase();
        let mut fields: BTreeMap<String, String> = entry
            .fields
            .iter()
            .map(|(name, chunks)| (name.clone(), chunks.format_verbatim()))
            .collect();

        check_title(&key, &mut fields, snapshot, strict, &mut report)?;
        check_authors(&key, &mut fields, &mut report);
        check_arxiv_eprint(&key, &mut fields, &mut report);

        if let Ok(people) = entry.author() {
            if people
                .iter()
                .any(|p| p.given_name.is_empty() && is_unknown_or_anonymous(&p.name))
            {
                report.unknown_author.push(key.clone());
                if strict {
                    return Err(SanitizeError::UnknownAuthor { key });
                }
                report.needs_manual_review.push(key.clone());
            }
        }

        out.push_str(&render_fields(&entry_type, &key, &fields));
        out.push('\n');
    }

    Ok((out, report))
}

fn is_unknown_or_anonymous(name: &str) -> bool {
    name.eq_ignore_ascii_case("unknown") || name.eq_ignore_ascii_case("anonymous")
}

fn check_title(
    key: &str,
    fields: &mut BTreeMap<String, String>,
    snapshot: &LibrarySnapshot,
    strict: bool,
    report: &mut SanitizeReport,
) -> Result<(), SanitizeError> {
    let Some(title) = fields.get("title").cloned() else { return Ok(()) };

    if is_known_domain_title(&title) {
        match find_real_title(fields, snapshot) {
            Some(real) => {
                log::debug!("{key}: repaired domain-as-title from snapshot");
                fields.insert("title".to_string(), escape_latex(&real));
                report.repaired.push(key.to_string());
            }
            None => {
                log::debug!("{key}: domain-as-title with no snapshot match");
                report.domain_as_title.push(key.to_string());
                if strict {
                    return Err(SanitizeError::MissingRealTitle { key: key.to_string() });
                }
                report.needs_manual_review.push(key.to_string());
            }
        }
    } else if is_stub_title(&title) {
        match find_real_title(fields, snapshot) {
            Some(real) => {
                log::debug!("{key}: repaired stub title from snapshot");
                fields.insert("title".to_string(), escape_latex(&real));
                report.repaired.push(key.to_string());
            }
            None => {
                log::debug!("{key}: stub title with no snapshot match");
                report.stub_title.push(key.to_string());
                if strict {
                    return Err(SanitizeError::UnrepairedStubTitle { key: key.to_string() });
                }
                report.needs_manual_review.push(key.to_string());
            }
        }
    }
    Ok(())
}

fn find_real_title(fields: &BTreeMap<String, String>, snapshot: &LibrarySnapshot) -> Option<String> {
    if let Some(doi) = fields.get("doi") {
        if let Some(record) = snapshot.by_doi(doi) {
            return Some(record.title.clone());
        }
    }
    if let Some(isbn) = fields.get("isbn") {
        if let Some(record) = snapshot.by_isbn(isbn) {
            return Some(record.title.clone());
        }
    }
    if let Some(eprint) = fields.get("eprint") {
        if let Some(record) = snapshot.by_arxiv(eprint) {
            return Some(record.title.clone());
        }
    }
    if let Some(url) = fields.get("url") {
        if let Some(record) = snapshot.by_url(url) {
            return Some(record.title.clone());
        }
    }
    None
}

fn check_authors(key: &str, fields: &mut BTreeMap<String, String>, report: &mut SanitizeReport) {
    let Some(author_field) = fields.get("author").cloned() else { return };

    let mut rewritten = false;
    let parts: Vec<String> = author_field
        .split(" and ")
        .map(|raw| {
            let trimmed = raw.trim();
            let (family, given) = match trimmed.split_once(',') {
                Some((f, g)) => (f.trim(), Some(g.trim())),
                None => (trimmed, None),
            };
            if given.is_none() && !family.starts_with("{{") && looks_like_organization(family) {
                rewritten = true;
                format!("{{{{{}}}}}", escape_latex(family))
            } else {
                raw.to_string()
            }
        })
        .collect();

    if rewritten {
        log::debug!("{key}: wrapped organization author in triple braces");
        fields.insert("author".to_string(), parts.join(" and "));
        report.organization_as_author.push(key.to_string());
        report.repaired.push(key.to_string());
    }
}

fn check_arxiv_eprint(key: &str, fields: &mut BTreeMap<String, String>, report: &mut SanitizeReport) {
    let Some(url) = fields.get("url").cloned() else { return };
    if !url.contains("arxiv.org/abs/") || fields.contains_key("eprint") {
        return;
    }
    if let Some(arxiv) = extract_arxiv(&url) {
        log::debug!("{key}: added missing eprint field from arxiv URL");
        fields.insert("eprint".to_string(), arxiv.id);
        report.missing_arxiv_eprint.push(key.to_string());
        report.repaired.push(key.to_string());
    }
}

fn render_fields(entry_type: &str, key: &str, fields: &BTreeMap<String, String>) -> String {
    let mut out = format!("@{entry_type}{{{key},\n");
    for (name, value) in fields {
        out.push_str(&format!("  {name} = {{{value}}},\n"));
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{EntryType, Identifiers, ReferenceRecord};
    use pretty_assertions::assert_eq;

    fn snapshot_with_doi_title(doi: &str, title: &str) -> LibrarySnapshot {
        LibrarySnapshot::build(vec![ReferenceRecord {
            id: "r1".into(),
            entry_type: EntryType::Article,
            title: title.into(),
            authors: vec![],
            year: Some(2020),
            venue: None,
            pages: None,
            volume: None,
            issue: None,
            publisher: None,
            identifiers: Identifiers { doi: Some(doi.to_string()), ..Default::default() },
        }])
    }

    #[test]
    fn repairs_domain_as_title_from_snapshot() {
        let snapshot = snapshot_with_doi_title("10.1145/3618394", "Attention Is All You Need");
        let bib = "@article{x,\n  title = {github.com},\n  doi = {10.1145/3618394},\n}\n";
        let (sanitized, report) = sanitize(bib, &snapshot, false).unwrap();
        assert!(sanitized.contains("title = {Attention Is All You Need}"));
        assert_eq!(report.repaired, vec!["x".to_string()]);
    }

    #[test]
    fn flags_domain_as_title_without_snapshot_match_and_fails_strict() {
        let snapshot = LibrarySnapshot::build(vec![]);
        let bib = "@article{x,\n  title = {github.com},\n}\n";
        let (_, report) = sanitize(bib, &snapshot, false).unwrap();
        assert_eq!(report.domain_as_title, vec!["x".to_string()]);

        let err = sanitize(bib, &snapshot, true).unwrap_err();
        assert!(matches!(err, SanitizeError::MissingRealTitle { .. }));
    }

    #[test]
    fn flags_stub_title_without_snapshot_match_and_fails_strict() {
        let snapshot = LibrarySnapshot::build(vec![]);
        let bib = "@misc{x,\n  title = {Untitled},\n}\n";
        let (_, report) = sanitize(bib, &snapshot, false).unwrap();
        assert_eq!(report.stub_title, vec!["x".to_string()]);

        let err = sanitize(bib, &snapshot, true).unwrap_err();
        assert!(matches!(err, SanitizeError::UnrepairedStubTitle { .. }));
    }

    #[test]
    fn rewrites_organization_author_to_triple_braces() {
        let snapshot = LibrarySnapshot::build(vec![]);
        let bib = "@techreport{x,\n  title = {Annual Report},\n  author = {European Commission},\n}\n";
        let (sanitized, report) = sanitize(bib, &snapshot, false).unwrap();
        assert!(sanitized.contains("author = {{{European Commission}}}"));
        assert_eq!(report.organization_as_author, vec!["x".to_string()]);
    }

    #[test]
    fn adds_missing_eprint_for_arxiv_url() {
        let snapshot = LibrarySnapshot::build(vec![]);
        let bib = "@misc{x,\n  title = {Attention Is All You Need},\n  url = {https://arxiv.org/abs/1706.03762},\n}\n";
        let (sanitized, report) = sanitize(bib, &snapshot, false).unwrap();
        assert!(sanitized.contains("eprint = {1706.03762}"));
        assert_eq!(report.missing_arxiv_eprint, vec!["x".to_string()]);
    }

    #[test]
    fn flags_unknown_author_and_fails_strict() {
        let snapshot = LibrarySnapshot::build(vec![]);
        let bib = "@misc{x,\n  title = {Some Title},\n  author = {Unknown},\n}\n";
        let (_, report) = sanitize(bib, &snapshot, false).unwrap();
        assert_eq!(report.unknown_author, vec!["x".to_string()]);

        let err = sanitize(bib, &snapshot, true).unwrap_err();
        assert!(matches!(err, SanitizeError::UnknownAuthor { .. }));
    }
}
