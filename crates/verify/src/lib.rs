// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Post-Compile Verifier: the last line of defense before a pipeline
//! run is declared successful. A LaTeX/BibTeX toolchain exiting zero only
//! means it didn't crash — it says nothing about whether the bibliography
//! it produced still contains a placeholder a reader would see as `(?)`.
//! This crate re-parses the compiled artifacts themselves and asserts
//! their absence directly.

mod bbl;
mod error;
mod pdf;
mod report;
mod scan;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use biblatex::Bibliography;
use model::is_forbidden_key;

pub use bbl::BblItem;
pub use error::VerifyError;
pub use report::{Finding, Severity, VerificationReport};

/// Runs every post-compile check and returns one structured report. The
/// caller decides what to do with a non-empty hard-finding set; this
/// function never itself treats strict mode as special — that policy
/// lives in the orchestrator.
pub fn verify(bbl_path: &Path, bib_path: &Path, pdf_path: &Path) -> Result<VerificationReport, VerifyError> {
    let bbl_text = fs::read_to_string(bbl_path)
        .map_err(|source| VerifyError::BblUnreadable { path: bbl_path.to_path_buf(), source })?;
    let bib_text = fs::read_to_string(bib_path)
        .map_err(|source| VerifyError::BibUnreadable { path: bib_path.to_path_buf(), source })?;

    let items = bbl::parse(&bbl_text);
    let bib_keys = bib_keys(&bib_text, bib_path)?;

    let mut findings = Vec::new();
    findings.extend(cross_reference(&items, &bib_keys));

    for item in &items {
        if is_forbidden_key(&item.key) {
            findings.push(Finding {
                severity: Severity::Hard,
                kind: "temp_key".to_string(),
                detail: format!("compiled bibliography item `{}` uses a placeholder-shaped key", item.key),
                example: Some(item.key.clone()),
            });
        }
        findings.extend(scan::scan_unresolved_markers(&format!("bbl entry `{}`", item.key), &item.body));
        findings.extend(scan::scan_title_defects(&item.key, &item.body));
    }

    let pdf_text = pdf::extract_text(pdf_path)?;
    findings.extend(scan::scan_unresolved_markers("compiled PDF", &pdf_text));

    let bbl_keys: Vec<String> = items.iter().map(|item| item.key.clone()).collect();

    log::info!(
        "verifier: {} bbl entries, {} bib entries, {} hard finding(s), {} soft finding(s)",
        bbl_keys.len(),
        bib_keys.len(),
        findings.iter().filter(|f| f.severity == Severity::Hard).count(),
        findings.iter().filter(|f| f.severity == Severity::Soft).count(),
    );

    Ok(VerificationReport { bbl_keys, bib_keys, findings })
}

fn bib_keys(bib_text: &str, bib_path: &Path) -> Result<Vec<String>, VerifyError> {
    let bibliography = Bibliography::parse(bib_text)
        .map_err(|e| VerifyError::BibParse { path: bib_path.to_path_buf(), reason: e.to_string() })?;
    Ok(bibliography.into_iter().map(|entry| entry.key).collect())
}

/// Every `.bbl` label must resolve to an emitted `.bib` entry (a missing
/// one means the compiler silently rendered a broken citation); every
/// emitted entry should in turn be cited, since the emitter only emits records
/// that at least one occurrence actually bound to — an entry with no
/// corresponding `.bbl` item means the compile step dropped a citation
/// the pipeline believed was resolved.
fn cross_reference(items: &[BblItem], bib_keys: &[String]) -> Vec<Finding> {
    let bbl_set: BTreeSet<&str> = items.iter().map(|item| item.key.as_str()).collect();
    let bib_set: BTreeSet<&str> = bib_keys.iter().map(String::as_str).collect();

    let mut findings = Vec::new();
    for key in bbl_set.difference(&bib_set) {
        findings.push(Finding {
            severity: Severity::Hard,
            kind: "missing_bib_entry".to_string(),
            detail: format!("compiled bibliography cites `{key}` but no such entry was emitted"),
            example: Some(key.to_string()),
        });
    }
    for key in bib_set.difference(&bbl_set) {
        findings.push(Finding {
            severity: Severity::Soft,
            kind: "unused_bib_entry".to_string(),
            detail: format!("emitted entry `{key}` never appears in the compiled bibliography"),
            example: Some(key.to_string()),
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cross_reference_flags_missing_and_unused_keys() {
        let items = vec![
            BblItem { key: "doi_a".to_string(), body: "Smith (2020)".to_string() },
            BblItem { key: "doi_b".to_string(), body: "Jones (2021)".to_string() },
        ];
        let bib_keys = vec!["doi_a".to_string(), "doi_c".to_string()];
        let findings = cross_reference(&items, &bib_keys);

        let missing: Vec<_> = findings.iter().filter(|f| f.kind == "missing_bib_entry").collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::Hard);
        assert_eq!(missing[0].example.as_deref(), Some("doi_b"));

        let unused: Vec<_> = findings.iter().filter(|f| f.kind == "unused_bib_entry").collect();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].severity, Severity::Soft);
        assert_eq!(unused[0].example.as_deref(), Some("doi_c"));
    }

    #[test]
    fn matching_key_sets_produce_no_cross_reference_findings() {
        let items = vec![BblItem { key: "doi_a".to_string(), body: String::new() }];
        let bib_keys = vec!["doi_a".to_string()];
        assert!(cross_reference(&items, &bib_keys).is_empty());
    }

    #[test]
    fn report_success_requires_zero_hard_findings() {
        let report = VerificationReport {
            bbl_keys: vec!["doi_a".to_string()],
            bib_keys: vec!["doi_a".to_string()],
            findings: vec![Finding {
                severity: Severity::Soft,
                kind: "unused_bib_entry".to_string(),
                detail: "x".to_string(),
                example: None,
            }],
        };
        assert!(report.is_success());
        assert_eq!(report.soft_count(), 1);
        assert_eq!(report.hard_count(), 0);
    }
}
