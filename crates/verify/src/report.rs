// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Hard,
    Soft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    /// Short machine-stable slug: `unresolved_marker`, `missing_bib_entry`,
    /// `unused_bib_entry`, `domain_title`, `stub_title`, `temp_key`.
    pub kind: String,
    pub detail: String,
    pub example: Option<String>,
}

/// The post-compile verifier's full output. `is_success` is the single
/// source of truth the orchestrator checks — a zero exit code from a
/// LaTeX toolchain is never enough on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationReport {
    pub bbl_keys: Vec<String>,
    pub bib_keys: Vec<String>,
    pub findings: Vec<Finding>,
}

impl VerificationReport {
    pub fn hard_count(&self) -> usize {
        self.findings.iter().filter(|f| f.severity == Severity::Hard).count()
    }

    pub fn soft_count(&self) -> usize {
        self.findings.iter().filter(|f| f.severity == Severity::Soft).count()
    }

    pub fn is_success(&self) -> bool {
        self.hard_count() == 0
    }

    pub fn findings_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}
