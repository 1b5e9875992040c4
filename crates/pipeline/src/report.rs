// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use resolve::StrategyCounters;
use verify::VerificationReport;

use crate::config::ConfigSummary;

/// Library-load section of `report.json`: index sizes plus any
/// non-fatal warnings (duplicate identifiers, a tolerated empty library).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibrarySection {
    pub record_count: usize,
    pub doi_index_size: usize,
    pub arxiv_index_size: usize,
    pub isbn_index_size: usize,
    pub url_index_size: usize,
    pub url_bearing_references: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionSection {
    pub occurrence_count: usize,
}

/// One occurrence's full matcher diagnostic trail, embedded in the report
/// so a miss is always traceable to "which identifier, which strategies,
/// why each failed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceDiagnostic {
    pub occurrence_index: usize,
    pub raw_text: String,
    pub raw_url: String,
    pub canonical_url: Option<String>,
    pub resolved: bool,
    pub strategy: Option<String>,
    pub attempts: Vec<resolve::Attempt>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingSection {
    pub counters: StrategyCounters,
    pub resolved_count: usize,
    pub unresolved_count: usize,
    pub diagnostics: Vec<OccurrenceDiagnostic>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoAddSection {
    pub policy: String,
    pub added_count: usize,
    pub planned_count: usize,
    pub failure_count: usize,
    pub failures: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmissionSection {
    pub entry_count: usize,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SanitizerSection {
    pub domain_as_title: usize,
    pub stub_title: usize,
    pub organization_as_author: usize,
    pub missing_arxiv_eprint: usize,
    pub unknown_author: usize,
    pub repaired: usize,
    pub needs_manual_review: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplacementSection {
    pub resolved_count: usize,
    pub rewritten_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Outcome {
    Success,
    Failure { gate: String, message: String },
}

/// The full structured run report, written to `output-dir/report.json` on
/// success or failure alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub config: ConfigSummary,
    pub library: LibrarySection,
    pub extraction: ExtractionSection,
    pub matching: MatchingSection,
    pub auto_add: Option<AutoAddSection>,
    pub emission: Option<EmissionSection>,
    pub sanitizer: Option<SanitizerSection>,
    pub replacement: Option<ReplacementSection>,
    pub verification: Option<VerificationReport>,
    pub outcome: Outcome,
}

impl Report {
    pub fn new(config: ConfigSummary) -> Self {
        Report {
            config,
            library: LibrarySection::default(),
            extraction: ExtractionSection::default(),
            matching: MatchingSection::default(),
            auto_add: None,
            emission: None,
            sanitizer: None,
            replacement: None,
            verification: None,
            outcome: Outcome::Success,
        }
    }
}
