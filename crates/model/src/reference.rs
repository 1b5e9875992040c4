// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::author::Author;

/// BibTeX entry type. Kept close to the standard set; `Misc` is the
/// fallback for anything the loader can't classify more specifically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Article,
    Book,
    InProceedings,
    InCollection,
    Thesis,
    TechReport,
    Webpage,
    Misc,
}

impl EntryType {
    /// The BibTeX entry-type keyword used by the emitter.
    pub fn bibtex_name(self) -> &'static str {
        match self {
            EntryType::Article => "article",
            EntryType::Book => "book",
            EntryType::InProceedings => "inproceedings",
            EntryType::InCollection => "incollection",
            EntryType::Thesis => "phdthesis",
            EntryType::TechReport => "techreport",
            EntryType::Webpage => "misc",
            EntryType::Misc => "misc",
        }
    }
}

/// The full set of external identifiers present in the source for a
/// reference. Each field is already in canonical form — canonicalization
/// happens once, at load time, via the `ident` crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifiers {
    pub doi: Option<String>,
    pub arxiv_id: Option<String>,
    pub arxiv_version: Option<String>,
    pub isbn: Option<String>,
    pub url: Option<String>,
}

impl Identifiers {
    pub fn is_empty(&self) -> bool {
        self.doi.is_none() && self.arxiv_id.is_none() && self.isbn.is_none() && self.url.is_none()
    }

    /// Runs `raw_url` through the DOI/ISBN/arXiv extractors and fills in
    /// any of those fields still unset. A library export often stores an
    /// identifier only as part of a URL (a Zotero webpage item whose only
    /// recorded field is `https://arxiv.org/abs/2401.12345`) — without this,
    /// such a record is indexed only under its URL and the matcher never
    /// reaches the stronger arXiv/DOI/ISBN strategies for it.
    pub fn cross_derive_from_url(&mut self, raw_url: &str) {
        if self.doi.is_none() {
            self.doi = ident::extract_doi(raw_url);
        }
        if self.isbn.is_none() {
            self.isbn = ident::extract_isbn(raw_url);
        }
        if self.arxiv_id.is_none() {
            if let Some(parsed) = ident::extract_arxiv(raw_url) {
                self.arxiv_id = Some(parsed.id);
                self.arxiv_version = parsed.version;
            }
        }
    }
}

/// One bibliographic item loaded from the user's reference library.
/// Immutable within a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Stable local identifier, generated from the strongest available
    /// external identifier, independent of the emitted BibTeX key so the
    /// two concerns stay decoupled.
    pub id: String,
    pub entry_type: EntryType,
    pub title: String,
    pub authors: Vec<Author>,
    pub year: Option<i32>,
    pub venue: Option<String>,
    pub pages: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub publisher: Option<String>,
    pub identifiers: Identifiers,
}

impl ReferenceRecord {
    pub fn has_unknown_author(&self) -> bool {
        self.authors.iter().any(Author::is_unknown_placeholder)
    }
}
