// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

use crate::reference::ReferenceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierKind {
    Doi,
    Isbn,
    Arxiv,
    Url,
}

/// Two distinct reference records claim the same canonical identifier.
/// This is always a library-side data-quality issue (spec invariant I1) —
/// it's reported, never silently merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateIdentifier {
    pub kind: IdentifierKind,
    pub value: String,
    pub kept: String,
    pub shadowed: String,
}

/// Index-size counters surfaced in the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSizes {
    pub doi: usize,
    pub arxiv: usize,
    pub isbn: usize,
    pub url: usize,
    pub url_bearing_references: usize,
}

/// The immutable in-memory view of the reference library for one pipeline
/// run, plus the four per-identifier indices the matcher queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    records: Vec<ReferenceRecord>,
    by_doi: FnvHashMap<String, usize>,
    by_arxiv: FnvHashMap<String, usize>,
    by_isbn: FnvHashMap<String, usize>,
    by_url: FnvHashMap<String, usize>,
    pub duplicates: Vec<DuplicateIdentifier>,
}

impl LibrarySnapshot {
    /// Builds the snapshot and its indices from a flat set of records,
    /// detecting (but not merging) duplicate identifiers per I1. Tie-break
    /// on a collision is first-by-insertion-order, per the §9 Open
    /// Question resolution recorded in DESIGN.md.
    pub fn build(records: Vec<ReferenceRecord>) -> Self {
        let mut by_doi = FnvHashMap::default();
        let mut by_arxiv = FnvHashMap::default();
        let mut by_isbn = FnvHashMap::default();
        let mut by_url = FnvHashMap::default();
        let mut duplicates = Vec::new();

        for (i, record) in records.iter().enumerate() {
            if let Some(doi) = &record.identifiers.doi {
                insert_or_flag(
                    &mut by_doi,
                    &mut duplicates,
                    IdentifierKind::Doi,
                    doi.clone(),
                    i,
                    &records,
                );
            }
            if let Some(arxiv) = &record.identifiers.arxiv_id {
                insert_or_flag(
                    &mut by_arxiv,
                    &mut duplicates,
                    IdentifierKind::Arxiv,
                    arxiv.clone(),
                    i,
                    &records,
                );
            }
            if let Some(isbn) = &record.identifiers.isbn {
                insert_or_flag(
                    &mut by_isbn,
                    &mut duplicates,
                    IdentifierKind::Isbn,
                    isbn.clone(),
                    i,
                    &records,
                );
            }
            if let Some(url) = &record.identifiers.url {
                insert_or_flag(
                    &mut by_url,
                    &mut duplicates,
                    IdentifierKind::Url,
                    url.clone(),
                    i,
                    &records,
                );
            }
        }

        LibrarySnapshot {
            records,
            by_doi,
            by_arxiv,
            by_isbn,
            by_url,
            duplicates,
        }
    }

    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_doi(&self, doi: &str) -> Option<&ReferenceRecord> {
        self.by_doi.get(doi).map(|&i| &self.records[i])
    }

    pub fn by_arxiv(&self, id: &str) -> Option<&ReferenceRecord> {
        self.by_arxiv.get(id).map(|&i| &self.records[i])
    }

    pub fn by_isbn(&self, isbn: &str) -> Option<&ReferenceRecord> {
        self.by_isbn.get(isbn).map(|&i| &self.records[i])
    }

    pub fn by_url(&self, url: &str) -> Option<&ReferenceRecord> {
        self.by_url.get(url).map(|&i| &self.records[i])
    }

    pub fn index_sizes(&self) -> IndexSizes {
        IndexSizes {
            doi: self.by_doi.len(),
            arxiv: self.by_arxiv.len(),
            isbn: self.by_isbn.len(),
            url: self.by_url.len(),
            url_bearing_references: self
                .records
                .iter()
                .filter(|r| r.identifiers.url.is_some())
                .count(),
        }
    }
}

fn insert_or_flag(
    index: &mut FnvHashMap<String, usize>,
    duplicates: &mut Vec<DuplicateIdentifier>,
    kind: IdentifierKind,
    value: String,
    candidate: usize,
    records: &[ReferenceRecord],
) {
    match index.get(&value) {
        Some(&existing) => {
            duplicates.push(DuplicateIdentifier {
                kind,
                value,
                kept: records[existing].id.clone(),
                shadowed: records[candidate].id.clone(),
            });
        }
        None => {
            index.insert(value, candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{EntryType, Identifiers};
    use pretty_assertions::assert_eq;

    fn record(id: &str, doi: Option<&str>) -> ReferenceRecord {
        ReferenceRecord {
            id: id.to_string(),
            entry_type: EntryType::Article,
            title: "T".to_string(),
            authors: vec![],
            year: Some(2020),
            venue: None,
            pages: None,
            volume: None,
            issue: None,
            publisher: None,
            identifiers: Identifiers {
                doi: doi.map(|d| d.to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn first_insertion_wins_and_duplicate_is_reported() {
        let snapshot = LibrarySnapshot::build(vec![
            record("a", Some("10.1/x")),
            record("b", Some("10.1/x")),
        ]);
        assert_eq!(snapshot.by_doi("10.1/x").unwrap().id, "a");
        assert_eq!(snapshot.duplicates.len(), 1);
        assert_eq!(snapshot.duplicates[0].kept, "a");
        assert_eq!(snapshot.duplicates[0].shadowed, "b");
    }

    #[test]
    fn index_sizes_reflect_contents() {
        let snapshot = LibrarySnapshot::build(vec![record("a", Some("10.1/x")), record("b", None)]);
        let sizes = snapshot.index_sizes();
        assert_eq!(sizes.doi, 1);
        assert_eq!(sizes.arxiv, 0);
    }
}
