// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bibliography Emitter: turns matched reference records into a
//! single BibTeX text plus the occurrence→key bindings the surgical
//! rewrite pass needs to rewrite the Markdown.

use std::collections::{HashMap, HashSet};

use model::ReferenceRecord;

use crate::error::EmitError;
use crate::key::{assign_keys, identifier_class_rank};
use crate::render::render_entry;

pub struct EmitOutcome {
    pub bibtex: String,
    /// Occurrence index → the key bound for it. Every record used by at
    /// least one occurrence appears exactly once in `bibtex`, regardless
    /// of how many occurrences point to it.
    pub occurrence_keys: HashMap<usize, String>,
}

pub fn emit(matched: &[(usize, &ReferenceRecord)]) -> Result<EmitOutcome, EmitError> {
    let mut unique_records = Vec::new();
    let mut seen_ids = HashSet::new();
    for (_, record) in matched {
        if seen_ids.insert(record.id.clone()) {
            unique_records.push(*record);
        }
    }

    let keys = assign_keys(unique_records.iter().copied())?;

    // Stable emission order: strongest identifier class first, then
    // lexicographic by the record's own generated key, never insertion
    // order.
    unique_records.sort_by(|a, b| {
        identifier_class_rank(a)
            .cmp(&identifier_class_rank(b))
            .then_with(|| keys[&a.id].cmp(&keys[&b.id]))
    });

    let mut bibtex = String::new();
    for record in &unique_records {
        let key = &keys[&record.id];
        bibtex.push_str(&render_entry(key, record));
        bibtex.push('\n');
    }

    let occurrence_keys = matched
        .iter()
        .map(|(occurrence_index, record)| (*occurrence_index, keys[&record.id].clone()))
        .collect();

    Ok(EmitOutcome { bibtex, occurrence_keys })
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{EntryType, Identifiers};
    use pretty_assertions::assert_eq;

    fn record(id: &str, doi: &str) -> ReferenceRecord {
        ReferenceRecord {
            id: id.into(),
            entry_type: EntryType::Article,
            title: "T".into(),
            authors: vec![],
            year: Some(2020),
            venue: None,
            pages: None,
            volume: None,
            issue: None,
            publisher: None,
            identifiers: Identifiers { doi: Some(doi.to_string()), ..Default::default() },
        }
    }

    #[test]
    fn two_occurrences_of_the_same_record_share_one_entry() {
        let r = record("r1", "10.1/x");
        let matched = vec![(0usize, &r), (1usize, &r)];
        let outcome = emit(&matched).unwrap();
        assert_eq!(outcome.bibtex.matches("@article").count(), 1);
        assert_eq!(outcome.occurrence_keys[&0], outcome.occurrence_keys[&1]);
    }

    #[test]
    fn distinct_records_get_distinct_keys() {
        let r1 = record("r1", "10.1/x");
        let r2 = record("r2", "10.1/y");
        let matched = vec![(0usize, &r1), (1usize, &r2)];
        let outcome = emit(&matched).unwrap();
        assert_ne!(outcome.occurrence_keys[&0], outcome.occurrence_keys[&1]);
    }

    fn record_with_identifiers(id: &str, identifiers: Identifiers) -> ReferenceRecord {
        ReferenceRecord {
            id: id.into(),
            entry_type: EntryType::Article,
            title: "T".into(),
            authors: vec![],
            year: Some(2020),
            venue: None,
            pages: None,
            volume: None,
            issue: None,
            publisher: None,
            identifiers,
        }
    }

    #[test]
    fn emission_order_is_strongest_identifier_class_then_key_not_insertion_order() {
        // Inserted in URL, then arXiv, then DOI order; expected output is
        // the reverse, DOI first, by the stable-order contract.
        let url_record = record_with_identifiers(
            "u",
            Identifiers { url: Some("https://example.com/z".into()), ..Default::default() },
        );
        let arxiv_record = record_with_identifiers(
            "a",
            Identifiers { arxiv_id: Some("2401.12345".into()), ..Default::default() },
        );
        let doi_record = record_with_identifiers(
            "d",
            Identifiers { doi: Some("10.1/zzz".into()), ..Default::default() },
        );

        let matched = vec![
            (0usize, &url_record),
            (1usize, &arxiv_record),
            (2usize, &doi_record),
        ];
        let outcome = emit(&matched).unwrap();

        let doi_pos = outcome.bibtex.find("doi_10_1_zzz").unwrap();
        let arxiv_pos = outcome.bibtex.find("arxiv_2401_12345").unwrap();
        let url_pos = outcome.bibtex.find("url_example_com_z").unwrap();
        assert!(doi_pos < arxiv_pos);
        assert!(arxiv_pos < url_pos);
    }
}
