// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stable BibTeX key generation: strongest-identifier priority,
//! deterministic collision handling, and a hard ban on key shapes a reader
//! could mistake for an unresolved placeholder.

use std::collections::HashMap;

use model::ReferenceRecord;

use crate::error::EmitError;

/// Rank of the identifier class a record's key was generated from, in the
/// same strongest-first priority `generate_key` uses: DOI, then ISBN, then
/// arXiv, then URL, then the bare-id fallback. Used to order emitted
/// entries "first by strongest identifier class, then lexicographic by
/// key" per the emitter's ordering contract.
pub fn identifier_class_rank(record: &ReferenceRecord) -> u8 {
    if record.identifiers.doi.is_some() {
        0
    } else if record.identifiers.isbn.is_some() {
        1
    } else if record.identifiers.arxiv_id.is_some() {
        2
    } else if record.identifiers.url.is_some() {
        3
    } else {
        4
    }
}

pub fn generate_key(record: &ReferenceRecord) -> String {
    if let Some(doi) = &record.identifiers.doi {
        return format!("doi_{}", slug(doi));
    }
    if let Some(isbn) = &record.identifiers.isbn {
        return format!("isbn_{isbn}");
    }
    if let Some(arxiv_id) = &record.identifiers.arxiv_id {
        return format!("arxiv_{}", slug(arxiv_id));
    }
    if let Some(url) = &record.identifiers.url {
        return format!("url_{}", slug_url(url));
    }
    format!("ref_{}", slug(&record.id))
}

fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_underscore = false;
    for c in input.chars() {
        let lower = c.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            out.push(lower);
            last_was_underscore = false;
        } else if !last_was_underscore {
            out.push('_');
            last_was_underscore = true;
        }
    }
    out.trim_matches('_').to_string()
}

fn slug_url(url: &str) -> String {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let slugged = slug(trimmed);
    if slugged.len() > 60 {
        slugged[..60].trim_end_matches('_').to_string()
    } else {
        slugged
    }
}

/// Assigns a collision-free key to every record, keyed by `record.id` in
/// the map returned. Collisions get a deterministic numeric suffix in
/// first-seen order; no randomness anywhere in this function.
pub fn assign_keys<'a>(records: impl Iterator<Item = &'a ReferenceRecord>) -> Result<HashMap<String, String>, EmitError> {
    let mut seen_count: HashMap<String, usize> = HashMap::new();
    let mut assigned = HashMap::new();

    for record in records {
        let base = generate_key(record);
        check_not_forbidden(&base)?;

        let key = match seen_count.get_mut(&base) {
            None => {
                seen_count.insert(base.clone(), 0);
                base
            }
            Some(count) => {
                *count += 1;
                format!("{base}_{}", *count + 1)
            }
        };
        check_not_forbidden(&key)?;
        assigned.insert(record.id.clone(), key);
    }

    Ok(assigned)
}

fn check_not_forbidden(key: &str) -> Result<(), EmitError> {
    if model::is_forbidden_key(key) {
        return Err(EmitError::ForbiddenTempKey { key: key.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{EntryType, Identifiers};
    use pretty_assertions::assert_eq;

    fn record(id: &str, identifiers: Identifiers) -> ReferenceRecord {
        ReferenceRecord {
            id: id.into(),
            entry_type: EntryType::Article,
            title: "T".into(),
            authors: vec![],
            year: None,
            venue: None,
            pages: None,
            volume: None,
            issue: None,
            publisher: None,
            identifiers,
        }
    }

    #[test]
    fn doi_takes_priority_over_url() {
        let r = record(
            "a",
            Identifiers { doi: Some("10.1145/3618394".into()), url: Some("https://x.com".into()), ..Default::default() },
        );
        assert_eq!(generate_key(&r), "doi_10_1145_3618394");
    }

    #[test]
    fn isbn_key_keeps_digits_only() {
        let r = record("b", Identifiers { isbn: Some("9781138021013".into()), ..Default::default() });
        assert_eq!(generate_key(&r), "isbn_9781138021013");
    }

    #[test]
    fn collisions_get_deterministic_numeric_suffixes() {
        let r1 = record("a", Identifiers { doi: Some("10.1/x".into()), ..Default::default() });
        let r2 = record("b", Identifiers { doi: Some("10.1/x ".into()), ..Default::default() });
        let records = vec![r1, r2];
        let keys = assign_keys(records.iter()).unwrap();
        let mut values: Vec<&String> = keys.values().collect();
        values.sort();
        assert_eq!(values, vec!["doi_10_1_x", "doi_10_1_x_2"]);
    }

    #[test]
    fn rejects_key_that_looks_like_a_temporary_placeholder() {
        let r = record("a", Identifiers { url: Some("https://tmp.example.com/dryrun/thing".into()), ..Default::default() });
        // slug() of the trimmed host+path happens to start with a digit-free
        // word, not a forbidden prefix, so build a case that actually does:
        let r2 = record("b", Identifiers { url: Some("https://x.com/tmp_placeholder".into()), ..Default::default() });
        assert!(generate_key(&r).starts_with("url_"));
        let err = assign_keys(std::iter::once(&r2)).unwrap_err();
        assert!(matches!(err, EmitError::ForbiddenTempKey { .. }));
    }
}
