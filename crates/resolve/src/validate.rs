// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `EntryValidator`: the strict rules a fetched record must pass before
//! the auto-add gateway will let it anywhere near the library.

use model::{is_known_domain_title, is_stub_title, ReferenceRecord};

use crate::error::ValidationError;

pub fn validate(record: &ReferenceRecord) -> Result<(), ValidationError> {
    if is_known_domain_title(&record.title) {
        return Err(ValidationError::DomainTitle { title: record.title.clone() });
    }
    if is_stub_title(&record.title) {
        return Err(ValidationError::StubTitle { title: record.title.clone() });
    }
    if record.identifiers.arxiv_id.is_some() && record.identifiers.url.is_none() {
        return Err(ValidationError::IncompleteArxivRecord);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{EntryType, Identifiers};
    use pretty_assertions::assert_eq;

    fn record(title: &str) -> ReferenceRecord {
        ReferenceRecord {
            id: "r".into(),
            entry_type: EntryType::Webpage,
            title: title.into(),
            authors: vec![],
            year: None,
            venue: None,
            pages: None,
            volume: None,
            issue: None,
            publisher: None,
            identifiers: Identifiers::default(),
        }
    }

    #[test]
    fn rejects_domain_and_stub_titles() {
        assert!(validate(&record("github.com")).is_err());
        assert!(validate(&record("Untitled")).is_err());
        assert!(validate(&record("Attention Is All You Need")).is_ok());
    }

    #[test]
    fn rejects_arxiv_record_missing_url() {
        let mut r = record("Attention Is All You Need");
        r.identifiers.arxiv_id = Some("1706.03762".to_string());
        let err = validate(&r).unwrap_err();
        assert_eq!(err.to_string(), ValidationError::IncompleteArxivRecord.to_string());
    }
}
