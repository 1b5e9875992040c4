// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fallback loader for reference libraries exported as plain BibTeX rather
//! than Zotero RDF. Parsing goes through `biblatex`'s own AST; we never
//! hand-roll a `.bib` tokenizer.

use biblatex::{Bibliography, Entry, Person};
use ident::{extract_doi, extract_isbn, normalize_url};
use model::{Author, EntryType, Identifiers, ReferenceRecord};

use crate::error::LoadError;

pub fn parse(source: &str, path_display: &str) -> Result<Vec<ReferenceRecord>, LoadError> {
    let bibliography = Bibliography::parse(source).map_err(|e| LoadError::BibtexParse {
        path: path_display.into(),
        reason: e.to_string(),
    })?;

    Ok(bibliography.into_iter().map(record_from_entry).collect())
}

fn record_from_entry(entry: Entry) -> ReferenceRecord {
    let title = entry
        .get_as::<String>("title")
        .unwrap_or_else(|_| "Untitled".to_string());
    let authors = entry
        .author()
        .map(|people| people.iter().map(person_to_author).collect())
        .unwrap_or_default();
    let year = entry.get_as::<i64>("year").ok().map(|y| y as i32);
    let venue = entry
        .get_as::<String>("journal")
        .or_else(|_| entry.get_as::<String>("booktitle"))
        .ok();
    let pages = entry.get_as::<String>("pages").ok();
    let volume = entry.get_as::<String>("volume").ok();
    let issue = entry.get_as::<String>("number").ok();
    let publisher = entry.get_as::<String>("publisher").ok();

    let doi = entry.get_as::<String>("doi").ok().and_then(|d| extract_doi(&d));
    let isbn = entry.get_as::<String>("isbn").ok().and_then(|i| extract_isbn(&i));
    let url = entry
        .get_as::<String>("url")
        .ok()
        .and_then(|u| normalize_url(&u));
    let (arxiv_id, arxiv_version) = entry
        .get_as::<String>("eprint")
        .ok()
        .and_then(|e| ident::extract_arxiv(&e))
        .map(|a| (Some(a.id), a.version))
        .unwrap_or((None, None));

    let mut identifiers = Identifiers { doi, arxiv_id, arxiv_version, isbn, url };
    // A `.bib` entry's only identifier is sometimes its `url` field (no
    // `doi`/`eprint` field at all); re-run it through the other extractors
    // so the record still indexes under its strongest identifier.
    if let Some(url) = identifiers.url.clone() {
        identifiers.cross_derive_from_url(&url);
    }

    ReferenceRecord {
        id: entry.key.clone(),
        entry_type: entry_type_of(&entry),
        title,
        authors,
        year,
        venue,
        pages,
        volume,
        issue,
        publisher,
        identifiers,
    }
}

fn entry_type_of(entry: &Entry) -> EntryType {
    match entry.entry_type.to_string().to_lowercase().as_str() {
        "article" => EntryType::Article,
        "book" => EntryType::Book,
        "incollection" => EntryType::InCollection,
        "inproceedings" | "conference" => EntryType::InProceedings,
        "phdthesis" | "mastersthesis" => EntryType::Thesis,
        "techreport" => EntryType::TechReport,
        "online" | "electronic" => EntryType::Webpage,
        _ => EntryType::Misc,
    }
}

fn person_to_author(person: &Person) -> Author {
    if person.given_name.is_empty() {
        Author::Person { family: person.name.clone(), given: None }
    } else {
        Author::Person {
            family: person.name.clone(),
            given: Some(person.given_name.clone()),
        }
    }
}
