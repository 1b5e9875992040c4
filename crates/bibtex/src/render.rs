// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders a matched reference record to a BibTeX entry. Hand-rolled
//! rather than delegated to a library writer, because the formatting
//! contract here (triple-braced corporate authors, specific field
//! escaping, specific key priority) needs exact, deterministic control.

use model::{Author, EntryType, ReferenceRecord};

pub fn render_entry(key: &str, record: &ReferenceRecord) -> String {
    let mut fields: Vec<(&str, String)> = Vec::new();

    if !record.authors.is_empty() {
        fields.push(("author", render_authors(&record.authors)));
    }
    fields.push(("title", escape_latex(&record.title)));
    if let Some(year) = record.year {
        fields.push(("year", year.to_string()));
    }
    if let Some(venue) = &record.venue {
        fields.push((venue_field_name(record.entry_type), escape_latex(venue)));
    }
    if let Some(volume) = &record.volume {
        fields.push(("volume", escape_latex(volume)));
    }
    if let Some(issue) = &record.issue {
        fields.push(("number", escape_latex(issue)));
    }
    if let Some(pages) = &record.pages {
        fields.push(("pages", escape_latex(pages)));
    }
    if let Some(publisher) = &record.publisher {
        fields.push(("publisher", escape_latex(publisher)));
    }
    if let Some(doi) = &record.identifiers.doi {
        fields.push(("doi", doi.clone()));
    }
    if let Some(isbn) = &record.identifiers.isbn {
        fields.push(("isbn", isbn.clone()));
    }
    if let Some(arxiv_id) = &record.identifiers.arxiv_id {
        fields.push(("eprint", arxiv_id.clone()));
        let url = record
            .identifiers
            .url
            .clone()
            .unwrap_or_else(|| format!("https://arxiv.org/abs/{arxiv_id}"));
        fields.push(("url", url));
    } else if let Some(url) = &record.identifiers.url {
        fields.push(("url", url.clone()));
    }

    let mut out = format!("@{}{{{key},\n", record.entry_type.bibtex_name());
    for (name, value) in &fields {
        out.push_str(&format!("  {name} = {{{value}}},\n"));
    }
    out.push_str("}\n");
    out
}

fn venue_field_name(entry_type: EntryType) -> &'static str {
    match entry_type {
        EntryType::InProceedings | EntryType::InCollection => "booktitle",
        _ => "journal",
    }
}

fn render_authors(authors: &[Author]) -> String {
    authors.iter().map(render_author).collect::<Vec<_>>().join(" and ")
}

fn render_author(author: &Author) -> String {
    match author {
        Author::Person { family, given: Some(given) } => {
            format!("{}, {}", escape_latex(family), escape_latex(given))
        }
        Author::Person { family, given: None } => escape_latex(family),
        // Outer field braces supply the third pair, so this is the inner
        // two; together they read as `{{{Name}}}`, which keeps BibTeX from
        // splitting an organization name into family/given parts.
        Author::Corporate(name) => format!("{{{{{}}}}}", escape_latex(name)),
    }
}

pub fn escape_latex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\\' => out.push_str("\\textbackslash{}"),
            other => out.push(other),
        }
    }
    out
}
