// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Loader for Zotero-style RDF/XML library exports.
//!
//! Zotero's RDF export nests one element per reference directly under the
//! document root, named after its Bib/MODS item type (`bib:Article`,
//! `bib:Book`, `bib:BookSection`, ...), with `dc:`/`dcterms:`/`bib:`/`foaf:`
//! children carrying the fields. We match elements by local name only,
//! ignoring the namespace prefix roxmltree resolves it to, since exports
//! from different Zotero versions vary the prefix but not the tag.

use ident::{extract_doi, extract_isbn, normalize_url};
use model::{Author, EntryType, Identifiers, ReferenceRecord};
use roxmltree::{Document, Node};

use crate::error::LoadError;

/// Tag names (local part) that Zotero emits for bibliographic items, mapped
/// to our own `EntryType`. Deliberately excludes container/annotation
/// elements (`Attachment`, `Memo`, `Note`) which are never citable
/// references on their own.
const ITEM_TYPES: &[(&str, EntryType)] = &[
    ("Article", EntryType::Article),
    ("Book", EntryType::Book),
    ("BookSection", EntryType::InCollection),
    ("ConferenceProceedings", EntryType::InProceedings),
    ("Thesis", EntryType::Thesis),
    ("Report", EntryType::TechReport),
    ("Document", EntryType::Webpage),
    ("Manuscript", EntryType::Misc),
    ("Letter", EntryType::Misc),
    ("Image", EntryType::Misc),
    ("LegalCaseDocument", EntryType::Misc),
];

pub fn parse(source: &str, path_display: &str) -> Result<Vec<ReferenceRecord>, LoadError> {
    let doc = Document::parse(source).map_err(|e| LoadError::RdfParse {
        path: path_display.into(),
        reason: e.to_string(),
    })?;

    let mut records = Vec::new();
    for node in doc.root_element().children().filter(Node::is_element) {
        if let Some(entry_type) = item_type(&node) {
            records.push(record_from_node(&node, entry_type));
        }
    }
    Ok(records)
}

fn item_type(node: &Node) -> Option<EntryType> {
    let name = node.tag_name().name();
    ITEM_TYPES
        .iter()
        .find(|(tag, _)| *tag == name)
        .map(|(_, kind)| *kind)
}

fn record_from_node(node: &Node, entry_type: EntryType) -> ReferenceRecord {
    let title = child_text(node, "title").unwrap_or_else(|| "Untitled".to_string());
    let authors = collect_authors(node);
    let year = child_text(node, "date").and_then(|d| leading_year(&d));
    let venue = venue_of(node);
    let pages = child_text(node, "pages");
    let volume = child_text(node, "volume");
    let issue = child_text(node, "issue").or_else(|| child_text(node, "number"));
    let publisher = child_text(node, "publisher");
    let identifiers = collect_identifiers(node);

    let id = node
        .attribute(("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "about"))
        .or_else(|| node.attribute("about"))
        .unwrap_or("")
        .trim_start_matches('#')
        .to_string();

    ReferenceRecord {
        id,
        entry_type,
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

/// First direct child whose local name matches, with its trimmed text
/// content. `None` for absent or blank elements.
fn child_text(node: &Node, local_name: &str) -> Option<String> {
    node.children()
        .filter(Node::is_element)
        .find(|c| c.tag_name().name() == local_name)
        .and_then(|c| {
            let text = c.text().unwrap_or("").trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        })
}

fn find_child<'a, 'input>(node: &Node<'a, 'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .filter(Node::is_element)
        .find(|c| c.tag_name().name() == local_name)
}

fn leading_year(date_text: &str) -> Option<i32> {
    let digits: String = date_text.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        // Some exports put the year at the end ("March 2019") rather than
        // the front; fall back to the last run of four digits.
        let mut best = None;
        let mut run = String::new();
        for c in date_text.chars() {
            if c.is_ascii_digit() {
                run.push(c);
            } else {
                if run.len() == 4 {
                    best = run.parse().ok();
                }
                run.clear();
            }
        }
        if run.len() == 4 {
            best = run.parse().ok();
        }
        best
    }
}

/// `<dcterms:isPartOf><bib:Journal|bib:Series|bib:Book>...<dc:title>`, or
/// the `conference`/`proceedings` wrapper for conference papers.
fn venue_of(node: &Node) -> Option<String> {
    let wrapper = find_child(node, "isPartOf")?;
    let container = wrapper.children().filter(Node::is_element).next()?;
    child_text(&container, "title")
}

fn collect_authors(node: &Node) -> Vec<Author> {
    let Some(authors_el) = find_child(node, "authors") else {
        return Vec::new();
    };
    let Some(seq) = find_child(&authors_el, "Seq") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for li in seq.children().filter(Node::is_element) {
        if li.tag_name().name() != "li" {
            continue;
        }
        let Some(person_or_org) = li.children().find(Node::is_element) else {
            continue;
        };
        match person_or_org.tag_name().name() {
            "Organization" => {
                if let Some(name) = child_text(&person_or_org, "name") {
                    out.push(Author::Corporate(name));
                }
            }
            _ => {
                let family = child_text(&person_or_org, "surname");
                let given = child_text(&person_or_org, "givenName");
                if let Some(family) = family {
                    out.push(Author::Person { family, given });
                } else if let Some(full) = child_text(&person_or_org, "name") {
                    out.push(Author::Corporate(full));
                }
            }
        }
    }
    out
}

/// Zotero scatters identifiers across several shapes: a bare
/// `<dc:identifier>DOI 10.x/y</dc:identifier>`, an `ISBN nnn` variant, a
/// nested `<dcterms:URI><rdf:value>https://...</rdf:value></dcterms:URI>`
/// for the item's URL, and occasionally a direct `<z:doi>`/`<prism:doi>`.
/// We scan every `identifier`-shaped child rather than assuming one form.
fn collect_identifiers(node: &Node) -> Identifiers {
    let mut out = Identifiers::default();

    if let Some(doi_text) = child_text(node, "doi") {
        out.doi = extract_doi(&doi_text);
    }

    for id_node in node
        .children()
        .filter(Node::is_element)
        .filter(|c| c.tag_name().name() == "identifier")
    {
        if let Some(uri_node) = find_child(&id_node, "URI") {
            if let Some(value) = child_text(&uri_node, "value") {
                if out.url.is_none() {
                    out.url = normalize_url(&value);
                }
            }
            continue;
        }
        let text = id_node.text().unwrap_or("").trim();
        if let Some(rest) = text.strip_prefix("DOI ").or_else(|| text.strip_prefix("doi:")) {
            if out.doi.is_none() {
                out.doi = extract_doi(rest.trim());
            }
        } else if let Some(rest) = text.strip_prefix("ISBN ").or_else(|| text.strip_prefix("isbn:")) {
            if out.isbn.is_none() {
                out.isbn = extract_isbn(rest.trim());
            }
        } else if text.starts_with("http://") || text.starts_with("https://") {
            if out.url.is_none() {
                out.url = normalize_url(text);
            }
        } else if out.isbn.is_none() && extract_isbn(text).is_some() {
            out.isbn = extract_isbn(text);
        }
    }

    if out.url.is_none() {
        if let Some(about) = node
            .attribute(("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "about"))
            .or_else(|| node.attribute("about"))
        {
            if about.starts_with("http://") || about.starts_with("https://") {
                out.url = normalize_url(about);
            }
        }
    }

    if let Some(arxiv_text) = child_text(node, "arxiv") {
        if let Some(parsed) = ident::extract_arxiv(&arxiv_text) {
            out.arxiv_id = Some(parsed.id);
            out.arxiv_version = parsed.version;
        }
    }

    // Zotero often stores a record's only identifier as part of its URL
    // (e.g. a "Document" item whose sole field is an arxiv.org/abs/ link).
    // Re-run the canonical URL through the other extractors so such a
    // record still indexes under its strongest available identifier.
    if let Some(url) = out.url.clone() {
        out.cross_derive_from_url(&url);
    }

    out
}
