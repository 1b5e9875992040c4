// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Walks the Markdown AST once and collects every link that looks like an
//! inline citation, in document order.

use ident::normalize_url;
use model::CitationOccurrence;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::classify::is_academic_citation;

struct PendingLink {
    start: usize,
    dest: String,
    text: String,
}

/// Extracts every academic-citation link from `markdown_text`, in source
/// order. Reference-style links (`[text][ref]` + `[ref]: url`) are already
/// resolved to their destination by the parser before we ever see them.
pub fn extract(markdown_text: &str) -> Vec<CitationOccurrence> {
    let mut stack: Vec<PendingLink> = Vec::new();
    let mut occurrences = Vec::new();
    let mut next_index = 0usize;

    let parser = Parser::new_ext(markdown_text, Options::empty());
    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                stack.push(PendingLink {
                    start: range.start,
                    dest: dest_url.into_string(),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Link) => {
                if let Some(link) = stack.pop() {
                    if is_academic_citation(&link.text, &link.dest) {
                        let canonical_url = normalize_url(&link.dest);
                        occurrences.push(CitationOccurrence::new(
                            next_index,
                            link.text,
                            link.dest,
                            link.start..range.end,
                            canonical_url,
                        ));
                        next_index += 1;
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(link) = stack.last_mut() {
                    link.text.push_str(&text);
                }
            }
            _ => {}
        }
    }

    occurrences
}
