// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Shared data model for the citation resolution pipeline: the types every
//! other crate (`library`, `markdown`, `resolve`, `bibtex`, `verify`,
//! `pipeline`) passes around, with no parsing logic of its own.

mod author;
mod occurrence;
mod quality;
mod reference;
mod snapshot;

pub use author::Author;
pub use occurrence::CitationOccurrence;
pub use quality::{
    find_unresolved_markers, is_forbidden_key, is_known_domain_title, is_stub_title,
    looks_like_organization, KNOWN_DOMAIN_TITLES, ORGANIZATION_DENYLIST, STUB_TITLE_PATTERNS,
    UNRESOLVED_MARKERS, FORBIDDEN_KEY_TOKENS,
};
pub use reference::{EntryType, Identifiers, ReferenceRecord};
pub use snapshot::{DuplicateIdentifier, IdentifierKind, IndexSizes, LibrarySnapshot};
