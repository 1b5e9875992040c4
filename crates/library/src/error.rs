// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("reference library not found at {path}")]
    NotFound { path: PathBuf },

    #[error("could not read reference library at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not detect the format of {path}; pass --rdf or --bib explicitly")]
    UnknownFormat { path: PathBuf },

    #[error("failed to parse RDF library at {path}: {reason}")]
    RdfParse { path: PathBuf, reason: String },

    #[error("failed to parse BibTeX library at {path}: {reason}")]
    BibtexParse { path: PathBuf, reason: String },

    #[error("reference library at {path} yielded zero bibliographic items")]
    EmptyLibrary { path: PathBuf },
}
