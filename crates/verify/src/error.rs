// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("could not read compiled bibliography at {path}: {source}")]
    BblUnreadable { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not read emitted bibliography at {path}: {source}")]
    BibUnreadable { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not read compiled PDF at {path}: {reason}")]
    PdfUnreadable { path: PathBuf, reason: String },

    #[error("failed to parse emitted bibliography at {path}: {reason}")]
    BibParse { path: PathBuf, reason: String },
}
