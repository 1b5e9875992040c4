// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("generated key {key:?} matches a forbidden temporary-key shape")]
    ForbiddenTempKey { key: String },

    #[error("record {record_id:?} carries no usable identifier to key from")]
    NoUsableIdentifier { record_id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    #[error("could not re-parse emitted BibTeX: {reason}")]
    ParseFailed { reason: String },

    #[error("entry {key:?} has a domain-as-title defect with no real title available in the library")]
    MissingRealTitle { key: String },

    #[error("entry {key:?} has a stub title with no real title available in the library")]
    UnrepairedStubTitle { key: String },

    #[error("entry {key:?} has a literal \"Unknown\"/\"Anonymous\" author")]
    UnknownAuthor { key: String },
}
