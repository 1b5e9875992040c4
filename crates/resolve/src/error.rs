// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {service} failed: {reason}")]
    Request { service: &'static str, reason: String },

    #[error("{service} returned no usable metadata")]
    NoMetadata { service: &'static str },

    #[error("{service} rate-limited the request after {attempts} attempt(s)")]
    RateLimited { service: &'static str, attempts: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("fetched title matches a known stub pattern: {title:?}")]
    StubTitle { title: String },

    #[error("fetched title is a bare domain name: {title:?}")]
    DomainTitle { title: String },

    #[error("arXiv record is missing its canonical id or URL")]
    IncompleteArxivRecord,
}
