// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One inline `[text](url)` citation found in the source Markdown.
/// Immutable after extraction; `span` is retained purely for diagnostics
/// and for the rewrite the surgical rewrite pass performs later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationOccurrence {
    /// Position in the extraction order; stable within one pipeline run.
    pub index: usize,
    pub raw_text: String,
    pub raw_url: String,
    /// Byte offset range of the whole link span (`[text](url)`) in the
    /// original Markdown source.
    pub span: Range<usize>,
    /// `normalize_url(raw_url)`, or `None` if the URL didn't parse.
    pub canonical_url: Option<String>,
}

impl CitationOccurrence {
    pub fn new(
        index: usize,
        raw_text: impl Into<String>,
        raw_url: impl Into<String>,
        span: Range<usize>,
        canonical_url: Option<String>,
    ) -> Self {
        CitationOccurrence {
            index,
            raw_text: raw_text.into(),
            raw_url: raw_url.into(),
            span,
            canonical_url,
        }
    }
}
