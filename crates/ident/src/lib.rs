// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pure, deterministic identifier extraction and canonicalization.
//!
//! Every function here returns `None` on unparseable input; none of them
//! ever panic on malformed URLs.

mod arxiv;
mod doi;
mod isbn;
mod url_norm;

pub use arxiv::{extract_arxiv, ArxivId};
pub use doi::extract_doi;
pub use isbn::extract_isbn;
pub use url_norm::normalize_url;
