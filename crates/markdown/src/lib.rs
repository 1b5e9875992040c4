// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! AST-based extraction and rewriting of inline citation links in
//! Markdown manuscripts. Everything here walks `pulldown-cmark`'s event
//! stream; none of it touches the source as a plain string except for the
//! final span-based splice in [`replace`].

mod classify;
mod extract;
mod replace;

pub use extract::extract;
pub use replace::{replace, ReplacementOutcome, DEFAULT_SURFACE_FORM};
