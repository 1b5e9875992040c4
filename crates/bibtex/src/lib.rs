// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bibliography Emitter: turns matched
//! reference records into BibTeX text, then deterministically repairs the
//! handful of defect shapes known to produce unresolved-looking citations.

mod emit;
mod error;
mod key;
mod render;
mod sanitize;

pub use emit::{emit, EmitOutcome};
pub use error::{EmitError, SanitizeError};
pub use key::{assign_keys, generate_key};
pub use render::{escape_latex, render_entry};
pub use sanitize::{sanitize, SanitizeReport};
