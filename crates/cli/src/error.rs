// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling a run from CLI arguments, before the
/// pipeline itself starts. Kept separate from `pipeline::PipelineError`
/// since these never reach `report.json` — there is no run to report on yet.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("no reference library given; pass --rdf or --bib (one is required in strict mode)")]
    MissingLibrary,

    #[error("could not create output directory {path}: {source}")]
    OutputDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::MissingLibrary => 2,
            CliError::OutputDirUnavailable { .. } => 1,
        }
    }
}
