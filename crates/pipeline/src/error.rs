// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

/// Composes every lower-crate error into one type, plus the orchestrator's
/// own fail-fast conditions. Nothing is swallowed, nothing downgraded
/// except by an explicit relaxed-mode run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("could not read markdown source at {path}: {source}")]
    MarkdownUnreadable { path: PathBuf, #[source] source: std::io::Error },

    #[error(transparent)]
    Library(#[from] library::LoadError),

    #[error("{unresolved_count} occurrence(s) could not be resolved in strict mode")]
    UnresolvedInStrictMode { unresolved_count: usize },

    #[error(transparent)]
    Emit(#[from] bibtex::EmitError),

    #[error(transparent)]
    Sanitize(#[from] bibtex::SanitizeError),

    #[error("could not write {path}: {source}")]
    OutputWrite { path: PathBuf, #[source] source: std::io::Error },

    #[error("external compile command failed with status {status}")]
    CompileFailed { status: String },

    #[error("could not run external compile command: {source}")]
    CompileUnavailable { #[source] source: std::io::Error },

    #[error(transparent)]
    Verify(#[from] verify::VerifyError),

    #[error("verification found {hard_count} fatal defect(s) in the compiled output")]
    VerificationFailed { hard_count: usize },

    #[error("replaced {rewritten_count} occurrence(s) but {resolved_count} were resolved; this is an internal invariant violation")]
    ReplacementCountMismatch { resolved_count: usize, rewritten_count: usize },
}

impl PipelineError {
    /// The orchestrator stage that raised this error, for the `outcome`
    /// field of `report.json` — a failed run always names the gate it
    /// failed at.
    pub fn gate(&self) -> &'static str {
        match self {
            PipelineError::MarkdownUnreadable { .. } => "extract",
            PipelineError::Library(_) => "load",
            PipelineError::UnresolvedInStrictMode { .. } => "match",
            PipelineError::Emit(_) => "emit",
            PipelineError::Sanitize(_) => "sanitize",
            PipelineError::ReplacementCountMismatch { .. } => "replace",
            PipelineError::OutputWrite { .. } => "write",
            PipelineError::CompileFailed { .. } | PipelineError::CompileUnavailable { .. } => "compile",
            PipelineError::Verify(_) | PipelineError::VerificationFailed { .. } => "verify",
        }
    }

    /// The CLI exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Library(_) => 2,
            PipelineError::MarkdownUnreadable { .. } => 3,
            PipelineError::UnresolvedInStrictMode { .. } => 4,
            PipelineError::VerificationFailed { .. } => 5,
            _ => 1,
        }
    }
}
