// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Converts a Markdown manuscript plus a reference library into a
/// BibTeX-backed, citation-complete LaTeX manuscript.
#[derive(Debug, Parser)]
#[command(name = "bibconv", version, about, disable_version_flag = false)]
pub struct Args {
    /// Markdown manuscript containing inline `[Author (Year)](URL)` citations.
    pub markdown_file: PathBuf,

    /// Reference library in Zotero RDF export format. Required in strict
    /// mode unless `--bib` is given instead.
    #[arg(long, value_name = "PATH")]
    pub rdf: Option<PathBuf>,

    /// Reference library already in BibTeX form, used in place of `--rdf`.
    #[arg(long, value_name = "PATH")]
    pub bib: Option<PathBuf>,

    /// Directory to write `<stem>.bib`, `<stem>.tex`, `<stem>.md` and
    /// `report.json` into.
    #[arg(long = "output-dir", value_name = "PATH", default_value = ".")]
    pub output_dir: PathBuf,

    /// Fail the run on any unresolved citation or unrepaired defect.
    #[arg(long = "strict", conflicts_with = "no_strict")]
    pub strict: bool,

    /// Proceed past unresolved citations and unrepaired defects, leaving
    /// them in place and recording them in `report.json`.
    #[arg(long = "no-strict", conflicts_with = "strict")]
    pub no_strict: bool,

    /// Auto-Add Gateway policy. Defaults to `real` when strict and
    /// library write credentials are present in the environment,
    /// otherwise `disabled`.
    #[arg(long = "auto-add", value_enum)]
    pub auto_add: Option<AutoAddArg>,

    /// Disable all network lookups; equivalent to `--auto-add disabled`.
    #[arg(long = "no-web-fetch")]
    pub no_web_fetch: bool,

    /// Do not read or write the auto-add result cache.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Downgrade post-compile verifier hard findings to warnings. The run
    /// is still reported as not fully clean; use only when a manual
    /// review of the warnings is guaranteed.
    #[arg(long = "allow-failures")]
    pub allow_failures: bool,

    /// LaTeX citation command the rewritten Markdown emits, e.g. `citep`
    /// or `cite`.
    #[arg(long = "surface-form", value_name = "COMMAND", default_value = "citep")]
    pub surface_form: String,

    /// External LaTeX/BibTeX toolchain invocation to run after emission,
    /// e.g. `--compile latexmk -pdf paper.tex`. Omit to stop after
    /// emitting `.tex`/`.bib` (no post-compile verification then runs).
    #[arg(long = "compile", value_name = "ARGV", num_args = 1.., allow_hyphen_values = true)]
    pub compile_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AutoAddArg {
    Disabled,
    #[value(name = "dry-run")]
    DryRun,
    Real,
}
