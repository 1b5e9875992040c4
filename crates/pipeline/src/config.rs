// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use library::FormatHint;
use resolve::{AutoAddPolicy, RetryConfig};
use serde::{Deserialize, Serialize};

/// Everything the pipeline needs for one run, threaded explicitly through
/// the orchestrator: no ambient global configuration, no hidden
/// singletons.
#[derive(Debug, Clone)]
pub struct Config {
    pub markdown_path: PathBuf,
    pub library_path: PathBuf,
    pub library_format: FormatHint,
    pub output_dir: PathBuf,
    /// Defects are fatal unless the user explicitly relaxes this.
    pub strict: bool,
    pub auto_add: AutoAddPolicy,
    /// `None` disables the auto-add result cache entirely (`--no-cache`).
    pub cache_path: Option<PathBuf>,
    pub surface_form: String,
    pub user_agent: String,
    pub retry: RetryConfig,
    /// External LaTeX/BibTeX toolchain invocation, e.g.
    /// `["latexmk", "-pdf", "main.tex"]`. `None` means the orchestrator
    /// stops after emitting `.tex`/`.bib` and never runs `verify` — owning
    /// that toolchain invocation itself is out of scope here.
    pub compile_command: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            markdown_path: PathBuf::new(),
            library_path: PathBuf::new(),
            library_format: FormatHint::Auto,
            output_dir: PathBuf::from("."),
            strict: true,
            auto_add: AutoAddPolicy::Disabled,
            cache_path: None,
            surface_form: markdown::DEFAULT_SURFACE_FORM.to_string(),
            user_agent: "bibconv/0.1".to_string(),
            retry: RetryConfig::default(),
            compile_command: None,
        }
    }
}

/// A JSON-serializable snapshot of the options that actually governed a
/// run, embedded in `report.json` so the report is self-describing
/// without needing `Duration`/`PathBuf` serde shims for the full
/// [`Config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub markdown_path: String,
    pub library_path: String,
    pub output_dir: String,
    pub strict: bool,
    pub auto_add: String,
    pub cache_enabled: bool,
    pub surface_form: String,
    pub compile_requested: bool,
}

impl From<&Config> for ConfigSummary {
    fn from(config: &Config) -> Self {
        ConfigSummary {
            markdown_path: config.markdown_path.display().to_string(),
            library_path: config.library_path.display().to_string(),
            output_dir: config.output_dir.display().to_string(),
            strict: config.strict,
            auto_add: auto_add_policy_name(config.auto_add),
            cache_enabled: config.cache_path.is_some(),
            surface_form: config.surface_form.clone(),
            compile_requested: config.compile_command.is_some(),
        }
    }
}

/// The CLI-visible spelling of an [`AutoAddPolicy`], shared by
/// `ConfigSummary` and the orchestrator's `report.json` auto-add section
/// so the two never drift apart.
pub fn auto_add_policy_name(policy: AutoAddPolicy) -> String {
    match policy {
        AutoAddPolicy::Disabled => "disabled",
        AutoAddPolicy::DryRun => "dry-run",
        AutoAddPolicy::Real => "real",
    }
    .to_string()
}
