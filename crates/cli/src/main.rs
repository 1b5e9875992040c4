// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod args;
mod error;

use std::process::ExitCode;

use clap::Parser;

use args::{Args, AutoAddArg};
use error::CliError;
use library::FormatHint;
use pipeline::{Config, Outcome};
use resolve::{AutoAddPolicy, RetryConfig};

/// Environment variable whose presence turns on `real` auto-add by default
/// in strict mode. Absence always leaves auto-add at `disabled` unless the
/// user opts in explicitly with `--auto-add`.
const LIBRARY_API_KEY_VAR: &str = "ZOTERO_API_KEY";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(code) => exit_code(code),
        Err(err) => {
            eprintln!("bibconv: {err}");
            exit_code(err.exit_code())
        }
    }
}

fn run() -> Result<i32, CliError> {
    let args = Args::parse();
    let config = build_config(&args)?;

    let outcome = pipeline::run(&config);
    print_summary(&outcome.report, args.allow_failures);

    match outcome.result {
        Ok(()) => Ok(0),
        Err(err) => {
            let hard_finding = matches!(err, pipeline::PipelineError::VerificationFailed { .. });
            if args.allow_failures && hard_finding {
                eprintln!(
                    "bibconv: --allow-failures in effect; {err} (conversion NOT claimed clean, see report.json)"
                );
                Ok(0)
            } else {
                eprintln!("bibconv: {err}");
                Ok(err.exit_code())
            }
        }
    }
}

fn build_config(args: &Args) -> Result<Config, CliError> {
    let strict = !args.no_strict;

    let (library_path, library_format) = match (&args.rdf, &args.bib) {
        (Some(path), _) => (path.clone(), FormatHint::Rdf),
        (None, Some(path)) => (path.clone(), FormatHint::Bibtex),
        (None, None) if strict => return Err(CliError::MissingLibrary),
        (None, None) => (std::path::PathBuf::new(), FormatHint::Auto),
    };

    let auto_add = if args.no_web_fetch {
        AutoAddPolicy::Disabled
    } else {
        match args.auto_add {
            Some(AutoAddArg::Disabled) => AutoAddPolicy::Disabled,
            Some(AutoAddArg::DryRun) => AutoAddPolicy::DryRun,
            Some(AutoAddArg::Real) => AutoAddPolicy::Real,
            None => default_auto_add(strict),
        }
    };

    let cache_path = if args.no_cache {
        None
    } else {
        Some(args.output_dir.join("auto_add_cache.json"))
    };

    Ok(Config {
        markdown_path: args.markdown_file.clone(),
        library_path,
        library_format,
        output_dir: args.output_dir.clone(),
        strict,
        auto_add,
        cache_path,
        surface_form: args.surface_form.clone(),
        user_agent: format!("bibconv/{}", env!("CARGO_PKG_VERSION")),
        retry: RetryConfig::default(),
        compile_command: args.compile_command.clone(),
    })
}

fn default_auto_add(strict: bool) -> AutoAddPolicy {
    if strict && std::env::var(LIBRARY_API_KEY_VAR).is_ok() {
        AutoAddPolicy::Real
    } else {
        AutoAddPolicy::Disabled
    }
}

/// Prints the one-line, human-facing summary of a run. The full diagnostic
/// trail always lives in `report.json`; this is just what you'd want to
/// see scroll by in a terminal.
fn print_summary(report: &pipeline::Report, allow_failures: bool) {
    println!(
        "bibconv: {} occurrence(s), {} resolved, {} unresolved",
        report.extraction.occurrence_count,
        report.matching.resolved_count,
        report.matching.unresolved_count,
    );

    if let Some(auto_add) = &report.auto_add {
        if auto_add.added_count > 0 || auto_add.failure_count > 0 {
            println!(
                "bibconv: auto-add ({}): {} added, {} failed",
                auto_add.policy, auto_add.added_count, auto_add.failure_count
            );
        }
    }

    if let Some(sanitizer) = &report.sanitizer {
        if !sanitizer.needs_manual_review.is_empty() {
            println!(
                "bibconv: {} entr(y/ies) need manual review: {}",
                sanitizer.needs_manual_review.len(),
                sanitizer.needs_manual_review.join(", ")
            );
        }
    }

    if let Some(verification) = &report.verification {
        if verification.hard_count() > 0 {
            let prefix = if allow_failures { "warning" } else { "fatal" };
            println!("bibconv: {prefix}: {} hard verification finding(s)", verification.hard_count());
        }
    }

    match &report.outcome {
        Outcome::Success => println!("bibconv: done"),
        Outcome::Failure { gate, message } => println!("bibconv: failed at `{gate}`: {message}"),
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn base_args() -> Args {
        Args {
            markdown_file: PathBuf::from("paper.md"),
            rdf: None,
            bib: None,
            output_dir: PathBuf::from("."),
            strict: false,
            no_strict: false,
            auto_add: None,
            no_web_fetch: false,
            no_cache: false,
            allow_failures: false,
            surface_form: "citep".to_string(),
            compile_command: None,
        }
    }

    #[test]
    fn strict_mode_requires_a_library() {
        let args = base_args();
        let err = build_config(&args).unwrap_err();
        assert!(matches!(err, CliError::MissingLibrary));
    }

    #[test]
    fn no_strict_tolerates_a_missing_library() {
        let mut args = base_args();
        args.no_strict = true;
        let config = build_config(&args).unwrap();
        assert!(!config.strict);
    }

    #[test]
    fn no_web_fetch_disables_auto_add_even_with_explicit_policy() {
        let mut args = base_args();
        args.no_strict = true;
        args.no_web_fetch = true;
        args.auto_add = Some(AutoAddArg::Real);
        let config = build_config(&args).unwrap();
        assert_eq!(config.auto_add, AutoAddPolicy::Disabled);
    }

    #[test]
    fn no_cache_disables_the_cache_path() {
        let mut args = base_args();
        args.no_strict = true;
        args.no_cache = true;
        let config = build_config(&args).unwrap();
        assert_eq!(config.cache_path, None);
    }

    #[test]
    fn explicit_rdf_path_selects_rdf_format_hint() {
        let mut args = base_args();
        args.rdf = Some(PathBuf::from("library.rdf"));
        let config = build_config(&args).unwrap();
        assert_eq!(config.library_format, FormatHint::Rdf);
    }
}
