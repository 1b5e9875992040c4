// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pipeline Orchestrator: sequences the Citation Resolution Pipeline
//! end to end under a strict-mode policy, enforcing fail-fast gates at
//! every transition and always persisting a structured run report.
//!
//! ```text
//! START -> Loaded -> Extracted -> Matched -> (AutoAdded?) -> Emitted
//!       -> Sanitized -> Rewritten -> Compiled* -> Verified -> SUCCESS
//! * external collaborator
//! ```

mod config;
mod error;
mod report;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use model::{CitationOccurrence, ReferenceRecord};
use resolve::AutoAddPolicy;

pub use config::{auto_add_policy_name, Config, ConfigSummary};
pub use error::PipelineError;
pub use report::{
    AutoAddSection, EmissionSection, ExtractionSection, LibrarySection, MatchingSection,
    OccurrenceDiagnostic, Outcome, ReplacementSection, Report, SanitizerSection,
};

/// What one pipeline run produced: the structured report (always present,
/// success or failure) and the terminal result. The CLI maps `result`'s
/// error, if any, to an exit code via [`PipelineError::exit_code`].
pub struct RunOutcome {
    pub report: Report,
    pub result: Result<(), PipelineError>,
}

/// Runs the full pipeline for `config`, persisting `report.json` to
/// `config.output_dir` regardless of outcome, so a failed run is always
/// inspectable after the fact.
pub fn run(config: &Config) -> RunOutcome {
    let mut report = Report::new(ConfigSummary::from(config));

    let result = execute(config, &mut report);
    if let Err(err) = &result {
        report.outcome = Outcome::Failure { gate: err.gate().to_string(), message: err.to_string() };
        log::error!("pipeline failed at gate `{}`: {err}", err.gate());
    } else {
        log::info!("pipeline completed successfully");
    }

    if let Err(io_err) = write_report(config, &report) {
        log::error!("could not write report.json: {io_err}");
    }

    RunOutcome { report, result }
}

fn execute(config: &Config, report: &mut Report) -> Result<(), PipelineError> {
    // Created up front: the auto-add cache (if enabled) is written well
    // before the primary .bib/.md/.tex outputs are.
    fs::create_dir_all(&config.output_dir)
        .map_err(|source| PipelineError::OutputWrite { path: config.output_dir.clone(), source })?;

    let markdown_text = fs::read_to_string(&config.markdown_path).map_err(|source| {
        PipelineError::MarkdownUnreadable { path: config.markdown_path.clone(), source }
    })?;

    let load_outcome = library::load(&config.library_path, config.library_format, config.strict)?;
    let snapshot = load_outcome.snapshot;
    let sizes = snapshot.index_sizes();
    report.library = LibrarySection {
        record_count: snapshot.len(),
        doi_index_size: sizes.doi,
        arxiv_index_size: sizes.arxiv,
        isbn_index_size: sizes.isbn,
        url_index_size: sizes.url,
        url_bearing_references: sizes.url_bearing_references,
        warnings: load_outcome.warnings,
    };
    log::info!(
        "library loaded: {} record(s), indices doi={} arxiv={} isbn={} url={}",
        snapshot.len(), sizes.doi, sizes.arxiv, sizes.isbn, sizes.url,
    );

    let occurrences = markdown::extract(&markdown_text);
    report.extraction = ExtractionSection { occurrence_count: occurrences.len() };
    log::info!("extracted {} citation occurrence(s)", occurrences.len());

    let match_report = resolve::match_all(&occurrences, &snapshot);

    let unresolved_occurrences: Vec<&CitationOccurrence> = match_report
        .results
        .iter()
        .filter(|r| r.record.is_none())
        .map(|r| &occurrences[r.occurrence_index])
        .collect();

    let (auto_added_records, auto_added_index) =
        run_auto_add(config, &unresolved_occurrences, report)?;

    let mut matched: Vec<(usize, &ReferenceRecord)> = Vec::new();
    let mut diagnostics = Vec::with_capacity(match_report.results.len());
    let mut unresolved_final = Vec::new();

    for result in &match_report.results {
        let occ = &occurrences[result.occurrence_index];
        let (resolved, strategy_name, record_ref) = if let Some(record) = result.record {
            (true, result.strategy.map(|s| format!("{s:?}")), Some(record))
        } else if let Some(&pos) = auto_added_index.get(&result.occurrence_index) {
            (true, Some("AutoAdd".to_string()), Some(&auto_added_records[pos]))
        } else {
            (false, None, None)
        };

        match record_ref {
            Some(record) => matched.push((result.occurrence_index, record)),
            None => unresolved_final.push(result.occurrence_index),
        }

        diagnostics.push(OccurrenceDiagnostic {
            occurrence_index: result.occurrence_index,
            raw_text: occ.raw_text.clone(),
            raw_url: occ.raw_url.clone(),
            canonical_url: occ.canonical_url.clone(),
            resolved,
            strategy: strategy_name,
            attempts: result.attempts.clone(),
        });
    }

    report.matching = MatchingSection {
        counters: match_report.counters,
        resolved_count: matched.len(),
        unresolved_count: unresolved_final.len(),
        diagnostics,
    };

    if config.strict && !unresolved_final.is_empty() {
        return Err(PipelineError::UnresolvedInStrictMode { unresolved_count: unresolved_final.len() });
    }

    let emit_outcome = bibtex::emit(&matched)?;
    let mut keys: Vec<String> = emit_outcome.occurrence_keys.values().cloned().collect();
    keys.sort();
    keys.dedup();
    report.emission = Some(EmissionSection { entry_count: keys.len(), keys });

    let (sanitized_bibtex, sanitize_report) =
        bibtex::sanitize(&emit_outcome.bibtex, &snapshot, config.strict)?;
    report.sanitizer = Some(SanitizerSection {
        domain_as_title: sanitize_report.domain_as_title.len(),
        stub_title: sanitize_report.stub_title.len(),
        organization_as_author: sanitize_report.organization_as_author.len(),
        missing_arxiv_eprint: sanitize_report.missing_arxiv_eprint.len(),
        unknown_author: sanitize_report.unknown_author.len(),
        repaired: sanitize_report.repaired.len(),
        needs_manual_review: sanitize_report.needs_manual_review,
    });

    let replacement = markdown::replace(
        &markdown_text,
        &occurrences,
        &emit_outcome.occurrence_keys,
        &config.surface_form,
    );
    let resolved_count = emit_outcome.occurrence_keys.len();
    let rewritten_count = occurrences.len() - replacement.unresolved.len();
    if rewritten_count != resolved_count {
        return Err(PipelineError::ReplacementCountMismatch { resolved_count, rewritten_count });
    }
    report.replacement = Some(ReplacementSection { resolved_count, rewritten_count });

    if config.strict && !replacement.unresolved.is_empty() {
        return Err(PipelineError::UnresolvedInStrictMode {
            unresolved_count: replacement.unresolved.len(),
        });
    }

    let stem = output_stem(config);

    let bib_path = config.output_dir.join(format!("{stem}.bib"));
    fs::write(&bib_path, &sanitized_bibtex)
        .map_err(|source| PipelineError::OutputWrite { path: bib_path.clone(), source })?;

    let md_path = config.output_dir.join(format!("{stem}.md"));
    fs::write(&md_path, &replacement.markdown)
        .map_err(|source| PipelineError::OutputWrite { path: md_path.clone(), source })?;

    let tex_path = config.output_dir.join(format!("{stem}.tex"));
    fs::write(&tex_path, render_tex_wrapper(&replacement.markdown, &stem))
        .map_err(|source| PipelineError::OutputWrite { path: tex_path.clone(), source })?;

    if let Some(command) = &config.compile_command {
        run_compile_command(command, &config.output_dir)?;
    }

    let bbl_path = config.output_dir.join(format!("{stem}.bbl"));
    let pdf_path = config.output_dir.join(format!("{stem}.pdf"));
    if bbl_path.exists() && pdf_path.exists() {
        let verification = verify::verify(&bbl_path, &bib_path, &pdf_path)?;
        let hard_count = verification.hard_count();
        let soft_count = verification.soft_count();
        report.verification = Some(verification);
        log::info!("verification: {hard_count} hard finding(s), {soft_count} soft finding(s)");
        if hard_count > 0 {
            return Err(PipelineError::VerificationFailed { hard_count });
        }
    } else {
        log::info!(
            "no compiled .bbl/.pdf present at {}; skipping post-compile verification (soft note)",
            config.output_dir.display()
        );
    }

    Ok(())
}

/// Runs the Auto-Add Gateway over every still-unresolved occurrence,
/// per `config.auto_add`, and records its results in the report. Returns
/// the freshly fetched records plus an index from occurrence index to
/// position in that vector, so the caller can treat an auto-added record
/// exactly like one the matcher found in the library.
fn run_auto_add(
    config: &Config,
    unresolved: &[&CitationOccurrence],
    report: &mut Report,
) -> Result<(Vec<ReferenceRecord>, HashMap<usize, usize>), PipelineError> {
    let mut records = Vec::new();
    let mut index = HashMap::new();

    if config.auto_add == AutoAddPolicy::Disabled || unresolved.is_empty() {
        report.auto_add = Some(AutoAddSection { policy: auto_add_policy_name(config.auto_add), ..Default::default() });
        return Ok((records, index));
    }

    let fetcher = resolve::ReqwestFetcher::new(&config.user_agent);
    let mut cache = resolve::Cache::load(config.cache_path.as_deref());

    let outcome = resolve::try_add_all(unresolved, config.auto_add, &fetcher, &mut cache, config.retry);

    if let Err(io_err) = cache.save() {
        log::warn!("could not persist auto-add cache: {io_err}");
    }

    for (occurrence_index, record) in outcome.added {
        index.insert(occurrence_index, records.len());
        records.push(record);
    }

    let failures: Vec<String> = outcome
        .failures
        .iter()
        .map(|f| format!("occurrence {}: {}", f.occurrence_index, f.reason))
        .collect();

    log::info!(
        "auto-add ({}): {} added, {} planned, {} failed",
        auto_add_policy_name(config.auto_add),
        records.len(),
        outcome.plans.len(),
        failures.len(),
    );

    report.auto_add = Some(AutoAddSection {
        policy: auto_add_policy_name(config.auto_add),
        added_count: records.len(),
        planned_count: outcome.plans.len(),
        failure_count: failures.len(),
        failures,
    });

    Ok((records, index))
}

fn output_stem(config: &Config) -> String {
    config
        .markdown_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("manuscript")
        .to_string()
}

/// Minimal pass-through LaTeX wrapper: body rendering (Markdown sections,
/// math, tables, images) is an external collaborator's job, so this only
/// supplies the preamble and the bibliography directive the emitted
/// `.bib` needs to be picked up by BibTeX.
fn render_tex_wrapper(body: &str, stem: &str) -> String {
    format!(
        "\\documentclass{{article}}\n\\usepackage{{natbib}}\n\\begin{{document}}\n\n{body}\n\n\\bibliographystyle{{plainnat}}\n\\bibliography{{{stem}}}\n\\end{{document}}\n"
    )
}

fn run_compile_command(command: &[String], cwd: &Path) -> Result<(), PipelineError> {
    let Some((program, args)) = command.split_first() else { return Ok(()) };
    let status = std::process::Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .map_err(|source| PipelineError::CompileUnavailable { source })?;
    if !status.success() {
        return Err(PipelineError::CompileFailed { status: status.to_string() });
    }
    Ok(())
}

fn write_report(config: &Config, report: &Report) -> std::io::Result<()> {
    fs::create_dir_all(&config.output_dir)?;
    let path = config.output_dir.join("report.json");
    let json = serde_json::to_string_pretty(report).expect("Report always serializes");
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn unique_dir(label: &str) -> std::path::PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("bibconv-pipeline-test-{label}-{}-{}", std::process::id(), rand_suffix()));
        dir
    }

    fn rand_suffix() -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    }

    fn write_file(path: &Path, contents: &str) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn end_to_end_run_resolves_doi_citation_and_emits_clean_bibtex() {
        let dir = unique_dir("doi-happy-path");
        fs::create_dir_all(&dir).unwrap();

        let markdown_path = dir.join("paper.md");
        write_file(
            &markdown_path,
            "As shown in [Vaswani et al. (2017)](https://doi.org/10.1145/3618394), attention works.\n",
        );

        let library_path = dir.join("library.bib");
        write_file(
            &library_path,
            "@article{vaswani2017,\n  title = {Attention Is All You Need},\n  author = {Vaswani, Ashish},\n  year = {2017},\n  doi = {10.1145/3618394},\n}\n",
        );

        let output_dir = dir.join("out");
        let config = Config {
            markdown_path,
            library_path,
            library_format: library::FormatHint::Bibtex,
            output_dir: output_dir.clone(),
            strict: true,
            auto_add: AutoAddPolicy::Disabled,
            cache_path: None,
            surface_form: markdown::DEFAULT_SURFACE_FORM.to_string(),
            user_agent: "bibconv-test/0.1".to_string(),
            retry: resolve::RetryConfig::default(),
            compile_command: None,
        };

        let outcome = run(&config);
        assert!(outcome.result.is_ok(), "{:?}", outcome.result.err());
        assert_eq!(outcome.report.matching.resolved_count, 1);
        assert_eq!(outcome.report.matching.unresolved_count, 0);

        let bib = fs::read_to_string(output_dir.join("paper.bib")).unwrap();
        assert!(bib.contains("doi_10_1145_3618394"));
        assert!(bib.contains("Attention Is All You Need"));

        let md = fs::read_to_string(output_dir.join("paper.md")).unwrap();
        assert!(md.contains("\\citep{doi_10_1145_3618394}"));

        let report_json = fs::read_to_string(output_dir.join("report.json")).unwrap();
        assert!(report_json.contains("\"status\":\"Success\""));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn strict_mode_fails_on_unresolved_citation_with_no_primary_outputs() {
        let dir = unique_dir("unresolved-strict");
        fs::create_dir_all(&dir).unwrap();

        let markdown_path = dir.join("paper.md");
        write_file(
            &markdown_path,
            "See [Obscure (2023)](https://example.invalid/paper) for details.\n",
        );

        let library_path = dir.join("library.bib");
        write_file(&library_path, "@article{x,\n  title = {Unrelated},\n  year = {2020},\n}\n");

        let output_dir = dir.join("out");
        let config = Config {
            markdown_path,
            library_path,
            library_format: library::FormatHint::Bibtex,
            output_dir: output_dir.clone(),
            strict: true,
            auto_add: AutoAddPolicy::Disabled,
            cache_path: None,
            surface_form: markdown::DEFAULT_SURFACE_FORM.to_string(),
            user_agent: "bibconv-test/0.1".to_string(),
            retry: resolve::RetryConfig::default(),
            compile_command: None,
        };

        let outcome = run(&config);
        let err = outcome.result.unwrap_err();
        assert!(matches!(err, PipelineError::UnresolvedInStrictMode { unresolved_count: 1 }));
        assert_eq!(err.exit_code(), 4);
        assert!(!output_dir.join("paper.bib").exists());
        assert!(output_dir.join("report.json").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn relaxed_mode_proceeds_past_an_unresolved_citation() {
        let dir = unique_dir("unresolved-relaxed");
        fs::create_dir_all(&dir).unwrap();

        let markdown_path = dir.join("paper.md");
        write_file(
            &markdown_path,
            "See [Obscure (2023)](https://example.invalid/paper) for details.\n",
        );

        let library_path = dir.join("library.bib");
        write_file(&library_path, "@article{x,\n  title = {Unrelated},\n  year = {2020},\n}\n");

        let output_dir = dir.join("out");
        let config = Config {
            markdown_path,
            library_path,
            library_format: library::FormatHint::Bibtex,
            output_dir: output_dir.clone(),
            strict: false,
            auto_add: AutoAddPolicy::Disabled,
            cache_path: None,
            surface_form: markdown::DEFAULT_SURFACE_FORM.to_string(),
            user_agent: "bibconv-test/0.1".to_string(),
            retry: resolve::RetryConfig::default(),
            compile_command: None,
        };

        let outcome = run(&config);
        assert!(outcome.result.is_ok());
        assert_eq!(outcome.report.matching.unresolved_count, 1);

        let md = fs::read_to_string(output_dir.join("paper.md")).unwrap();
        assert!(md.contains("[Obscure (2023)](https://example.invalid/paper)"));

        let _ = fs::remove_dir_all(&dir);
    }
}
