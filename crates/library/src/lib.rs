// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Loads a local reference library export (Zotero RDF/XML, or a plain
//! `.bib` fallback) into a [`LibrarySnapshot`](model::LibrarySnapshot).

mod bibtex_loader;
mod detect;
mod error;
mod rdf;

use std::fs;
use std::path::Path;

use model::LibrarySnapshot;

pub use detect::FormatHint;
pub use error::LoadError;

/// Result of a successful [`load`]: the snapshot plus any non-fatal
/// warnings (duplicate identifiers, or an empty library tolerated because
/// `strict` was false).
pub struct LoadOutcome {
    pub snapshot: LibrarySnapshot,
    pub warnings: Vec<String>,
}

/// Loads `path` as a reference library, dispatching to the RDF or BibTeX
/// parser per [`FormatHint`]/file sniffing.
///
/// `strict` governs what happens when the file parses cleanly but yields
/// zero bibliographic items: a fatal [`LoadError::EmptyLibrary`] in strict
/// mode, a warning and an empty snapshot otherwise. A missing or unreadable
/// file, or one that fails to parse at all, is always fatal regardless of
/// `strict` — there is no such thing as a degraded read of a library that
/// doesn't exist.
pub fn load(path: &Path, hint: FormatHint, strict: bool) -> Result<LoadOutcome, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound { path: path.to_path_buf() });
    }

    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let path_display = path.display().to_string();
    let format = detect::detect(path, hint, &contents).ok_or_else(|| LoadError::UnknownFormat {
        path: path.to_path_buf(),
    })?;

    let records = match format {
        detect::Format::Rdf => rdf::parse(&contents, &path_display)?,
        detect::Format::Bibtex => bibtex_loader::parse(&contents, &path_display)?,
    };

    let mut warnings = Vec::new();
    if records.is_empty() {
        if strict {
            return Err(LoadError::EmptyLibrary { path: path.to_path_buf() });
        }
        warnings.push(format!(
            "reference library at {path_display} yielded zero bibliographic items; continuing without a library"
        ));
    }

    let snapshot = LibrarySnapshot::build(records);
    for dup in &snapshot.duplicates {
        warnings.push(format!(
            "duplicate {:?} identifier {:?}: kept {:?}, shadowed {:?}",
            dup.kind, dup.value, dup.kept, dup.shadowed
        ));
    }

    log::info!(
        "loaded {} reference record(s) from {path_display} ({} duplicate identifier warning(s))",
        snapshot.len(),
        snapshot.duplicates.len()
    );

    Ok(LoadOutcome { snapshot, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_fatal_even_outside_strict_mode() {
        let err = load(Path::new("/nonexistent/library.rdf"), FormatHint::Auto, false).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn empty_but_well_formed_bib_is_fatal_only_in_strict_mode() {
        let mut path = std::env::temp_dir();
        path.push(format!("bibconv-test-{}-{}.bib", std::process::id(), line!()));
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"@comment{nothing here}")
            .unwrap();

        let lenient = load(&path, FormatHint::Bibtex, false).unwrap();
        assert!(lenient.snapshot.is_empty());
        assert_eq!(lenient.warnings.len(), 1);

        let err = load(&path, FormatHint::Bibtex, true).unwrap_err();
        assert!(matches!(err, LoadError::EmptyLibrary { .. }));

        let _ = std::fs::remove_file(&path);
    }
}
