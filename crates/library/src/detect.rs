// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Picks RDF or BibTeX parsing for a library file: an explicit hint always
//! wins, otherwise we go by extension, and fall back to sniffing the first
//! non-blank bytes for files with an ambiguous or missing extension.

use std::path::Path;

/// Which loader to run. `Auto` defers to extension/content detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Auto,
    Rdf,
    Bibtex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Rdf,
    Bibtex,
}

pub(crate) fn detect(path: &Path, hint: FormatHint, contents: &str) -> Option<Format> {
    match hint {
        FormatHint::Rdf => return Some(Format::Rdf),
        FormatHint::Bibtex => return Some(Format::Bibtex),
        FormatHint::Auto => {}
    }

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        match ext.to_lowercase().as_str() {
            "rdf" | "xml" => return Some(Format::Rdf),
            "bib" | "bibtex" => return Some(Format::Bibtex),
            _ => {}
        }
    }

    sniff(contents)
}

fn sniff(contents: &str) -> Option<Format> {
    let trimmed = contents.trim_start();
    if trimmed.starts_with("<?xml") || trimmed.starts_with("<rdf:RDF") || trimmed.starts_with("<RDF") {
        return Some(Format::Rdf);
    }
    if trimmed.starts_with('@') {
        return Some(Format::Bibtex);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        assert_eq!(
            detect(Path::new("library.rdf"), FormatHint::Auto, ""),
            Some(Format::Rdf)
        );
        assert_eq!(
            detect(Path::new("library.bib"), FormatHint::Auto, ""),
            Some(Format::Bibtex)
        );
    }

    #[test]
    fn hint_overrides_extension() {
        assert_eq!(
            detect(Path::new("library.bib"), FormatHint::Rdf, ""),
            Some(Format::Rdf)
        );
    }

    #[test]
    fn sniffs_extensionless_files() {
        assert_eq!(
            detect(Path::new("library"), FormatHint::Auto, "<?xml version=\"1.0\"?>"),
            Some(Format::Rdf)
        );
        assert_eq!(
            detect(Path::new("library"), FormatHint::Auto, "@article{x, title={y}}"),
            Some(Format::Bibtex)
        );
    }

    #[test]
    fn unrecognizable_content_yields_none() {
        assert_eq!(detect(Path::new("library"), FormatHint::Auto, "hello"), None);
    }
}
