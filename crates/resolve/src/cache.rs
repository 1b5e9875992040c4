// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! On-disk cache for auto-add fetches, keyed by canonical identifier so a
//! second run (or a second occurrence pointing at the same DOI) never
//! re-hits the network.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use model::ReferenceRecord;

pub struct Cache {
    path: Option<PathBuf>,
    entries: HashMap<String, ReferenceRecord>,
    pub dirty: bool,
}

impl Cache {
    /// `path = None` disables persistence entirely (the `--no-cache` CLI
    /// flag); the cache then only dedupes within a single run.
    pub fn load(path: Option<&Path>) -> Self {
        let entries = path
            .filter(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();

        Cache { path: path.map(Path::to_path_buf), entries, dirty: false }
    }

    pub fn get(&self, canonical_identifier: &str) -> Option<&ReferenceRecord> {
        self.entries.get(canonical_identifier)
    }

    pub fn insert(&mut self, canonical_identifier: String, record: ReferenceRecord) {
        self.entries.insert(canonical_identifier, record);
        self.dirty = true;
    }

    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else { return Ok(()) };
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.entries).expect("cache entries always serialize");
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{EntryType, Identifiers};

    fn sample_record() -> ReferenceRecord {
        ReferenceRecord {
            id: "r1".into(),
            entry_type: EntryType::Article,
            title: "T".into(),
            authors: vec![],
            year: Some(2020),
            venue: None,
            pages: None,
            volume: None,
            issue: None,
            publisher: None,
            identifiers: Identifiers::default(),
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let mut path = std::env::temp_dir();
        path.push(format!("bibconv-cache-test-{}.json", std::process::id()));

        let mut cache = Cache::load(Some(&path));
        cache.insert("10.1/x".to_string(), sample_record());
        cache.save().unwrap();

        let reloaded = Cache::load(Some(&path));
        assert_eq!(reloaded.get("10.1/x").unwrap().id, "r1");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_path_disables_persistence_without_error() {
        let cache = Cache::load(None);
        assert!(cache.get("anything").is_none());
        assert!(cache.save().is_ok());
    }
}
