// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Auto-Add Gateway: for occurrences the matcher couldn't place, try
//! to resolve metadata from the right external service and, subject to
//! policy, add the result to the library.

use std::thread;
use std::time::Duration;

use ident::{extract_arxiv, extract_doi};
use model::{CitationOccurrence, EntryType, Identifiers, ReferenceRecord};
use rayon::prelude::*;

use crate::cache::Cache;
use crate::fetch::{FetchedMetadata, MetadataFetcher};
use crate::validate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoAddPolicy {
    Disabled,
    DryRun,
    Real,
}

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig { max_attempts: 3, base_delay: Duration::from_millis(250) }
    }
}

#[derive(Debug, Clone)]
pub struct AutoAddPlan {
    pub occurrence_index: usize,
    pub service: &'static str,
    pub candidate_identifier: String,
}

#[derive(Debug, Clone)]
pub struct AutoAddFailure {
    pub occurrence_index: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct AutoAddOutcome {
    pub added: Vec<(usize, ReferenceRecord)>,
    pub plans: Vec<AutoAddPlan>,
    pub failures: Vec<AutoAddFailure>,
}

enum Route {
    Crossref(String),
    Arxiv(String),
    Webpage(String),
}

impl Route {
    fn cache_key(&self) -> String {
        match self {
            Route::Crossref(doi) => format!("doi:{doi}"),
            Route::Arxiv(id) => format!("arxiv:{id}"),
            Route::Webpage(url) => format!("url:{url}"),
        }
    }

    fn service_name(&self) -> &'static str {
        match self {
            Route::Crossref(_) => "crossref",
            Route::Arxiv(_) => "arxiv",
            Route::Webpage(_) => "webpage",
        }
    }
}

fn route_for(occ: &CitationOccurrence) -> Option<Route> {
    if let Some(doi) = extract_doi(&occ.raw_url) {
        return Some(Route::Crossref(doi));
    }
    if let Some(arxiv) = extract_arxiv(&occ.raw_url) {
        return Some(Route::Arxiv(arxiv.id));
    }
    occ.canonical_url.clone().map(Route::Webpage)
}

/// Attempts to resolve every occurrence in `unresolved` per `policy`.
/// `Disabled` does no network I/O at all and returns immediately.
/// Network fetches for distinct occurrences run concurrently; only the
/// cache/library write that follows is serialized.
pub fn try_add_all(
    unresolved: &[&CitationOccurrence],
    policy: AutoAddPolicy,
    fetcher: &dyn MetadataFetcher,
    cache: &mut Cache,
    retry: RetryConfig,
) -> AutoAddOutcome {
    let mut outcome = AutoAddOutcome::default();
    if policy == AutoAddPolicy::Disabled {
        return outcome;
    }

    let fetched: Vec<(usize, Route, Result<ReferenceRecord, String>)> = unresolved
        .par_iter()
        .filter_map(|occ| {
            let route = route_for(occ)?;
            let result = resolve_one(&route, fetcher, cache, retry);
            Some((occ.index, route, result))
        })
        .collect();

    for (occurrence_index, route, result) in fetched {
        let candidate_identifier = route.cache_key();
        let record = match result {
            Ok(record) => record,
            Err(reason) => {
                outcome.failures.push(AutoAddFailure { occurrence_index, reason });
                continue;
            }
        };

        match policy {
            AutoAddPolicy::DryRun => {
                outcome.plans.push(AutoAddPlan {
                    occurrence_index,
                    service: route.service_name(),
                    candidate_identifier,
                });
            }
            AutoAddPolicy::Real => {
                cache.insert(candidate_identifier, record.clone());
                outcome.added.push((occurrence_index, record));
            }
            AutoAddPolicy::Disabled => unreachable!("handled above"),
        }
    }

    outcome
}

/// Cache lookup, then fetch-with-retry, then build-and-validate; collapsed
/// to a single string reason since callers only ever report failures, not
/// branch on them.
fn resolve_one(
    route: &Route,
    fetcher: &dyn MetadataFetcher,
    cache: &Cache,
    retry: RetryConfig,
) -> Result<ReferenceRecord, String> {
    if let Some(cached) = cache.get(&route.cache_key()) {
        return Ok(cached.clone());
    }

    let metadata = fetch_with_retry(route, fetcher, retry)?;
    let record = build_record(route, metadata);
    validate(&record).map_err(|e| e.to_string())?;
    Ok(record)
}

fn fetch_with_retry(
    route: &Route,
    fetcher: &dyn MetadataFetcher,
    retry: RetryConfig,
) -> Result<FetchedMetadata, String> {
    let mut last_err = String::new();
    for attempt in 0..retry.max_attempts {
        let result = match route {
            Route::Crossref(doi) => fetcher.fetch_doi(doi),
            Route::Arxiv(id) => fetcher.fetch_arxiv(id),
            Route::Webpage(url) => fetcher.fetch_webpage(url),
        };
        match result {
            Ok(metadata) => return Ok(metadata),
            Err(e) => {
                last_err = e.to_string();
                let rate_limited = last_err.contains("429");
                let delay = retry.base_delay * 2u32.pow(attempt) * if rate_limited { 4 } else { 1 };
                if attempt + 1 < retry.max_attempts {
                    thread::sleep(delay);
                }
            }
        }
    }
    Err(format!("{} after {} attempt(s): {last_err}", route.service_name(), retry.max_attempts))
}

fn build_record(route: &Route, metadata: FetchedMetadata) -> ReferenceRecord {
    let entry_type = match route {
        Route::Crossref(_) => EntryType::Article,
        Route::Arxiv(_) => EntryType::Misc,
        Route::Webpage(_) => EntryType::Webpage,
    };

    let identifiers = match route {
        Route::Crossref(doi) => Identifiers { doi: Some(doi.clone()), ..Default::default() },
        Route::Arxiv(id) => Identifiers {
            arxiv_id: Some(id.clone()),
            url: Some(format!("https://arxiv.org/abs/{id}")),
            ..Default::default()
        },
        Route::Webpage(url) => Identifiers { url: Some(url.clone()), ..Default::default() },
    };

    ReferenceRecord {
        id: route.cache_key(),
        entry_type,
        title: metadata.title,
        authors: metadata.authors,
        year: metadata.year,
        venue: metadata.venue,
        pages: metadata.pages,
        volume: metadata.volume,
        issue: metadata.issue,
        publisher: metadata.publisher,
        identifiers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeFetcher {
        doi_calls: AtomicUsize,
    }

    impl MetadataFetcher for FakeFetcher {
        fn fetch_doi(&self, _doi: &str) -> Result<FetchedMetadata, FetchError> {
            self.doi_calls.fetch_add(1, Ordering::SeqCst);
            Ok(FetchedMetadata {
                title: "Attention Is All You Need".to_string(),
                year: Some(2017),
                ..Default::default()
            })
        }
        fn fetch_arxiv(&self, _id: &str) -> Result<FetchedMetadata, FetchError> {
            Err(FetchError::NoMetadata { service: "arxiv" })
        }
        fn fetch_webpage(&self, _url: &str) -> Result<FetchedMetadata, FetchError> {
            Err(FetchError::NoMetadata { service: "webpage" })
        }
    }

    fn occ(index: usize, url: &str) -> CitationOccurrence {
        CitationOccurrence::new(index, "Smith (2020)", url, 0..1, Some(url.to_string()))
    }

    #[test]
    fn disabled_policy_does_nothing() {
        let fetcher = FakeFetcher { doi_calls: AtomicUsize::new(0) };
        let mut cache = Cache::load(None);
        let occurrence = occ(0, "https://doi.org/10.1145/3618394");
        let outcome = try_add_all(
            &[&occurrence],
            AutoAddPolicy::Disabled,
            &fetcher,
            &mut cache,
            RetryConfig::default(),
        );
        assert!(outcome.added.is_empty());
        assert_eq!(fetcher.doi_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dry_run_plans_without_mutating_cache() {
        let fetcher = FakeFetcher { doi_calls: AtomicUsize::new(0) };
        let mut cache = Cache::load(None);
        let occurrence = occ(0, "https://doi.org/10.1145/3618394");
        let outcome = try_add_all(
            &[&occurrence],
            AutoAddPolicy::DryRun,
            &fetcher,
            &mut cache,
            RetryConfig::default(),
        );
        assert_eq!(outcome.plans.len(), 1);
        assert!(outcome.added.is_empty());
        assert!(!cache.dirty);
    }

    #[test]
    fn real_policy_adds_and_caches() {
        let fetcher = FakeFetcher { doi_calls: AtomicUsize::new(0) };
        let mut cache = Cache::load(None);
        let occurrence = occ(0, "https://doi.org/10.1145/3618394");
        let outcome = try_add_all(
            &[&occurrence],
            AutoAddPolicy::Real,
            &fetcher,
            &mut cache,
            RetryConfig::default(),
        );
        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.added[0].1.title, "Attention Is All You Need");
        assert!(cache.get("doi:10.1145/3618394").is_some());
    }
}
