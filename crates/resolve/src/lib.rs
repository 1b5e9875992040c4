// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Citation Matcher: binds citation
//! occurrences to reference records, first against the local library,
//! then — subject to policy — against external metadata services.

mod cache;
mod error;
mod fetch;
mod gateway;
mod matcher;
mod validate;

pub use cache::Cache;
pub use error::{FetchError, ValidationError};
pub use fetch::{FetchedMetadata, MetadataFetcher, ReqwestFetcher};
pub use gateway::{try_add_all, AutoAddFailure, AutoAddOutcome, AutoAddPlan, AutoAddPolicy, RetryConfig};
pub use matcher::{match_all, match_occurrence, Attempt, MatchReport, MatchResult, Strategy, StrategyCounters};
pub use validate::validate;
