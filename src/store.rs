//! Release-state lookup for target databases
//!
//! The state itself lives on the database and is only ever written by
//! executing a bundle's footer. This module reads it through the
//! [ReleaseStateStore] trait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::domain::{DatabaseUri, ReleaseState};
use crate::error::Result;

/// Source of the last release applied to a database
pub trait ReleaseStateStore {
    /// The last applied release, or `None` when nothing has been released
    fn read_last_applied(&self, database: &DatabaseUri) -> Result<Option<ReleaseState>>;
}

/// A release recorded for one database, as exported from
/// `release.fn_release_bundle`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordedRelease {
    /// Full bundle name, e.g. "20260101-093000-1a2b3c4d-5e6f7a8b"
    pub bundle: String,

    /// Commit released to; derived from the bundle name when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl RecordedRelease {
    pub fn new(bundle: impl Into<String>) -> Self {
        RecordedRelease {
            bundle: bundle.into(),
            commit: None,
            applied_at: None,
        }
    }

    fn to_state(&self) -> Result<ReleaseState> {
        match &self.commit {
            Some(commit) => Ok(ReleaseState::new(
                commit.clone(),
                self.bundle.clone(),
                self.applied_at,
            )),
            None => ReleaseState::from_bundle_name(&self.bundle, self.applied_at),
        }
    }
}

/// Release state keyed by database identity (`server/database`, lowercase)
#[derive(Debug, Clone, Default)]
pub struct RecordedStateStore {
    releases: BTreeMap<String, RecordedRelease>,
}

impl RecordedStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[databases]` table of the configuration
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a RecordedRelease)>,
    {
        let releases = entries
            .into_iter()
            .map(|(key, release)| (key.to_lowercase(), release.clone()))
            .collect();
        RecordedStateStore { releases }
    }

    /// Record (or override) the release for a database
    pub fn record(&mut self, database: &DatabaseUri, release: RecordedRelease) {
        self.releases.insert(database.identity(), release);
    }
}

impl ReleaseStateStore for RecordedStateStore {
    fn read_last_applied(&self, database: &DatabaseUri) -> Result<Option<ReleaseState>> {
        let identity = database.identity();
        match self.releases.get(&identity) {
            Some(release) => {
                let state = release.to_state()?;
                info!(
                    database = %identity,
                    bundle = %state.last_applied_tag,
                    "Found last release applied to database"
                );
                Ok(Some(state))
            }
            None => {
                debug!(database = %identity, "No release recorded for database");
                Ok(None)
            }
        }
    }
}
