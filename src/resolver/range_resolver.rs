use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::domain::{ChangeSet, CommitRef, ReleaseState, ROOT_START_ID};
use crate::error::{BundleError, Result};
use crate::git::Repository;

/// How merge commits inside a range are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryMode {
    /// Reject any range containing a merge commit
    #[default]
    Linear,
    /// Follow first parents only; a merge contributes its diff against its first parent
    FirstParent,
}

/// Where a range begins (exclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPoint {
    /// Supplied by the caller
    Explicit(CommitRef),
    /// Last commit released to the target database
    Recorded(CommitRef),
    /// Nothing recorded: the whole history, root commit included
    Root,
}

impl StartPoint {
    pub fn commit(&self) -> Option<&CommitRef> {
        match self {
            StartPoint::Explicit(c) | StartPoint::Recorded(c) => Some(c),
            StartPoint::Root => None,
        }
    }

    /// Abbreviated id used in bundle names and the idempotency guard
    pub fn short_id(&self) -> String {
        self.commit()
            .map(|c| c.short())
            .unwrap_or_else(|| ROOT_START_ID.to_string())
    }
}

impl fmt::Display for StartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartPoint::Explicit(c) => write!(f, "{} (explicit)", c.id),
            StartPoint::Recorded(c) => write!(f, "{} (recorded on database)", c.id),
            StartPoint::Root => write!(f, "repository root"),
        }
    }
}

/// A resolved commit interval and the files it touched
#[derive(Debug, Clone)]
pub struct ResolvedRange {
    pub start: StartPoint,
    pub end: CommitRef,
    /// Commits after start up to and including end, oldest first
    pub commits: Vec<CommitRef>,
    pub changes: ChangeSet,
}

impl ResolvedRange {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Resolves start/end references and aggregates the changes between them
pub struct RangeResolver<'a, R: Repository> {
    repo: &'a R,
    mode: HistoryMode,
}

impl<'a, R: Repository> RangeResolver<'a, R> {
    pub fn new(repo: &'a R, mode: HistoryMode) -> Self {
        RangeResolver { repo, mode }
    }

    /// Pick the start: explicit token, else recorded state, else the root
    pub fn resolve_start(
        &self,
        explicit: Option<&str>,
        recorded: Option<&ReleaseState>,
    ) -> Result<StartPoint> {
        if let Some(token) = explicit {
            let commit = self.repo.resolve_commit(token)?;
            info!(start = %commit.id, "Using explicit start commit");
            return Ok(StartPoint::Explicit(commit));
        }

        if let Some(state) = recorded {
            let commit = self.repo.resolve_commit(&state.last_applied_commit)?;
            info!(
                start = %commit.id,
                release = %state.last_applied_tag,
                "Using last commit released to the database"
            );
            return Ok(StartPoint::Recorded(commit));
        }

        info!("No start commit known; using the whole history");
        Ok(StartPoint::Root)
    }

    /// Pick the end: explicit token, else HEAD
    pub fn resolve_end(&self, explicit: Option<&str>) -> Result<CommitRef> {
        let end = match explicit {
            Some(token) => self.repo.resolve_commit(token)?,
            None => self.repo.head_commit()?,
        };
        info!(end = %end.id, "Using end commit");
        Ok(end)
    }

    /// Resolve both ends from tokens and walk the range between them
    pub fn resolve_tokens(
        &self,
        start: Option<&str>,
        recorded: Option<&ReleaseState>,
        end: Option<&str>,
    ) -> Result<ResolvedRange> {
        let start = self.resolve_start(start, recorded)?;
        let end = self.resolve_end(end)?;
        self.resolve(start, end)
    }

    /// Walk `start` (exclusive) to `end` (inclusive), aggregating changes
    /// with last-write-wins.
    pub fn resolve(&self, start: StartPoint, end: CommitRef) -> Result<ResolvedRange> {
        let commits = self.walk(&start, &end)?;

        let mut changes = ChangeSet::new();
        for commit in &commits {
            for change in self.repo.get_changes_in(commit)? {
                debug!(path = %change.path, kind = ?change.kind, commit = %commit, "Recording change");
                changes.record(change);
            }
        }

        info!(
            commits = commits.len(),
            touched = changes.len(),
            "Resolved range {} .. {}",
            start.short_id(),
            end.short()
        );

        Ok(ResolvedRange {
            start,
            end,
            commits,
            changes,
        })
    }

    fn walk(&self, start: &StartPoint, end: &CommitRef) -> Result<Vec<CommitRef>> {
        if let Some(from) = start.commit() {
            if from.id == end.id {
                return Ok(Vec::new());
            }
            if from.ordinal >= end.ordinal {
                return Err(BundleError::range(format!(
                    "start {} does not precede end {}",
                    from.short(),
                    end.short()
                )));
            }
        }

        let commits = self.repo.get_commits_between(start.commit(), end)?;

        if let Some(from) = start.commit() {
            let reached = commits.first().and_then(|c| c.first_parent()) == Some(from.id);
            if !reached {
                return Err(BundleError::range(format!(
                    "start {} is not an ancestor of end {} along first parents",
                    from.short(),
                    end.short()
                )));
            }
        }

        if self.mode == HistoryMode::Linear {
            if let Some(merge) = commits.iter().find(|c| c.is_merge()) {
                return Err(BundleError::range(format!(
                    "commit {} between {} and {} is a merge; branching history is not supported \
                     in linear mode (use first-parent history)",
                    merge.short(),
                    start.short_id(),
                    end.short()
                )));
            }
        }

        Ok(commits)
    }
}
