//! Main workflow orchestration logic
//!
//! This module holds the bundle workflow separately from CLI argument
//! parsing, so it can be driven programmatically (and tested against a mock
//! repository) without depending on clap.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::boundary::SelectionWarning;
use crate::bundle::{BundleAssembler, ReleaseBundle};
use crate::config::Config;
use crate::domain::{DatabaseUri, FileSelector, ReleaseState, TagTemplate};
use crate::error::{BundleError, Result};
use crate::git::Repository;
use crate::resolver::{HistoryMode, RangeResolver};
use crate::store::ReleaseStateStore;

/// Arguments for the bundle workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// Every `None` falls back to the configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BundleWorkflowArgs {
    /// Label template for the bundle name (e.g. "v2.4" or "{timestamp}")
    pub release_tag: Option<String>,

    /// Target database, `[mssql://][user[:password]@]server/database`
    pub dburi: Option<String>,

    /// Start commit (exclusive); overrides the database's recorded state
    pub from_commit: Option<String>,

    /// End commit (inclusive); defaults to HEAD
    pub to_commit: Option<String>,

    pub code_pattern: Option<String>,

    /// Explicit file list; bypasses range scanning entirely
    pub files: Option<Vec<String>>,

    pub release_type: Option<String>,

    /// Bundle name last applied to the database, when known by the caller
    pub applied_bundle: Option<String>,

    /// Follow first parents through merges instead of rejecting them
    pub first_parent: bool,
}

/// Result of a successful bundle workflow
#[derive(Debug, Clone)]
pub struct WorkflowResult {
    pub bundle: ReleaseBundle,

    /// Commits scanned (zero in file-list mode)
    pub commits_scanned: usize,

    pub warnings: Vec<SelectionWarning>,
}

/// Read an explicit file list: one repository-relative path per line.
/// Blank lines and `#` comments are ignored.
pub fn read_file_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| {
        BundleError::config(format!("Cannot read file list {}: {}", path.display(), e))
    })?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.replace('\\', "/"))
        .collect())
}

/// Main bundle workflow
///
/// Orchestrates one release:
/// 1. Look up the target database's recorded release
/// 2. Resolve the start and end commits
/// 3. Collect changed files in range (or take the explicit list)
/// 4. Filter by the code pattern
/// 5. Generate the tag and refuse one already applied
/// 6. Assemble the bundle
///
/// Nothing is written; the caller decides where the bundle goes.
pub fn run_bundle_workflow<R, S>(
    repo: &R,
    store: &S,
    args: &BundleWorkflowArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<WorkflowResult>
where
    R: Repository,
    S: ReleaseStateStore,
{
    let mut warnings = Vec::new();

    let database = args
        .dburi
        .as_deref()
        .map(DatabaseUri::parse)
        .transpose()?;

    let recorded = match (&args.applied_bundle, &database) {
        (Some(name), _) => Some(ReleaseState::from_bundle_name(name, None)?),
        (None, Some(db)) => {
            let state = store.read_last_applied(db)?;
            if state.is_none() {
                warnings.push(SelectionWarning::NoRecordedRelease {
                    database: db.to_string(),
                });
            }
            state
        }
        (None, None) => {
            warnings.push(SelectionWarning::NoDatabaseState);
            None
        }
    };

    let mode = if args.first_parent {
        HistoryMode::FirstParent
    } else {
        config.history
    };
    let resolver = RangeResolver::new(repo, mode);
    let start = resolver.resolve_start(args.from_commit.as_deref(), recorded.as_ref())?;
    let end = resolver.resolve_end(args.to_commit.as_deref())?;

    let (paths, commits_scanned) = match &args.files {
        Some(files) => {
            warnings.push(SelectionWarning::ExplicitFileList { count: files.len() });
            (files.iter().cloned().collect::<BTreeSet<_>>(), 0)
        }
        None => {
            let pattern = args.code_pattern.as_deref().unwrap_or(&config.code_pattern);
            let selector = FileSelector::new(pattern);
            let range = resolver.resolve(start.clone(), end.clone())?;

            if range.is_empty() {
                return Err(BundleError::NoFilesSelected(format!(
                    "start and end are the same commit ({}); no changes in range",
                    end.short()
                )));
            }

            let mut selected = BTreeSet::new();
            for change in range.changes.touched() {
                if change.is_deleted() {
                    warnings.push(SelectionWarning::SkippedDeleted {
                        path: change.path.clone(),
                    });
                } else if !selector.matches(&change.path) {
                    warnings.push(SelectionWarning::SkippedByPattern {
                        path: change.path.clone(),
                        pattern: selector.pattern().to_string(),
                    });
                } else {
                    debug!(path = %change.path, "Selected");
                    selected.insert(change.path.clone());
                }
            }

            if selected.is_empty() {
                return Err(BundleError::NoFilesSelected(format!(
                    "no files matching '{}' changed between {} and {}",
                    selector.pattern(),
                    start.short_id(),
                    end.short()
                )));
            }

            (selected, range.commits.len())
        }
    };

    let template = TagTemplate::new(
        args.release_tag
            .clone()
            .unwrap_or_else(|| config.tag_template.clone()),
    );
    let tag = template.render(now, &start.short_id(), &end.short())?;

    if let Some(state) = &recorded {
        if state.last_applied_tag == tag.to_string() {
            return Err(BundleError::TagCollision(tag.to_string()));
        }
    }

    let release_type = args
        .release_type
        .clone()
        .unwrap_or_else(|| config.release_type.clone());
    let assembler = BundleAssembler::new(
        repo,
        release_type,
        database.as_ref().map(|db| db.database.clone()),
    )
    .with_recorded_bundle(recorded.map(|state| state.last_applied_tag));
    let bundle = assembler.assemble(paths, start, end, tag, now)?;

    info!(
        bundle = %bundle.name(),
        files = bundle.files.len(),
        "Assembled release bundle"
    );

    Ok(WorkflowResult {
        bundle,
        commits_scanned,
        warnings,
    })
}
