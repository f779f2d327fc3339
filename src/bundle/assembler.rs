use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeSet;
use tracing::info;

use crate::bundle::{content, stamp};
use crate::domain::{CommitRef, ReleaseTag};
use crate::error::{BundleError, Result};
use crate::git::Repository;
use crate::resolver::StartPoint;

/// A file chosen for the bundle, with its content as of the end commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub content: String,
}

/// The assembled release artifact
#[derive(Debug, Clone)]
pub struct ReleaseBundle {
    /// Sorted by path
    pub files: Vec<SelectedFile>,
    pub start: StartPoint,
    pub end: CommitRef,
    pub tag: ReleaseTag,
    pub generated_at: DateTime<Utc>,
    pub release_type: String,
    /// Database switched to before the guard, if known
    pub database: Option<String>,
    /// Release name the database must hold, for a recorded start
    pub recorded_bundle: Option<String>,
}

impl ReleaseBundle {
    /// Bundle name, as recorded on the database
    pub fn name(&self) -> String {
        self.tag.to_string()
    }

    pub fn file_name(&self) -> String {
        format!("{}.sql", self.name())
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }

    /// Banner, optional `USE`, and the idempotency guard
    pub fn header(&self) -> String {
        let mut out = String::from(":on error exit\n");
        out.push_str("--\n");
        out.push_str(&format!("-- Release bundle: {}\n", self.name()));
        out.push_str(&format!("-- Release type:   {}\n", self.release_type));
        out.push_str(&format!("-- Start commit:   {}\n", self.start));
        out.push_str(&format!("-- End commit:     {}\n", self.end.id));
        out.push_str(&format!("-- Files:          {}\n", self.files.len()));
        out.push_str(&format!(
            "-- Generated at:   {}\n",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push_str("--\n");

        if let Some(database) = &self.database {
            out.push_str(&stamp::use_database(database));
        }

        out.push_str(&stamp::guard(
            &self.release_type,
            &self.tag,
            self.recorded_bundle.as_deref(),
        ));
        out
    }

    /// Concatenated file contents with source markers.
    ///
    /// Depends only on the selected paths and their content at the end
    /// commit, never on the generation time.
    pub fn body(&self) -> String {
        self.files
            .iter()
            .map(|f| stamp::file_block(&f.path, &f.content))
            .collect()
    }

    /// State write executed once every earlier batch has succeeded
    pub fn footer(&self) -> String {
        stamp::record_release(&self.release_type, &self.tag, &self.end.id.to_string())
    }

    /// The complete bundle text
    pub fn render(&self) -> String {
        let mut out = self.header();
        out.push_str(&self.body());
        out.push_str(&self.footer());
        out
    }
}

/// Reads, orders and wraps selected files into a [ReleaseBundle]
pub struct BundleAssembler<'a, R: Repository> {
    repo: &'a R,
    release_type: String,
    database: Option<String>,
    recorded_bundle: Option<String>,
}

impl<'a, R: Repository> BundleAssembler<'a, R> {
    pub fn new(repo: &'a R, release_type: impl Into<String>, database: Option<String>) -> Self {
        BundleAssembler {
            repo,
            release_type: release_type.into(),
            database,
            recorded_bundle: None,
        }
    }

    /// Name of the release read for the database. The guard only uses it
    /// when the bundle starts from [StartPoint::Recorded].
    pub fn with_recorded_bundle(mut self, name: Option<String>) -> Self {
        self.recorded_bundle = name;
        self
    }

    /// Assemble a bundle from the selected paths, read at `end`.
    ///
    /// Paths are deduplicated and sorted by case-sensitive byte order. Any
    /// unreadable path aborts the whole bundle.
    pub fn assemble<I>(
        &self,
        paths: I,
        start: StartPoint,
        end: CommitRef,
        tag: ReleaseTag,
        generated_at: DateTime<Utc>,
    ) -> Result<ReleaseBundle>
    where
        I: IntoIterator<Item = String>,
    {
        let ordered: BTreeSet<String> = paths.into_iter().collect();

        if ordered.is_empty() {
            return Err(BundleError::NoFilesSelected(format!(
                "nothing to bundle between {} and {}",
                start.short_id(),
                end.short()
            )));
        }

        let recorded_bundle = match &start {
            StartPoint::Recorded(_) => self.recorded_bundle.clone(),
            _ => None,
        };

        let mut files = Vec::with_capacity(ordered.len());
        for path in ordered {
            let bytes = self.repo.read_file_at(&path, &end)?;
            info!(path = %path, "Adding file to bundle");
            let content = content::prepare(&bytes, &path);
            files.push(SelectedFile { path, content });
        }

        Ok(ReleaseBundle {
            files,
            start,
            end,
            tag,
            generated_at,
            release_type: self.release_type.clone(),
            database: self.database.clone(),
            recorded_bundle,
        })
    }
}
