use crate::domain::{ChangeKind, CommitRef, FileChange};
use crate::error::{BundleError, Result};
use git2::{Delta, DiffFindOptions, ErrorCode, Oid, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
///
/// Content is read straight from the object database, so neither the
/// working tree nor the index is touched.
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn commit_ref(&self, commit: &git2::Commit<'_>) -> Result<CommitRef> {
        let ordinal = self.first_parent_depth(commit.id())?;
        Ok(CommitRef::new(
            commit.id(),
            ordinal,
            commit.parent_ids().collect(),
        ))
    }

    /// Number of first-parent steps from `oid` back to the root commit
    fn first_parent_depth(&self, oid: Oid) -> Result<usize> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(oid)?;
        revwalk.simplify_first_parent()?;

        let mut count = 0usize;
        for oid_result in revwalk {
            oid_result?;
            count += 1;
        }

        Ok(count.saturating_sub(1))
    }
}

fn delta_path(file: git2::DiffFile<'_>) -> Option<String> {
    file.path().map(|p| p.to_string_lossy().replace('\\', "/"))
}

impl super::Repository for Git2Repository {
    fn resolve_commit(&self, token: &str) -> Result<CommitRef> {
        let object = self.repo.revparse_single(token).map_err(|e| match e.code() {
            ErrorCode::NotFound | ErrorCode::Ambiguous | ErrorCode::InvalidSpec => {
                BundleError::RefNotFound(token.to_string())
            }
            _ => BundleError::Git(e),
        })?;

        let commit = object
            .peel_to_commit()
            .map_err(|_| BundleError::RefNotFound(token.to_string()))?;

        self.commit_ref(&commit)
    }

    fn head_commit(&self) -> Result<CommitRef> {
        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch | ErrorCode::NotFound => {
                BundleError::RefNotFound("HEAD".to_string())
            }
            _ => BundleError::Git(e),
        })?;

        let commit = head
            .peel_to_commit()
            .map_err(|_| BundleError::RefNotFound("HEAD".to_string()))?;

        self.commit_ref(&commit)
    }

    fn get_commits_between(
        &self,
        from: Option<&CommitRef>,
        to: &CommitRef,
    ) -> Result<Vec<CommitRef>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(to.id)?;
        revwalk.simplify_first_parent()?;

        let mut commits = Vec::new();

        for (steps, oid_result) in revwalk.enumerate() {
            let oid = oid_result?;

            if from.map(|f| f.id) == Some(oid) {
                break;
            }

            let commit = self.repo.find_commit(oid)?;
            commits.push(CommitRef::new(
                oid,
                to.ordinal.saturating_sub(steps),
                commit.parent_ids().collect(),
            ));
        }

        commits.reverse();
        Ok(commits)
    }

    fn get_changes_in(&self, commit: &CommitRef) -> Result<Vec<FileChange>> {
        let git_commit = self.repo.find_commit(commit.id)?;
        let new_tree = git_commit.tree()?;
        let old_tree = if git_commit.parent_count() > 0 {
            Some(git_commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut diff = self
            .repo
            .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let change = match delta.status() {
                Delta::Added | Delta::Copied => {
                    delta_path(delta.new_file()).map(|p| FileChange::new(p, ChangeKind::Added, commit.id))
                }
                Delta::Modified | Delta::Typechange => delta_path(delta.new_file())
                    .map(|p| FileChange::new(p, ChangeKind::Modified, commit.id)),
                Delta::Deleted => delta_path(delta.old_file())
                    .map(|p| FileChange::new(p, ChangeKind::Deleted, commit.id)),
                Delta::Renamed => match (delta_path(delta.old_file()), delta_path(delta.new_file())) {
                    (Some(from), Some(to)) => {
                        Some(FileChange::new(to, ChangeKind::Renamed { from }, commit.id))
                    }
                    _ => None,
                },
                // Ignored, untracked, unreadable and conflicted never appear in tree-to-tree diffs
                _ => None,
            };

            if let Some(change) = change {
                changes.push(change);
            }
        }

        debug!(commit = %commit, changes = changes.len(), "Collected changes");
        Ok(changes)
    }

    fn read_file_at(&self, path: &str, commit: &CommitRef) -> Result<Vec<u8>> {
        let git_commit = self.repo.find_commit(commit.id)?;
        let tree = git_commit.tree()?;

        let entry = tree.get_path(Path::new(path)).map_err(|e| match e.code() {
            ErrorCode::NotFound => BundleError::content_missing(path, commit.short()),
            _ => BundleError::Git(e),
        })?;

        let object = entry.to_object(&self.repo)?;
        let blob = object
            .peel_to_blob()
            .map_err(|_| BundleError::content_missing(path, commit.short()))?;

        Ok(blob.content().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;

    #[test]
    fn test_unborn_head_is_ref_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let repo = Git2Repository::from_git2(Git2Repo::init(dir.path()).unwrap());

        match repo.head_commit() {
            Err(BundleError::RefNotFound(token)) => assert_eq!(token, "HEAD"),
            other => panic!("expected RefNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_token_is_ref_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let repo = Git2Repository::from_git2(Git2Repo::init(dir.path()).unwrap());

        assert!(matches!(
            repo.resolve_commit("no-such-ref"),
            Err(BundleError::RefNotFound(_))
        ));
    }
}
