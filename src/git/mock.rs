use crate::domain::{ChangeKind, CommitRef, FileChange};
use crate::error::{BundleError, Result};
use crate::git::Repository;
use git2::Oid;
use std::collections::{BTreeMap, HashMap};

/// A file operation applied by a mock commit
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Write(String, Vec<u8>),
    Delete(String),
    Rename(String, String),
}

impl Edit {
    pub fn write(path: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        Edit::Write(path.into(), content.as_ref().to_vec())
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Edit::Delete(path.into())
    }

    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        Edit::Rename(from.into(), to.into())
    }
}

struct MockCommit {
    commit: CommitRef,
    changes: Vec<FileChange>,
    tree: BTreeMap<String, Vec<u8>>,
}

/// Mock repository for testing without actual git operations
///
/// Each commit stores a full snapshot of its tree, derived from its first
/// parent plus the commit's edits.
pub struct MockRepository {
    commits: HashMap<Oid, MockCommit>,
    refs: HashMap<String, Oid>,
    head: Option<Oid>,
    next_id: u32,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            refs: HashMap::new(),
            head: None,
            next_id: 1,
        }
    }

    /// Commit on top of HEAD and advance HEAD
    pub fn commit(&mut self, edits: &[Edit]) -> Result<CommitRef> {
        let parents: Vec<Oid> = self.head.into_iter().collect();
        let commit = self.commit_with_parents(&parents, edits)?;
        self.head = Some(commit.id);
        Ok(commit)
    }

    /// Commit with explicit parents; HEAD is left where it is.
    ///
    /// Edits apply on top of the first parent's tree, as a merge's diff would.
    pub fn commit_with_parents(&mut self, parents: &[Oid], edits: &[Edit]) -> Result<CommitRef> {
        let base = match parents.first() {
            Some(parent) => Some(self.find(*parent)?),
            None => None,
        };
        let ordinal = base.map_or(0, |b| b.commit.ordinal + 1);
        let mut tree = base.map(|b| b.tree.clone()).unwrap_or_default();

        let id = self.allocate_id()?;
        let mut changes = Vec::new();

        for edit in edits {
            match edit {
                Edit::Write(path, content) => {
                    let kind = if tree.contains_key(path) {
                        ChangeKind::Modified
                    } else {
                        ChangeKind::Added
                    };
                    tree.insert(path.clone(), content.clone());
                    changes.push(FileChange::new(path.clone(), kind, id));
                }
                Edit::Delete(path) => {
                    if tree.remove(path).is_none() {
                        return Err(BundleError::content_missing(path.clone(), "mock parent"));
                    }
                    changes.push(FileChange::new(path.clone(), ChangeKind::Deleted, id));
                }
                Edit::Rename(from, to) => {
                    let content = tree
                        .remove(from)
                        .ok_or_else(|| BundleError::content_missing(from.clone(), "mock parent"))?;
                    tree.insert(to.clone(), content);
                    changes.push(FileChange::new(
                        to.clone(),
                        ChangeKind::Renamed { from: from.clone() },
                        id,
                    ));
                }
            }
        }

        let commit = CommitRef::new(id, ordinal, parents.to_vec());
        self.commits.insert(
            id,
            MockCommit {
                commit: commit.clone(),
                changes,
                tree,
            },
        );

        Ok(commit)
    }

    /// Name a commit (branch or tag style) so it can be resolved by name
    pub fn add_ref(&mut self, name: impl Into<String>, oid: Oid) {
        self.refs.insert(name.into(), oid);
    }

    /// Move HEAD
    pub fn set_head(&mut self, oid: Oid) {
        self.head = Some(oid);
    }

    fn find(&self, oid: Oid) -> Result<&MockCommit> {
        self.commits
            .get(&oid)
            .ok_or_else(|| BundleError::RefNotFound(oid.to_string()))
    }

    fn allocate_id(&mut self) -> Result<Oid> {
        let mut bytes = [0u8; 20];
        for chunk in bytes.chunks_mut(4) {
            chunk.copy_from_slice(&self.next_id.to_be_bytes());
        }
        self.next_id += 1;
        Ok(Oid::from_bytes(&bytes)?)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn resolve_commit(&self, token: &str) -> Result<CommitRef> {
        if token == "HEAD" {
            return self.head_commit();
        }

        if let Some(oid) = self.refs.get(token) {
            return Ok(self.find(*oid)?.commit.clone());
        }

        let needle = token.to_lowercase();
        let mut candidates = self
            .commits
            .keys()
            .filter(|oid| needle.len() >= 4 && oid.to_string().starts_with(&needle));

        match (candidates.next(), candidates.next()) {
            (Some(oid), None) => Ok(self.find(*oid)?.commit.clone()),
            _ => Err(BundleError::RefNotFound(token.to_string())),
        }
    }

    fn head_commit(&self) -> Result<CommitRef> {
        let head = self
            .head
            .ok_or_else(|| BundleError::RefNotFound("HEAD".to_string()))?;
        Ok(self.find(head)?.commit.clone())
    }

    fn get_commits_between(
        &self,
        from: Option<&CommitRef>,
        to: &CommitRef,
    ) -> Result<Vec<CommitRef>> {
        let mut commits = Vec::new();
        let mut cursor = Some(to.id);

        while let Some(oid) = cursor {
            if from.map(|f| f.id) == Some(oid) {
                break;
            }
            let commit = &self.find(oid)?.commit;
            commits.push(commit.clone());
            cursor = commit.first_parent();
        }

        commits.reverse();
        Ok(commits)
    }

    fn get_changes_in(&self, commit: &CommitRef) -> Result<Vec<FileChange>> {
        Ok(self.find(commit.id)?.changes.clone())
    }

    fn read_file_at(&self, path: &str, commit: &CommitRef) -> Result<Vec<u8>> {
        self.find(commit.id)?
            .tree
            .get(path)
            .cloned()
            .ok_or_else(|| BundleError::content_missing(path, commit.short()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_basic() {
        let mut repo = MockRepository::new();
        let c1 = repo.commit(&[Edit::write("x.sql", "select 1;")]).unwrap();

        assert_eq!(repo.head_commit().unwrap(), c1);
        assert_eq!(c1.ordinal, 0);
        assert!(c1.is_root());
        assert_eq!(repo.read_file_at("x.sql", &c1).unwrap(), b"select 1;");
    }

    #[test]
    fn test_change_kinds() {
        let mut repo = MockRepository::new();
        repo.commit(&[Edit::write("a.sql", "1"), Edit::write("b.sql", "2")])
            .unwrap();
        let c2 = repo
            .commit(&[
                Edit::write("a.sql", "1b"),
                Edit::delete("b.sql"),
            ])
            .unwrap();
        let c3 = repo.commit(&[Edit::rename("a.sql", "c.sql")]).unwrap();

        let kinds: Vec<ChangeKind> = repo
            .get_changes_in(&c2)
            .unwrap()
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(kinds, vec![ChangeKind::Modified, ChangeKind::Deleted]);

        let renamed = repo.get_changes_in(&c3).unwrap();
        assert_eq!(
            renamed[0].kind,
            ChangeKind::Renamed {
                from: "a.sql".to_string()
            }
        );
        assert!(repo.read_file_at("a.sql", &c3).is_err());
        assert_eq!(repo.read_file_at("c.sql", &c3).unwrap(), b"1b");
    }

    #[test]
    fn test_resolve_by_ref_and_prefix() {
        let mut repo = MockRepository::new();
        let c1 = repo.commit(&[Edit::write("x.sql", "1")]).unwrap();
        repo.add_ref("v1", c1.id);

        assert_eq!(repo.resolve_commit("v1").unwrap(), c1);
        assert_eq!(repo.resolve_commit(&c1.short()).unwrap(), c1);
        assert_eq!(repo.resolve_commit("HEAD").unwrap(), c1);
        assert!(matches!(
            repo.resolve_commit("nope"),
            Err(BundleError::RefNotFound(_))
        ));
    }

    #[test]
    fn test_get_commits_between() {
        let mut repo = MockRepository::new();
        let c1 = repo.commit(&[Edit::write("a", "1")]).unwrap();
        let c2 = repo.commit(&[Edit::write("a", "2")]).unwrap();
        let c3 = repo.commit(&[Edit::write("a", "3")]).unwrap();

        let range = repo.get_commits_between(Some(&c1), &c3).unwrap();
        assert_eq!(range, vec![c2.clone(), c3.clone()]);

        let all = repo.get_commits_between(None, &c3).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], c1);
        assert_eq!(c3.ordinal, 2);
    }

    #[test]
    fn test_delete_of_missing_path_fails() {
        let mut repo = MockRepository::new();
        assert!(repo.commit(&[Edit::delete("ghost.sql")]).is_err());
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.head_commit().is_err());
    }
}
