use git2::Oid;
use std::collections::BTreeMap;

/// How a path was touched by a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed { from: String },
}

/// A path touched within a commit range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
    /// Commit at which the path was last touched
    pub commit: Oid,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind, commit: Oid) -> Self {
        FileChange {
            path: path.into(),
            kind,
            commit,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.kind == ChangeKind::Deleted
    }
}

/// Last-write-wins aggregation of file changes over a range.
///
/// Changes must be recorded oldest commit first. A rename is recorded as a
/// deletion of the old path plus a change at the new path, so the old path
/// drops out of [ChangeSet::live_paths] unless it is re-added later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    latest: BTreeMap<String, FileChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one change, replacing whatever was known about its path
    pub fn record(&mut self, change: FileChange) {
        if let ChangeKind::Renamed { from } = &change.kind {
            self.latest.insert(
                from.clone(),
                FileChange::new(from.clone(), ChangeKind::Deleted, change.commit),
            );
        }
        self.latest.insert(change.path.clone(), change);
    }

    pub fn get(&self, path: &str) -> Option<&FileChange> {
        self.latest.get(path)
    }

    /// Paths whose latest change is not a deletion, in path order
    pub fn live_paths(&self) -> Vec<String> {
        self.live_changes().map(|c| c.path.clone()).collect()
    }

    pub fn live_changes(&self) -> impl Iterator<Item = &FileChange> {
        self.latest.values().filter(|c| !c.is_deleted())
    }

    /// Every path touched in the range, including deleted ones
    pub fn touched(&self) -> impl Iterator<Item = &FileChange> {
        self.latest.values()
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

impl FromIterator<FileChange> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = FileChange>>(iter: I) -> Self {
        let mut set = ChangeSet::new();
        for change in iter {
            set.record(change);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    #[test]
    fn test_last_write_wins() {
        let set: ChangeSet = vec![
            FileChange::new("x.sql", ChangeKind::Added, oid(1)),
            FileChange::new("x.sql", ChangeKind::Modified, oid(3)),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("x.sql").unwrap().commit, oid(3));
        assert_eq!(set.live_paths(), vec!["x.sql".to_string()]);
    }

    #[test]
    fn test_delete_suppresses_path() {
        let set: ChangeSet = vec![
            FileChange::new("x.sql", ChangeKind::Added, oid(1)),
            FileChange::new("x.sql", ChangeKind::Deleted, oid(2)),
        ]
        .into_iter()
        .collect();

        assert!(set.live_paths().is_empty());
        assert_eq!(set.touched().count(), 1);
    }

    #[test]
    fn test_readd_after_delete_is_live() {
        let set: ChangeSet = vec![
            FileChange::new("x.sql", ChangeKind::Deleted, oid(1)),
            FileChange::new("x.sql", ChangeKind::Added, oid(2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.live_paths(), vec!["x.sql".to_string()]);
    }

    #[test]
    fn test_rename_excludes_old_path() {
        let set: ChangeSet = vec![
            FileChange::new("old.sql", ChangeKind::Added, oid(1)),
            FileChange::new(
                "new.sql",
                ChangeKind::Renamed {
                    from: "old.sql".to_string(),
                },
                oid(2),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.live_paths(), vec!["new.sql".to_string()]);
        assert!(set.get("old.sql").unwrap().is_deleted());
    }

    #[test]
    fn test_rename_twice_keeps_final_path() {
        let set: ChangeSet = vec![
            FileChange::new(
                "b.sql",
                ChangeKind::Renamed {
                    from: "a.sql".to_string(),
                },
                oid(1),
            ),
            FileChange::new(
                "c.sql",
                ChangeKind::Renamed {
                    from: "b.sql".to_string(),
                },
                oid(2),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.live_paths(), vec!["c.sql".to_string()]);
    }
}
