use git2::Oid;
use std::fmt;

/// Length of the abbreviated commit ids used in bundle names
pub const SHORT_ID_LEN: usize = 8;

/// A resolved point in repository history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub id: Oid,
    /// Distance from the root commit along first parents (root = 0)
    pub ordinal: usize,
    pub parents: Vec<Oid>,
}

impl CommitRef {
    /// Create a new commit reference
    pub fn new(id: Oid, ordinal: usize, parents: Vec<Oid>) -> Self {
        CommitRef {
            id,
            ordinal,
            parents,
        }
    }

    /// Abbreviated id (e.g. "3f9a01bc")
    pub fn short(&self) -> String {
        short_id(self.id)
    }

    /// First parent, if any. Root commits have none.
    pub fn first_parent(&self) -> Option<Oid> {
        self.parents.first().copied()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// Abbreviate an object id to [SHORT_ID_LEN] hex characters
pub fn short_id(oid: Oid) -> String {
    let mut hex = oid.to_string();
    hex.truncate(SHORT_ID_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    #[test]
    fn test_short_id() {
        let commit = CommitRef::new(oid(0xab), 3, vec![oid(0x01)]);
        assert_eq!(commit.short(), "abababab");
        assert_eq!(commit.to_string(), "abababab");
    }

    #[test]
    fn test_root_and_merge() {
        let root = CommitRef::new(oid(1), 0, vec![]);
        assert!(root.is_root());
        assert!(!root.is_merge());
        assert_eq!(root.first_parent(), None);

        let merge = CommitRef::new(oid(4), 3, vec![oid(3), oid(2)]);
        assert!(merge.is_merge());
        assert_eq!(merge.first_parent(), Some(oid(3)));
    }
}
