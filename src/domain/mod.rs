//! Domain logic - pure rules independent of git and database access

pub mod change;
pub mod commit;
pub mod database;
pub mod selector;
pub mod state;
pub mod tag;

pub use change::{ChangeKind, ChangeSet, FileChange};
pub use commit::{short_id, CommitRef, SHORT_ID_LEN};
pub use database::DatabaseUri;
pub use selector::{FileSelector, DEFAULT_PATTERN};
pub use state::ReleaseState;
pub use tag::{ReleaseTag, TagTemplate, ROOT_START_ID};
