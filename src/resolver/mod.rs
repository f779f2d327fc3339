//! Commit-range resolution: which commits and files a release covers

pub mod range_resolver;

pub use range_resolver::{HistoryMode, RangeResolver, ResolvedRange, StartPoint};
