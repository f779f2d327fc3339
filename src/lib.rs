pub mod boundary;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod resolver;
pub mod store;
pub mod ui;

pub use error::{BundleError, Result};
