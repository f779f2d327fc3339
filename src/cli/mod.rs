//! Workflow entry points shared by the binary and tests

pub mod orchestration;

pub use orchestration::{read_file_list, run_bundle_workflow, BundleWorkflowArgs, WorkflowResult};
