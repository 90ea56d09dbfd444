//! CLI entry points
//!
//! Organizes command-line interface concerns separately from the publish
//! sequence so the workflow can be driven without clap.

pub mod orchestration;

pub use orchestration::{run_publish_workflow, PublishWorkflowArgs};
