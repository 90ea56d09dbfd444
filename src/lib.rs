pub mod boundary;
pub mod cli;
pub mod config;
pub mod decision;
pub mod domain;
pub mod error;
pub mod git;
pub mod publish;
pub mod retry;
pub mod ui;

pub use error::{PublishError, Result};
