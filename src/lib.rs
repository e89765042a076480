//! # jira-pr-link
//!
//! Finds a Jira issue key in a pull request title or branch name and keeps a
//! summary of that issue at the top of the pull request description.

pub mod cmd;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;
#[cfg(test)]
mod testing;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
