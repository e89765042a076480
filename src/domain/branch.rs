use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::error::{AppError, AppResult};

lazy_static! {
    static ref BOT_BRANCH_PATTERNS: Vec<Regex> =
        vec![Regex::new(r"^dependabot").expect("bot branch pattern")];
    static ref DEFAULT_BRANCH_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^master$").expect("default branch pattern"),
        Regex::new(r"^production$").expect("default branch pattern"),
        Regex::new(r"^gh-pages$").expect("default branch pattern"),
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a branch is exempt from linking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Bot,
    DefaultBranch,
    IgnorePattern,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Bot => "bot",
            SkipReason::DefaultBranch => "default-branch",
            SkipReason::IgnorePattern => "ignore-pattern",
        }
    }
}

/// Compiles the user supplied `skip-branches` expression.
///
/// An empty pattern never matches anything, so it yields `None` rather than a
/// regex that would match every branch.
pub fn compile_ignore_pattern(pattern: &str) -> AppResult<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern).map(Some).map_err(|err| {
        AppError::Configuration(format!("invalid skip-branches pattern '{pattern}': {err}"))
    })
}

pub fn skip_reason(branch: &str, ignore: Option<&Regex>) -> Option<SkipReason> {
    if BOT_BRANCH_PATTERNS.iter().any(|re| re.is_match(branch)) {
        info!(branch, "branch looks like a bot branch, skipping");
        return Some(SkipReason::Bot);
    }

    if DEFAULT_BRANCH_PATTERNS.iter().any(|re| re.is_match(branch)) {
        info!(branch, "ignoring default branch");
        return Some(SkipReason::DefaultBranch);
    }

    if let Some(pattern) = ignore {
        if pattern.is_match(branch) {
            info!(
                branch,
                pattern = pattern.as_str(),
                "branch matches the skip-branches pattern"
            );
            return Some(SkipReason::IgnorePattern);
        }
    }

    None
}

pub fn should_skip_branch(branch: &str, ignore: Option<&Regex>) -> bool {
    skip_reason(branch, ignore).is_some()
}
