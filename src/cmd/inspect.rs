use std::fmt;

use crate::config::{ExtractionSettings, KeySource};
use crate::domain::branch::{BranchName, SkipReason, skip_reason};
use crate::domain::issue_key::IssueKey;
use crate::domain::pull_request::PullRequest;
use crate::error::AppError;
use crate::workflow::link::resolve_issue_key;

#[derive(Debug, Clone, Default)]
pub struct InspectArgs {
    pub title: String,
    pub branch: String,
}

/// What a run would do with the given title and branch, without any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectReport {
    Skipped(SkipReason),
    Found { key: IssueKey, source: KeySource },
    NotFound(KeySource),
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectReport::Skipped(reason) => write!(f, "skipped ({})", reason.as_str()),
            InspectReport::Found { key, source } => write!(f, "{key} (from {source})"),
            InspectReport::NotFound(source) => write!(f, "no issue key found in {source}"),
        }
    }
}

pub fn run(settings: &ExtractionSettings, args: InspectArgs) -> InspectReport {
    if let Some(reason) = skip_reason(&args.branch, settings.skip_branches.as_ref()) {
        return InspectReport::Skipped(reason);
    }

    let pr = PullRequest {
        number: 0,
        title: args.title,
        body: String::new(),
        head: BranchName(args.branch),
    };

    match resolve_issue_key(settings, &pr) {
        Ok((key, source)) => InspectReport::Found { key, source },
        Err(AppError::IssueKeyNotFound { searched }) => InspectReport::NotFound(searched),
        Err(_) => InspectReport::NotFound(settings.key_source),
    }
}
