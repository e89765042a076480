use tracing::{error, info};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::actions::{StepOutputs, WorkflowEvent, error_annotation};
use crate::workflow::link::{LinkOutcome, link_pull_request};

pub const OUTPUT_FOUND: &str = "jira-issue-found";
pub const OUTPUT_SOURCE: &str = "jira-issue-source";
pub const OUTPUT_KEY: &str = "jira-issue-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Success,
    Failure,
}

/// Runs the link workflow and reports it through step outputs.
///
/// A failed run only fails the job when `fail-when-jira-issue-not-found` is set.
pub async fn run(
    ctx: &AppContext,
    event: &WorkflowEvent,
    outputs: &StepOutputs,
) -> AppResult<SyncStatus> {
    match link_pull_request(ctx, event).await {
        Ok(LinkOutcome::Linked { key, source }) => {
            outputs.set(OUTPUT_FOUND, "true")?;
            outputs.set(OUTPUT_SOURCE, source.as_str())?;
            outputs.set(OUTPUT_KEY, key.as_str())?;
            Ok(SyncStatus::Success)
        }
        Ok(LinkOutcome::Skipped(cause)) => {
            info!(?cause, "nothing to link");
            write_not_found(outputs)?;
            Ok(SyncStatus::Success)
        }
        Err(err) => {
            error!(error = %err, "failed to add Jira description to pull request");
            error_annotation(&err.to_string());
            write_not_found(outputs)?;
            if ctx.config.fail_when_issue_not_found {
                Ok(SyncStatus::Failure)
            } else {
                Ok(SyncStatus::Success)
            }
        }
    }
}

fn write_not_found(outputs: &StepOutputs) -> AppResult<()> {
    outputs.set(OUTPUT_FOUND, "false")?;
    outputs.set(OUTPUT_SOURCE, "null")?;
    outputs.set(OUTPUT_KEY, "")
}
