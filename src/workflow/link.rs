use tracing::{debug, info};

use crate::config::{ExtractionSettings, KeySource};
use crate::context::AppContext;
use crate::domain::branch::{SkipReason, skip_reason};
use crate::domain::description::{merge_description, render_summary};
use crate::domain::issue_key::IssueKey;
use crate::domain::pull_request::PullRequest;
use crate::error::{AppError, AppResult};
use crate::infra::actions::WorkflowEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipCause {
    NotPullRequest,
    Branch(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Skipped(SkipCause),
    /// `source` is the field the key came from, never `KeySource::Both`.
    Linked { key: IssueKey, source: KeySource },
}

/// Finds the issue key in the fields selected by `settings.key_source`.
/// With `Both`, the title wins and the branch is only searched as a fallback.
pub fn resolve_issue_key(
    settings: &ExtractionSettings,
    pr: &PullRequest,
) -> AppResult<(IssueKey, KeySource)> {
    let from_title = || {
        debug!(title = %pr.title, "looking in pull request title");
        settings
            .rule
            .extract(&pr.title)
            .map(|key| (key, KeySource::PrTitle))
    };
    let from_branch = || {
        debug!(branch = %pr.head, "looking in branch name");
        settings
            .rule
            .extract(pr.head.as_str())
            .map(|key| (key, KeySource::Branch))
    };

    let found = match settings.key_source {
        KeySource::Branch => from_branch(),
        KeySource::PrTitle => from_title(),
        KeySource::Both => from_title().or_else(from_branch),
    };

    found.ok_or(AppError::IssueKeyNotFound {
        searched: settings.key_source,
    })
}

pub async fn link_pull_request(ctx: &AppContext, event: &WorkflowEvent) -> AppResult<LinkOutcome> {
    if !event.is_pull_request() {
        info!(event = %event.name, "this action is meant to run on pull request events only");
        return Ok(LinkOutcome::Skipped(SkipCause::NotPullRequest));
    }

    let (target, snapshot) = event.pull_request()?;
    let settings = &ctx.config.extraction;

    if let Some(reason) = skip_reason(snapshot.head.as_str(), settings.skip_branches.as_ref()) {
        return Ok(LinkOutcome::Skipped(SkipCause::Branch(reason)));
    }

    let (key, source) = resolve_issue_key(settings, &snapshot)?;
    info!(%key, %source, "Jira issue key found");

    let details = ctx.issue_tracker.ticket_details(&key).await?;
    let fragment = render_summary(&details);

    // The event payload may be stale by now; merge into the current body.
    let latest = ctx.pull_requests.pull_request(&target).await?;
    let body = merge_description(&latest.body, &fragment);

    if body == latest.body {
        info!(number = target.number, "pull request description already up to date");
    } else {
        ctx.pull_requests.update_body(&target, &body).await?;
        info!(number = target.number, "pull request description updated");
    }

    Ok(LinkOutcome::Linked { key, source })
}
