//! Managed block inside a pull request description.
//!
//! The block is bounded by two hidden HTML comments and preceded by a warning
//! comment. Everything outside the block belongs to the PR author and is kept
//! in place.

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

use crate::domain::ticket::TicketDetails;

pub const HIDDEN_MARKER_START: &str = "<!--jira-description-action-hidden-marker-start-->";
pub const HIDDEN_MARKER_END: &str = "<!--jira-description-action-hidden-marker-end-->";
pub const WARNING_MESSAGE_ABOUT_HIDDEN_MARKERS: &str =
    "<!--do not remove this marker, its needed to replace info when ticket title is updated -->";

lazy_static! {
    // Greedy: spans from the first start marker to the last end marker.
    static ref MANAGED_BLOCK: Regex = Regex::new(&format!(
        r"(?is)(?:{warning}\r?\n)?{start}.*{end}(?:\r?\n)?",
        warning = regex::escape(WARNING_MESSAGE_ABOUT_HIDDEN_MARKERS),
        start = regex::escape(HIDDEN_MARKER_START),
        end = regex::escape(HIDDEN_MARKER_END),
    ))
    .expect("managed block pattern");
}

/// Writes `fragment` into the managed block of `old_body`.
///
/// An existing block is replaced where it stands; without one, the block is
/// prepended. Running this again with the same fragment is a no-op.
pub fn merge_description(old_body: &str, fragment: &str) -> String {
    let block = format!(
        "{WARNING_MESSAGE_ABOUT_HIDDEN_MARKERS}\n{HIDDEN_MARKER_START}\n{fragment}\n{HIDDEN_MARKER_END}\n"
    );

    if MANAGED_BLOCK.is_match(old_body) {
        MANAGED_BLOCK
            .replace(old_body, NoExpand(&block))
            .into_owned()
    } else {
        format!("{block}{old_body}")
    }
}

/// Renders the ticket summary table. The summary text is inserted as-is.
pub fn render_summary(details: &TicketDetails) -> String {
    let display_key = details.key.as_str().to_uppercase();
    format!(
        "<table><tbody><tr><td>\n  \
         <a href=\"{url}\" title=\"{key}\" target=\"_blank\"><img alt=\"{type_name}\" src=\"{icon}\" /> {key}</a>\n  \
         {summary}\n\
         </td></tr></tbody></table><br />",
        url = details.url,
        key = display_key,
        type_name = details.issue_type.name,
        icon = details.issue_type.icon,
        summary = details.summary,
    )
}
