use std::fmt;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::{AppError, AppResult};

lazy_static! {
    static ref DEFAULT_KEY_PATTERN: Regex =
        Regex::new(r"([a-zA-Z0-9]{1,10}-[0-9]+)").expect("default issue key pattern");
}

/// Upper-cased Jira issue key, e.g. `ES-43`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueKey(String);

impl IssueKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How issue keys are pulled out of a title or branch name.
#[derive(Debug, Clone)]
pub enum ExtractionRule {
    Default,
    Custom {
        pattern: Regex,
        project_key: Option<String>,
    },
}

impl ExtractionRule {
    pub fn extract(&self, text: &str) -> Option<IssueKey> {
        match self {
            ExtractionRule::Default => extract_default(text),
            ExtractionRule::Custom {
                pattern,
                project_key,
            } => extract_custom(text, pattern, project_key.as_deref()),
        }
    }
}

/// Compiles a `custom-issue-number-regexp` input. Matching is case-insensitive.
pub fn compile_custom_pattern(pattern: &str) -> AppResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| {
            AppError::Configuration(format!(
                "invalid custom-issue-number-regexp '{pattern}': {err}"
            ))
        })
}

pub fn extract_default(text: &str) -> Option<IssueKey> {
    find_key(text, &DEFAULT_KEY_PATTERN).map(IssueKey::new)
}

pub fn extract_custom(text: &str, pattern: &Regex, project_key: Option<&str>) -> Option<IssueKey> {
    let matched = find_key(text, pattern)?;
    let key = match project_key.filter(|key| !key.is_empty()) {
        Some(project) => IssueKey::new(&format!("{project}-{matched}")),
        None => IssueKey::new(matched),
    };
    Some(key)
}

// The value is the last group of the match (group 0 when the pattern has no
// groups). A last group that did not participate, or matched nothing, counts
// as no key.
fn find_key<'t>(text: &'t str, pattern: &Regex) -> Option<&'t str> {
    debug!(pattern = pattern.as_str(), text, "looking for issue key");
    let captures = pattern.captures(text)?;
    captures
        .get(captures.len() - 1)
        .map(|m| m.as_str())
        .filter(|value| !value.is_empty())
}
