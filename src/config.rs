use std::env;
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::domain::branch::compile_ignore_pattern;
use crate::domain::issue_key::{ExtractionRule, compile_custom_pattern};
use crate::error::{AppError, AppResult};

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Which pull request field is searched for an issue key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySource {
    Branch,
    #[default]
    PrTitle,
    /// Title first, branch as fallback.
    Both,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Branch => "branch",
            KeySource::PrTitle => "pr-title",
            KeySource::Both => "both",
        }
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeySource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "branch" => Ok(KeySource::Branch),
            "pr-title" => Ok(KeySource::PrTitle),
            "both" => Ok(KeySource::Both),
            other => Err(AppError::Configuration(format!(
                "unsupported 'use' value '{other}', expected branch, pr-title or both"
            ))),
        }
    }
}

/// Settings needed to decide whether and how a key is extracted. Needs no
/// credentials, so `inspect` can load it on its own.
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub key_source: KeySource,
    pub rule: ExtractionRule,
    pub skip_branches: Option<Regex>,
}

impl ExtractionSettings {
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let inputs = Inputs(&lookup);

        let key_source = match inputs.optional("use") {
            Some(value) => value.parse()?,
            None => KeySource::default(),
        };

        let rule = match inputs.optional("custom-issue-number-regexp") {
            Some(pattern) => ExtractionRule::Custom {
                pattern: compile_custom_pattern(&pattern)?,
                project_key: inputs.optional("jira-project-key"),
            },
            None => ExtractionRule::Default,
        };

        let skip_branches = match inputs.optional("skip-branches") {
            Some(pattern) => compile_ignore_pattern(&pattern)?,
            None => None,
        };

        Ok(Self {
            key_source,
            rule,
            skip_branches,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub extraction: ExtractionSettings,
    pub jira_base_url: String,
    pub jira_token: Option<String>,
    pub jira_user: Option<String>,
    pub jira_password: Option<String>,
    pub github_token: String,
    pub github_api_url: String,
    pub fail_when_issue_not_found: bool,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the run configuration from action inputs (`INPUT_*`) and the
    /// runner variables. Patterns are compiled here, before any network call.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let extraction = ExtractionSettings::from_lookup(&lookup)?;
        let inputs = Inputs(&lookup);

        let jira_base_url = inputs
            .required("jira-base-url")?
            .trim_end_matches('/')
            .to_string();

        let github_api_url = lookup("GITHUB_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string());

        Ok(Self {
            extraction,
            jira_base_url,
            jira_token: inputs.optional("jira-token"),
            jira_user: inputs.optional("jira-user"),
            jira_password: inputs.optional("jira-password"),
            github_token: inputs.required("github-token")?,
            github_api_url,
            fail_when_issue_not_found: inputs
                .optional("fail-when-jira-issue-not-found")
                .is_some_and(|value| value == "true"),
        })
    }
}

struct Inputs<'a, F>(&'a F);

impl<F> Inputs<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        let variable = input_variable(name);
        (self.0)(variable.as_str())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &str) -> AppResult<String> {
        self.optional(name).ok_or_else(|| {
            AppError::Configuration(format!("input required and not supplied: {name}"))
        })
    }
}

/// Environment variable the runner uses for an action input.
pub fn input_variable(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}
