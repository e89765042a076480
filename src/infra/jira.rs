use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain::issue_key::IssueKey;
use crate::domain::ticket::{IssueType, ProjectRef, TicketDetails};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const ISSUE_FIELDS: &str = "project,summary,issuetype";

#[derive(Debug, Clone)]
pub enum JiraCredentials {
    UserPassword { user: String, password: String },
    /// Pre-joined `user:token` pair, encoded as given.
    Token(String),
}

impl JiraCredentials {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        match (&config.jira_user, &config.jira_password, &config.jira_token) {
            (Some(user), Some(password), _) => Ok(JiraCredentials::UserPassword {
                user: user.clone(),
                password: password.clone(),
            }),
            (_, _, Some(token)) => Ok(JiraCredentials::Token(token.clone())),
            _ => Err(AppError::Configuration(
                "Jira credentials not configured: set jira-user and jira-password, or jira-token"
                    .to_string(),
            )),
        }
    }

    fn auth_header(&self) -> String {
        let encoded = match self {
            JiraCredentials::UserPassword { user, password } => {
                BASE64_STANDARD.encode(format!("{user}:{password}"))
            }
            JiraCredentials::Token(token) => BASE64_STANDARD.encode(token),
        };
        format!("Basic {encoded}")
    }
}

pub struct JiraClient {
    http: Client,
    base_url: String,
    credentials: JiraCredentials,
}

impl JiraClient {
    pub fn new(base_url: String, credentials: JiraCredentials) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::IssueTracker(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn issue_endpoint(&self, key: &IssueKey) -> String {
        format!("{}/rest/api/3/issue/{}", self.base_url, key)
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn ticket_details(&self, key: &IssueKey) -> AppResult<TicketDetails> {
        info!(%key, "fetching issue details from Jira");

        let response = self
            .http
            .get(self.issue_endpoint(key))
            .query(&[("fields", ISSUE_FIELDS)])
            .header(AUTHORIZATION, self.credentials.auth_header())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            warn!(%key, %status, "error fetching details from Jira");
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {}",
                pretty_payload(&body)
            )));
        }

        let payload: JiraIssueResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;
        debug!(%key, summary = %payload.fields.summary, "received Jira issue");

        let JiraIssueFields {
            summary,
            issuetype,
            project,
        } = payload.fields;

        Ok(TicketDetails {
            key: key.clone(),
            summary,
            url: self.browse_url(key.as_str()),
            issue_type: IssueType {
                name: issuetype.name,
                icon: issuetype.icon_url,
            },
            project: ProjectRef {
                url: self.browse_url(&project.key),
                name: project.name,
                key: project.key,
            },
        })
    }
}

// Jira error bodies are JSON; indent them so they read well in the job log.
fn pretty_payload(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}

#[derive(Deserialize)]
struct JiraIssueResponse {
    fields: JiraIssueFields,
}

#[derive(Deserialize)]
struct JiraIssueFields {
    summary: String,
    issuetype: JiraIssueType,
    project: JiraProject,
}

#[derive(Deserialize)]
struct JiraIssueType {
    name: String,
    #[serde(rename = "iconUrl")]
    icon_url: String,
}

#[derive(Deserialize)]
struct JiraProject {
    name: String,
    key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn issue_json() -> serde_json::Value {
        json!({
            "id": "10001",
            "key": "ES-43",
            "self": "https://company.atlassian.net/rest/api/3/issue/10001",
            "fields": {
                "summary": "Fix login protocol",
                "issuetype": {
                    "id": "10004",
                    "name": "Bug",
                    "iconUrl": "https://company.atlassian.net/images/bug.svg",
                    "subtask": false
                },
                "project": {
                    "self": "https://company.atlassian.net/rest/api/3/project/10000",
                    "key": "ES",
                    "name": "Engineering Services"
                }
            }
        })
    }

    fn client(server: &MockServer, credentials: JiraCredentials) -> JiraClient {
        JiraClient::new(format!("{}/", server.uri()), credentials).unwrap()
    }

    #[tokio::test]
    async fn fetches_ticket_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/ES-43"))
            .and(query_param("fields", ISSUE_FIELDS))
            .and(header("authorization", "Basic amFuZTpzZWNyZXQ="))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_json()))
            .expect(1)
            .mount(&server)
            .await;

        let jira = client(
            &server,
            JiraCredentials::UserPassword {
                user: "jane".to_string(),
                password: "secret".to_string(),
            },
        );
        let details = jira.ticket_details(&IssueKey::new("ES-43")).await.unwrap();

        assert_eq!(details.key.as_str(), "ES-43");
        assert_eq!(details.summary, "Fix login protocol");
        assert_eq!(details.url, format!("{}/browse/ES-43", server.uri()));
        assert_eq!(details.issue_type.name, "Bug");
        assert_eq!(
            details.issue_type.icon,
            "https://company.atlassian.net/images/bug.svg"
        );
        assert_eq!(details.project.key, "ES");
        assert_eq!(details.project.name, "Engineering Services");
        assert_eq!(details.project.url, format!("{}/browse/ES", server.uri()));
    }

    #[tokio::test]
    async fn token_is_encoded_as_given() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Basic amFuZTp0b2tlbg=="))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_json()))
            .expect(1)
            .mount(&server)
            .await;

        let jira = client(&server, JiraCredentials::Token("jane:token".to_string()));
        jira.ticket_details(&IssueKey::new("ES-43")).await.unwrap();
    }

    #[tokio::test]
    async fn surfaces_remote_error_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/ES-404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errorMessages": ["Issue does not exist or you do not have permission to see it."],
                "errors": {}
            })))
            .mount(&server)
            .await;

        let jira = client(&server, JiraCredentials::Token("jane:token".to_string()));
        let err = jira
            .ticket_details(&IssueKey::new("ES-404"))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, AppError::IssueTracker(_)));
        assert!(message.contains("404"), "{message}");
        assert!(message.contains("Issue does not exist"), "{message}");
    }

    #[test]
    fn pretty_payload_falls_back_to_raw_text() {
        assert_eq!(pretty_payload("gateway timeout"), "gateway timeout");
        assert_eq!(pretty_payload(r#"{"a":1}"#), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn prefers_user_and_password_over_token() {
        let mut config = crate::config::AppConfig::from_lookup(|key: &str| match key {
            "INPUT_JIRA-BASE-URL" => Some("https://jira.example.com".to_string()),
            "INPUT_GITHUB-TOKEN" => Some("gh".to_string()),
            "INPUT_JIRA-TOKEN" => Some("jane:token".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(matches!(
            JiraCredentials::from_config(&config).unwrap(),
            JiraCredentials::Token(_)
        ));

        config.jira_user = Some("jane".to_string());
        config.jira_password = Some("secret".to_string());
        assert!(matches!(
            JiraCredentials::from_config(&config).unwrap(),
            JiraCredentials::UserPassword { .. }
        ));

        config.jira_token = None;
        config.jira_user = None;
        assert!(JiraCredentials::from_config(&config).is_err());
    }
}
