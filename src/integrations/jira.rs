//! JIRA REST API (v2) integration
//!
//! Every request carries the configured token verbatim in the `Authorization`
//! header. Only issue creation is reachable from the HTTP surface; transitions,
//! comments, attachments and JQL search complete the client.

use async_trait::async_trait;
use reqwest::{
    header::{ACCEPT, AUTHORIZATION},
    multipart, Client,
};
use serde::{Deserialize, Serialize};

use super::{check_status, IntegrationError, IssueTracker};
use crate::config::JiraConfig;
use crate::domain::{NewIssue, ProjectMapping, Transition, DEFAULT_PRIORITY_ID};

const SERVICE: &str = "JIRA";

#[derive(Debug, Serialize)]
struct NameRef<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct IdRef<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

/// `fields` object of an issue creation request
#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueFields<'a> {
    assignee: NameRef<'a>,
    customfield_10110: Option<&'a str>,
    description: &'a str,
    issuetype: IdRef<'a>,
    labels: &'a [String],
    priority: IdRef<'a>,
    project: IdRef<'a>,
    reporter: NameRef<'a>,
    summary: &'a str,
    parent: Option<KeyRef<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueRequest<'a> {
    fields: CreateIssueFields<'a>,
    update: serde_json::Map<String, serde_json::Value>,
}

impl<'a> CreateIssueRequest<'a> {
    pub(crate) fn new(issue: &'a NewIssue, projects: &'a ProjectMapping) -> Self {
        Self {
            fields: CreateIssueFields {
                assignee: NameRef {
                    name: &issue.assignee,
                },
                customfield_10110: issue.custom_field_value(),
                description: &issue.description,
                issuetype: IdRef {
                    id: issue.issue_type().id(),
                },
                labels: &issue.labels,
                priority: IdRef {
                    id: DEFAULT_PRIORITY_ID,
                },
                project: IdRef {
                    id: projects.resolve(&issue.project_code),
                },
                reporter: NameRef {
                    name: &issue.reporter,
                },
                summary: &issue.summary,
                parent: issue.parent.as_deref().map(|key| KeyRef { key }),
            },
            update: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateIssueResponse {
    key: String,
}

#[derive(Debug, Serialize)]
struct TransitionRequest<'a> {
    transition: IdRef<'a>,
}

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// Comment created on an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
}

/// Attachment record returned after an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub size: u64,
}

/// Issue returned by JQL search; `fields` is left untyped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    #[serde(default)]
    pub fields: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    issues: Vec<Issue>,
    total: u64,
}

/// JIRA client
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: Client,
    base_url: String,
    token: String,
    projects: ProjectMapping,
    page_size: u32,
}

impl JiraClient {
    /// Create a new JIRA client with the default project table
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            projects: ProjectMapping::default(),
            page_size: 50,
        }
    }

    pub fn from_config(config: &JiraConfig) -> Self {
        Self::new(&config.base_url, config.token.clone().unwrap_or_default())
            .with_projects(config.projects.clone())
            .with_page_size(config.search_page_size)
    }

    pub fn with_projects(mut self, projects: ProjectMapping) -> Self {
        self.projects = projects;
        self
    }

    /// Set `maxResults` for search pages
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn issue_url(&self) -> String {
        format!("{}/rest/api/2/issue", self.base_url)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.token)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, IntegrationError> {
        let response = request
            .send()
            .await
            .map_err(|e| IntegrationError::unreachable(SERVICE, e))?;
        check_status(SERVICE, response).await
    }

    async fn parse_body<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IntegrationError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| IntegrationError::unreachable(SERVICE, e))?;

        serde_json::from_str(&text).map_err(|e| IntegrationError::UpstreamError {
            service: SERVICE,
            status,
            message: format!("unexpected response ({}): {}", e, text),
        })
    }

    /// Create an issue, optionally moving it straight to done, and return its key
    ///
    /// A failed done transition is logged and does not fail the call; the
    /// issue already exists and its key is still returned.
    pub async fn add_issue(&self, issue: &NewIssue) -> Result<String, IntegrationError> {
        let payload = CreateIssueRequest::new(issue, &self.projects);

        let response = self
            .send(
                self.request(reqwest::Method::POST, &self.issue_url())
                    .json(&payload),
            )
            .await?;
        let created: CreateIssueResponse = Self::parse_body(response).await?;
        tracing::info!("Created JIRA issue {}", created.key);

        if issue.done {
            if let Err(e) = self.move_to_done(&created.key).await {
                tracing::warn!("Created {} but could not move it to done: {}", created.key, e);
            }
        }

        Ok(created.key)
    }

    /// Apply a workflow transition to an issue
    pub async fn transition(&self, key: &str, transition: Transition) -> Result<(), IntegrationError> {
        let url = format!("{}/{}/transitions", self.issue_url(), key);
        let body = TransitionRequest {
            transition: IdRef {
                id: transition.id(),
            },
        };

        self.send(self.request(reqwest::Method::POST, &url).json(&body))
            .await?;
        tracing::info!("Transitioned {} with transition {}", key, transition.id());
        Ok(())
    }

    pub async fn move_to_done(&self, key: &str) -> Result<(), IntegrationError> {
        self.transition(key, Transition::Done).await
    }

    pub async fn move_to_todo(&self, key: &str) -> Result<(), IntegrationError> {
        self.transition(key, Transition::ToDo).await
    }

    /// Add a comment to an existing issue
    pub async fn add_comment(&self, key: &str, contents: &str) -> Result<Comment, IntegrationError> {
        let url = format!("{}/{}/comment", self.issue_url(), key);
        let response = self
            .send(
                self.request(reqwest::Method::POST, &url)
                    .json(&CommentRequest { body: contents }),
            )
            .await?;
        Self::parse_body(response).await
    }

    /// Upload a file as an attachment to an existing issue
    pub async fn add_attachment(
        &self,
        key: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<Vec<Attachment>, IntegrationError> {
        let url = format!("{}/{}/attachments", self.issue_url(), key);
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| IntegrationError::UpstreamError {
                service: SERVICE,
                status: 0,
                message: format!("invalid attachment type {}: {}", mime, e),
            })?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .send(
                self.request(reqwest::Method::POST, &url)
                    .header("X-Atlassian-Token", "no-check")
                    .multipart(form),
            )
            .await?;
        Self::parse_body(response).await
    }

    /// Run a JQL query and collect every page of results, in server order
    pub async fn search(&self, jql: &str) -> Result<Vec<Issue>, IntegrationError> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        let mut issues = Vec::new();
        let mut start_at: u64 = 0;

        loop {
            let request = self.request(reqwest::Method::GET, &url).query(&[
                ("jql", jql.to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", self.page_size.to_string()),
            ]);
            let page: SearchPage = Self::parse_body(self.send(request).await?).await?;

            let fetched = page.issues.len() as u64;
            issues.extend(page.issues);
            start_at += fetched;

            tracing::debug!("JQL search fetched {}/{} issues", start_at, page.total);
            if fetched == 0 || start_at >= page.total {
                break;
            }
        }

        Ok(issues)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<String, IntegrationError> {
        self.add_issue(issue).await
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }
}
