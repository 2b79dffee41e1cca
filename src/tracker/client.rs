//! HTTP client for the Jira Cloud REST API (v3)

use super::traits::TrackerApi;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::{Credentials, Ticket};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const API_PREFIX: &str = "rest/api/3";
const ASSIGNED_TICKETS_JQL: &str =
    "assignee = currentUser() AND status != Done order by createdDate";
const SEARCH_FIELDS: &str = "summary,status,issuetype,assignee,created";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Debug, Deserialize)]
struct JiraIssue {
    key: String,
    #[serde(default)]
    fields: JiraFields,
}

#[derive(Debug, Default, Deserialize)]
struct JiraFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    status: Named,
    #[serde(default)]
    issuetype: Named,
    #[serde(default)]
    created: String,
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<Transition>,
}

#[derive(Debug, Deserialize)]
struct Transition {
    id: String,
    name: String,
}

/// Client for the Jira REST endpoints this tool needs
#[derive(Clone)]
pub struct JiraClient {
    client: Client,
    max_results: u32,
    transition_name: String,
}

impl JiraClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_results: config.max_results(),
            transition_name: config.in_progress_transition().to_string(),
        })
    }

    fn authed(&self, request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        request.basic_auth(&credentials.email, Some(&credentials.api_token))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        Ok(request.send().await?)
    }

    async fn read_body(response: Response) -> Result<(StatusCode, String), AppError> {
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Build `{base}/rest/api/3/{path}`
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{API_PREFIX}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Map a non-success status into the error taxonomy
pub fn status_error(status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::UNAUTHORIZED {
        return AppError::Credential("check your email and API token".to_string());
    }
    let message = body.trim();
    AppError::Api {
        status: status.as_u16(),
        message: if message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        } else {
            message.chars().take(200).collect()
        },
    }
}

/// Decode a search response into tickets, preserving Jira's ordering
pub fn parse_search_response(body: &str) -> Result<Vec<Ticket>, AppError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .issues
        .into_iter()
        .map(|issue| Ticket {
            key: issue.key,
            issue_type: issue.fields.issuetype.name,
            summary: issue.fields.summary,
            status: issue.fields.status.name,
            created_at: issue.fields.created,
        })
        .collect())
}

/// Find the id of the transition called `name` (case-insensitive)
pub fn find_transition_id(body: &str, name: &str) -> Result<String, AppError> {
    let response: TransitionsResponse = serde_json::from_str(body)?;
    response
        .transitions
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .map(|t| t.id)
        .ok_or_else(|| AppError::Api {
            status: StatusCode::OK.as_u16(),
            message: format!("no '{name}' transition available for this ticket"),
        })
}

#[async_trait]
impl TrackerApi for JiraClient {
    async fn check_credentials(&self, credentials: &Credentials) -> Result<(), AppError> {
        let url = endpoint(&credentials.base_url, "myself");
        let request = self.authed(self.client.get(&url), credentials);
        let (status, body) = Self::read_body(self.send(request).await?).await?;

        if status == StatusCode::OK {
            debug!("credentials accepted");
            Ok(())
        } else {
            warn!(%status, "credential check rejected");
            Err(status_error(status, &body))
        }
    }

    async fn fetch_tickets(&self, credentials: &Credentials) -> Result<Vec<Ticket>, AppError> {
        let url = endpoint(&credentials.base_url, "search");
        let request = self
            .authed(self.client.get(&url), credentials)
            .query(&[
                ("jql", ASSIGNED_TICKETS_JQL.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
                ("maxResults", self.max_results.to_string()),
            ]);
        let (status, body) = Self::read_body(self.send(request).await?).await?;

        if status != StatusCode::OK {
            return Err(status_error(status, &body));
        }
        let tickets = parse_search_response(&body)?;
        debug!(count = tickets.len(), "fetched tickets");
        Ok(tickets)
    }

    async fn mark_in_progress(
        &self,
        credentials: &Credentials,
        ticket_key: &str,
    ) -> Result<(), AppError> {
        let url = endpoint(
            &credentials.base_url,
            &format!("issue/{ticket_key}/transitions"),
        );

        let request = self.authed(self.client.get(&url), credentials);
        let (status, body) = Self::read_body(self.send(request).await?).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        let transition_id = find_transition_id(&body, &self.transition_name)?;

        let request = self
            .authed(self.client.post(&url), credentials)
            .json(&json!({ "transition": { "id": transition_id } }));
        let (status, body) = Self::read_body(self.send(request).await?).await?;

        if status == StatusCode::NO_CONTENT {
            debug!(ticket_key, "ticket transitioned");
            Ok(())
        } else {
            Err(status_error(status, &body))
        }
    }
}
