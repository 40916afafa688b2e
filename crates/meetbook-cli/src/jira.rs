//! Jira ticket lookup.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use slot_engine::error::Result as EngineResult;
use slot_engine::{SchedulingError, TicketLookup};
use tracing::debug;

use crate::config::JiraConfig;

#[derive(Debug, Deserialize)]
struct Issue {
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: String,
}

/// Jira Cloud REST client authenticated with an email and API token.
pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

impl TicketLookup for JiraClient {
    fn summary(&self, key: &str) -> EngineResult<Option<String>> {
        let url = format!("{}/rest/api/3/issue/{}", self.base_url, key);
        debug!(%url, "fetching ticket");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .query(&[("fields", "summary")])
            .send()
            .map_err(|e| SchedulingError::UpstreamUnavailable(format!("Jira request failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let issue: Issue = response.json().map_err(|e| {
                    SchedulingError::UpstreamUnavailable(format!("Bad Jira response for {key}: {e}"))
                })?;
                Ok(Some(issue.fields.summary))
            }
            status => Err(SchedulingError::UpstreamUnavailable(format!(
                "Failed to fetch Jira issue {key}. Status code: {status}"
            ))),
        }
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }
}

/// Stand-in used when no `[jira]` section is configured.
pub struct NoTracker;

impl TicketLookup for NoTracker {
    fn summary(&self, _key: &str) -> EngineResult<Option<String>> {
        Err(SchedulingError::UpstreamUnavailable(
            "no [jira] section configured".to_string(),
        ))
    }

    fn browse_url(&self, key: &str) -> String {
        key.to_string()
    }
}
