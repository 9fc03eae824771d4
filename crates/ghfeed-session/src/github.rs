//! GitHub public events API client

use crate::fetch::Fetcher;
use ghfeed_core::{Config, FetchError};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the first page of `/users/{user}/events`
#[derive(Debug, Clone)]
pub struct GithubFetcher {
    client: Client,
    api_base: Url,
}

impl GithubFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| FetchError::Transport(format!("invalid api base: {}", e)))?;
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport)?;
        Ok(Self { client, api_base })
    }

    pub fn events_url(&self, user: &str) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Transport("api base cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(["users", user, "events"]);
        Ok(url)
    }
}

impl Fetcher for GithubFetcher {
    fn fetch(&self, key: &str) -> Result<Vec<Value>, FetchError> {
        let url = self.events_url(key)?;
        tracing::debug!(%url, "requesting events");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "upstream rejected request");
            return Err(FetchError::from_status(status.as_u16()));
        }

        let body: Value = response.json().map_err(transport)?;
        into_events(body)
    }
}

fn transport(err: reqwest::Error) -> FetchError {
    FetchError::Transport(err.to_string())
}

fn into_events(body: Value) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(events) => Ok(events),
        other => Err(FetchError::Transport(format!(
            "expected a JSON array of events, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
