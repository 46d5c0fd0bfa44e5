// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use projsync_app::{ApiError, ProjectId, ProjectPayload, ProjectRecord, ProjectService};
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8090/api/projects";

/// Blocking HTTP client for the `/api/projects` collection.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Self::with_headers(base_url, timeout, &BTreeMap::new())
    }

    /// `headers` are attached to every request; this is where credentials
    /// are injected when the server wants them.
    pub fn with_headers(
        base_url: &str,
        timeout: Duration,
        headers: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "api.base_url {base_url:?} must use http or https, got {}",
                parsed.scheme()
            );
        }
        if timeout.is_zero() {
            bail!("api.timeout must be positive");
        }

        let mut default_headers = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("invalid header name {name:?} in api.headers"))?;
            let header_value = HeaderValue::from_str(value)
                .with_context(|| format!("invalid value for header {name:?} in api.headers"))?;
            default_headers.insert(header_name, header_value);
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn item_url(&self, id: ProjectId) -> String {
        format!("{}/{}", self.base_url, id.get())
    }

    /// Runs one request and returns the success body, or `None` when the
    /// server sent nothing (204 and friends).
    fn execute(
        &self,
        method: Method,
        url: &str,
        payload: Option<&ProjectPayload>,
    ) -> Result<Option<String>, ApiError> {
        let mut request = self.http.request(method.clone(), url);
        if let Some(payload) = payload {
            let body = serde_json::to_string(payload)
                .map_err(|error| ApiError::Encode(error.to_string()))?;
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        tracing::debug!(%method, url, "sending request");
        let response = request.send().map_err(|error| {
            tracing::warn!(%method, url, %error, "request did not complete");
            connection_error(&self.base_url, error)
        })?;

        let status = response.status();
        if !status.is_success() {
            // The server answered; a broken error body must not hide the status.
            let body = response.text().unwrap_or_else(|error| {
                tracing::warn!(%method, url, %error, "reading error body failed");
                String::new()
            });
            tracing::warn!(%method, url, status = status.as_u16(), "request rejected");
            return Err(clean_error_response(status, &body));
        }

        let body = response.text().map_err(|error| {
            tracing::warn!(%method, url, %error, "reading response body failed");
            connection_error(&self.base_url, error)
        })?;

        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }
}

impl ProjectService for Client {
    fn list(&mut self) -> Result<Vec<ProjectRecord>, ApiError> {
        let Some(body) = self.execute(Method::GET, &self.base_url, None)? else {
            return Ok(Vec::new());
        };
        let records: Vec<ProjectRecord> = decode(&body)?;
        tracing::debug!(count = records.len(), "fetched projects");
        Ok(records)
    }

    fn create(&mut self, payload: &ProjectPayload) -> Result<Option<ProjectRecord>, ApiError> {
        self.execute(Method::POST, &self.base_url, Some(payload))?
            .map(|body| decode(&body))
            .transpose()
    }

    fn update(
        &mut self,
        id: ProjectId,
        payload: &ProjectPayload,
    ) -> Result<Option<ProjectRecord>, ApiError> {
        self.execute(Method::PATCH, &self.item_url(id), Some(payload))?
            .map(|body| decode(&body))
            .transpose()
    }

    fn remove(&mut self, id: ProjectId) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &self.item_url(id), None)?;
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|error| ApiError::Decode(error.to_string()))
}

fn connection_error(base_url: &str, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        return ApiError::Transport(format!("timed out waiting for {base_url}"));
    }
    ApiError::Transport(format!("cannot reach {base_url} ({error})"))
}

/// Picks the most useful message out of an error body: the `error` field,
/// then `message`, then the JSON itself, and for non-JSON bodies the raw text.
fn clean_error_response(status: StatusCode, body: &str) -> ApiError {
    let message = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["error", "message"]
            .iter()
            .find_map(|key| value.get(*key).and_then(non_empty_text))
            .unwrap_or_else(|| value.to_string()),
        Err(_) => body.trim().to_owned(),
    };

    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    } else {
        message
    };

    ApiError::Http {
        status: status.as_u16(),
        message,
    }
}

fn non_empty_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) if text.is_empty() => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response};
    use projsync_app::ApiError;
    use reqwest::StatusCode;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn http_error(status: u16, message: &str) -> ApiError {
        ApiError::Http {
            status,
            message: message.to_owned(),
        }
    }

    #[test]
    fn error_field_wins_over_message() {
        let error = clean_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"Unexpected error","message":"NPE","status":500}"#,
        );
        assert_eq!(error, http_error(500, "Unexpected error"));
    }

    #[test]
    fn message_field_is_used_when_error_is_missing() {
        let error = clean_error_response(StatusCode::CONFLICT, r#"{"message":"duplicate"}"#);
        assert_eq!(error, http_error(409, "duplicate"));
    }

    #[test]
    fn json_without_known_fields_is_kept_verbatim() {
        let error = clean_error_response(StatusCode::BAD_REQUEST, r#"{"details":["name"]}"#);
        assert_eq!(error, http_error(400, r#"{"details":["name"]}"#));
    }

    #[test]
    fn non_json_body_falls_back_to_raw_text() {
        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(error, http_error(502, "upstream down"));
    }

    #[test]
    fn empty_body_uses_the_status_reason() {
        let error = clean_error_response(StatusCode::NOT_FOUND, "");
        assert_eq!(error, http_error(404, "Not Found"));
    }

    #[test]
    fn new_rejects_empty_and_non_http_urls() {
        assert!(Client::new("", Duration::from_secs(1)).is_err());
        assert!(Client::new("ftp://example.com/api/projects", Duration::from_secs(1)).is_err());
        assert!(Client::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn new_trims_trailing_slashes() -> anyhow::Result<()> {
        let client = Client::new("http://localhost:8090/api/projects///", Duration::from_secs(1))?;
        assert_eq!(client.base_url(), "http://localhost:8090/api/projects");
        Ok(())
    }

    #[test]
    fn new_rejects_zero_timeout() {
        let error = Client::new("http://localhost:8090/api/projects", Duration::ZERO)
            .expect_err("zero timeout should fail");
        assert!(error.to_string().contains("timeout"));
    }

    #[test]
    fn invalid_header_names_are_reported() {
        let headers = BTreeMap::from([("bad header".to_owned(), "x".to_owned())]);
        let error = Client::with_headers(
            "http://localhost:8090/api/projects",
            Duration::from_secs(1),
            &headers,
        )
        .expect_err("header with space should fail");
        assert!(error.to_string().contains("bad header"));
    }
}
