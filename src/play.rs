//! Google Play Developer API client.
//!
//! Thin blocking wrapper around the androidpublisher v3 endpoints this tool
//! needs: opening an edit transaction and reading one track's release state.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::release::TrackState;

const API_BASE: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Play API error types.
#[derive(Debug, Error)]
pub enum PlayError {
    #[error("credentials are invalid or expired: {0}")]
    CredentialsInvalid(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Play API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Result type for Play API operations.
pub type PlayResult<T> = Result<T, PlayError>;

/// Access credentials for the androidpublisher scope.
///
/// Loaded from a JSON file carrying a pre-issued OAuth2 access token
/// (`{"access_token": "..."}`), as exported by CI before invoking the tool.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    access_token: String,
}

impl Credentials {
    /// Load credentials from a JSON file.
    ///
    /// An unreadable file, malformed JSON, or an empty token are all
    /// credential failures, reported distinctly from schedule validation.
    pub fn from_file(path: &Path) -> PlayResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PlayError::CredentialsInvalid(format!("cannot read {}: {e}", path.display()))
        })?;

        let credentials: Self = serde_json::from_str(&raw).map_err(|e| {
            PlayError::CredentialsInvalid(format!("malformed credentials file: {e}"))
        })?;

        if credentials.access_token.is_empty() {
            return Err(PlayError::CredentialsInvalid("access_token is empty".to_string()));
        }

        Ok(credentials)
    }
}

/// Response of `edits.insert`; only the edit id is used.
#[derive(Debug, Deserialize)]
struct EditResponse {
    id: String,
}

/// Blocking client for the Play Developer API.
pub struct PlayClient {
    client: reqwest::blocking::Client,
    credentials: Credentials,
    base_url: String,
}

impl PlayClient {
    /// Create a client with the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            credentials,
            base_url: API_BASE.to_string(),
        }
    }

    /// Open an edit transaction and return its id.
    ///
    /// Track reads are scoped to an edit session, so every query starts
    /// here. The edit is never committed; it expires server-side.
    pub fn insert_edit(&self, package_name: &str) -> PlayResult<String> {
        let url = format!("{}/applications/{package_name}/edits", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.credentials.access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()?;

        let edit: EditResponse = Self::check(response)?.json()?;
        Ok(edit.id)
    }

    /// Fetch the release state of one track within an edit session.
    pub fn get_track(
        &self,
        edit_id: &str,
        package_name: &str,
        track: &str,
    ) -> PlayResult<TrackState> {
        let url = format!(
            "{}/applications/{package_name}/edits/{edit_id}/tracks/{track}",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.credentials.access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()?;

        Ok(Self::check(response)?.json()?)
    }

    /// Map non-success statuses to errors, keeping auth failures distinct.
    fn check(response: reqwest::blocking::Response) -> PlayResult<reqwest::blocking::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PlayError::CredentialsInvalid(format!("HTTP {}: {body}", status.as_u16())));
        }

        Err(PlayError::Api { status: status.as_u16(), body })
    }
}
