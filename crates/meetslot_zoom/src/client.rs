// --- File: crates/meetslot_zoom/src/client.rs ---
//! Zoom REST client with a cached server-to-server OAuth token.
//!
//! The token lives behind an async mutex: concurrent callers that find it
//! missing or expired serialize on the refresh, and any 401 from the meetings
//! API drops it so the next call authenticates again.

use crate::error::ZoomError;
use crate::models::{ApiErrorBody, CreateMeetingPayload, MeetingResponse, TokenResponse};
use meetslot_common::models::ConferenceRef;
use meetslot_common::services::{BoxFuture, ConferenceService, MeetingRequest, ServiceError};
use meetslot_config::ZoomConfig;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Tokens are refreshed this long before Zoom would expire them.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

pub struct ZoomClient {
    http: Client,
    config: ZoomConfig,
    token: Mutex<Option<CachedToken>>,
}

impl ZoomClient {
    /// Builds a client; fails if the credentials are incomplete.
    pub fn new(config: ZoomConfig) -> Result<Self, ZoomError> {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: ZoomConfig, http: Client) -> Result<Self, ZoomError> {
        for (name, value) in [
            ("account_id", &config.account_id),
            ("client_id", &config.client_id),
            ("client_secret", &config.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ZoomError::ConfigError(format!("zoom.{} is empty", name)));
            }
        }
        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    /// Returns the cached token, fetching a new one when needed.
    async fn access_token(&self) -> Result<String, ZoomError> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        debug!("Requesting Zoom access token");
        let response = self
            .http
            .post(&self.config.oauth_url)
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.config.account_id.as_str()),
            ])
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Zoom token request failed with {}: {}", status, body);
            return Err(ZoomError::AuthError(format!(
                "token request returned {}",
                status
            )));
        }

        let token: TokenResponse = serde_json::from_str(&response.text().await?)?;
        let cached = CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        };
        let value = cached.value.clone();
        *slot = Some(cached);
        info!("Obtained Zoom access token valid for {}s", token.expires_in);
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    /// Maps a non-success response to an error, dropping the token on 401.
    async fn error_from(&self, response: Response) -> ZoomError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(body);

        if status == StatusCode::UNAUTHORIZED {
            warn!("Zoom rejected the access token, dropping it");
            self.invalidate_token().await;
            return ZoomError::AuthError(message);
        }
        ZoomError::ApiError {
            status: status.as_u16(),
            message,
        }
    }

    /// Creates a scheduled meeting for the given request.
    pub async fn create_meeting(&self, request: &MeetingRequest) -> Result<ConferenceRef, ZoomError> {
        let token = self.access_token().await?;
        let url = format!("{}/users/me/meetings", self.config.api_base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&CreateMeetingPayload::from(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.error_from(response).await);
        }

        let meeting: MeetingResponse = serde_json::from_str(&response.text().await?)?;
        info!("Created Zoom meeting {}", meeting.id);
        Ok(meeting.into())
    }

    /// Deletes a meeting. A meeting that no longer exists counts as deleted.
    pub async fn delete_meeting(&self, meeting_id: &str) -> Result<(), ZoomError> {
        let token = self.access_token().await?;
        let url = format!("{}/meetings/{}", self.config.api_base_url, meeting_id);

        let response = self.http.delete(&url).bearer_auth(&token).send().await?;

        match response.status() {
            status if status.is_success() => {
                info!("Deleted Zoom meeting {}", meeting_id);
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                debug!("Zoom meeting {} already gone", meeting_id);
                Ok(())
            }
            _ => Err(self.error_from(response).await),
        }
    }
}

impl ConferenceService for ZoomClient {
    fn create_room(&self, request: MeetingRequest) -> BoxFuture<'_, ConferenceRef, ServiceError> {
        Box::pin(async move { Ok(self.create_meeting(&request).await?) })
    }

    fn release_room(&self, room_id: &str) -> BoxFuture<'_, (), ServiceError> {
        let room_id = room_id.to_string();
        Box::pin(async move { Ok(self.delete_meeting(&room_id).await?) })
    }
}
