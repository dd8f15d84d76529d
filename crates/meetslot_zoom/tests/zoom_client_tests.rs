// Zoom client against a local mock of the Zoom API.

use chrono::{TimeZone, Utc};
use meetslot_common::services::{ConferenceService, MeetingRequest, RecordingMode, ServiceError};
use meetslot_config::ZoomConfig;
use meetslot_zoom::{ZoomClient, ZoomError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// "client:secret"
const BASIC_AUTH: &str = "Basic Y2xpZW50OnNlY3JldA==";

fn config(server: &MockServer) -> ZoomConfig {
    ZoomConfig {
        account_id: "acct-1".to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        api_base_url: format!("{}/v2", server.uri()),
        oauth_url: format!("{}/oauth/token", server.uri()),
    }
}

fn meeting_request(recording: RecordingMode) -> MeetingRequest {
    MeetingRequest {
        topic: "Meeting with visitor@example.com".to_string(),
        start_time: Utc.with_ymd_and_hms(2025, 6, 2, 16, 0, 0).unwrap(),
        duration_minutes: 30,
        recording,
        time_zone: "America/Denver".to_string(),
    }
}

async fn mount_token(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(query_param("grant_type", "account_credentials"))
        .and(query_param("account_id", "acct-1"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "bearer",
            "expires_in": 3599,
            "scope": "meeting:write:admin"
        })))
        .expect(times)
        .mount(server)
        .await;
}

fn meeting_body(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "join_url": format!("https://zoom.us/j/{}", id),
        "start_url": format!("https://zoom.us/s/{}", id),
        "password": "abc123",
        "topic": "Meeting with visitor@example.com",
        "duration": 30
    })
}

#[tokio::test]
async fn token_is_cached_across_meetings() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v2/users/me/meetings"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(meeting_body(111)))
        .expect(2)
        .mount(&server)
        .await;

    let client = ZoomClient::new(config(&server)).unwrap();
    let first = client.create_meeting(&meeting_request(RecordingMode::None)).await.unwrap();
    let second = client.create_meeting(&meeting_request(RecordingMode::None)).await.unwrap();

    assert_eq!(first.id, "111");
    assert_eq!(first.join_url, "https://zoom.us/j/111");
    assert_eq!(first.password.as_deref(), Some("abc123"));
    assert_eq!(second.id, "111");
}

#[tokio::test]
async fn recording_consent_requests_cloud_recording() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v2/users/me/meetings"))
        .and(body_partial_json(json!({
            "type": 2,
            "duration": 30,
            "start_time": "2025-06-02T16:00:00Z",
            "settings": { "auto_recording": "cloud" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(meeting_body(222)))
        .expect(1)
        .mount(&server)
        .await;

    let client = ZoomClient::new(config(&server)).unwrap();
    let room = client
        .create_room(meeting_request(RecordingMode::Cloud))
        .await
        .unwrap();
    assert_eq!(room.id, "222");
}

#[tokio::test]
async fn unauthorized_drops_the_cached_token() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 2).await;
    Mock::given(method("POST"))
        .and(path("/v2/users/me/meetings"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 124,
            "message": "Invalid access token."
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/users/me/meetings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(meeting_body(333)))
        .expect(1)
        .mount(&server)
        .await;

    let client = ZoomClient::new(config(&server)).unwrap();
    let err = client
        .create_meeting(&meeting_request(RecordingMode::None))
        .await
        .unwrap_err();
    assert!(matches!(err, ZoomError::AuthError(ref m) if m == "Invalid access token."));

    let room = client
        .create_meeting(&meeting_request(RecordingMode::None))
        .await
        .unwrap();
    assert_eq!(room.id, "333");
}

#[tokio::test]
async fn failed_token_request_is_an_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "reason": "Invalid client_id or client_secret",
            "error": "invalid_client"
        })))
        .mount(&server)
        .await;

    let client = ZoomClient::new(config(&server)).unwrap();
    let err = client
        .create_room(meeting_request(RecordingMode::None))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Auth { ref service, .. } if service == "zoom"));
}

#[tokio::test]
async fn server_errors_are_reported_as_unavailable() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/v2/users/me/meetings"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ZoomClient::new(config(&server)).unwrap();
    let err = client
        .create_room(meeting_request(RecordingMode::None))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unavailable { .. }));
}

#[tokio::test]
async fn release_deletes_and_tolerates_missing_meetings() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/v2/meetings/444"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v2/meetings/555"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 3001,
            "message": "Meeting does not exist: 555."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ZoomClient::new(config(&server)).unwrap();
    client.release_room("444").await.unwrap();
    client.release_room("555").await.unwrap();
}

#[test]
fn incomplete_credentials_are_rejected() {
    let config = ZoomConfig {
        account_id: "acct-1".to_string(),
        client_id: "client".to_string(),
        client_secret: " ".to_string(),
        api_base_url: "https://api.zoom.us/v2".to_string(),
        oauth_url: "https://zoom.us/oauth/token".to_string(),
    };
    assert!(matches!(
        ZoomClient::new(config),
        Err(ZoomError::ConfigError(ref m)) if m.contains("client_secret")
    ));
}
