// --- File: crates/meetslot_zoom/src/models.rs ---
// Wire types of the Zoom REST API (only the fields we use).

use chrono::{DateTime, Utc};
use meetslot_common::models::ConferenceRef;
use meetslot_common::services::{MeetingRequest, RecordingMode};
use serde::{Deserialize, Serialize};

/// Zoom meeting type for a one-off scheduled meeting.
pub const SCHEDULED_MEETING: u8 = 2;

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct MeetingSettings {
    pub host_video: bool,
    pub participant_video: bool,
    pub join_before_host: bool,
    pub mute_upon_entry: bool,
    pub use_pmi: bool,
    pub approval_type: u8,
    pub audio: &'static str,
    pub auto_recording: RecordingMode,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct CreateMeetingPayload {
    pub topic: String,
    #[serde(rename = "type")]
    pub meeting_type: u8,
    /// Zoom expects `yyyy-MM-ddTHH:mm:ssZ`.
    pub start_time: String,
    pub duration: i64,
    pub timezone: String,
    pub settings: MeetingSettings,
}

impl From<&MeetingRequest> for CreateMeetingPayload {
    fn from(request: &MeetingRequest) -> Self {
        Self {
            topic: request.topic.clone(),
            meeting_type: SCHEDULED_MEETING,
            start_time: format_start_time(request.start_time),
            duration: request.duration_minutes,
            timezone: request.time_zone.clone(),
            settings: MeetingSettings {
                host_video: true,
                participant_video: true,
                join_before_host: false,
                mute_upon_entry: true,
                use_pmi: false,
                approval_type: 0,
                audio: "both",
                auto_recording: request.recording,
            },
        }
    }
}

fn format_start_time(start: DateTime<Utc>) -> String {
    start.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Deserialize, Debug)]
pub struct MeetingResponse {
    pub id: u64,
    pub join_url: String,
    pub start_url: Option<String>,
    pub password: Option<String>,
}

impl From<MeetingResponse> for ConferenceRef {
    fn from(meeting: MeetingResponse) -> Self {
        Self {
            id: meeting.id.to_string(),
            join_url: meeting.join_url,
            password: meeting.password.filter(|p| !p.is_empty()),
            start_url: meeting.start_url,
        }
    }
}

/// Error body returned by Zoom on non-2xx responses.
#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
}
