// libs/video-conferencing-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// CREDENTIALS
// ==============================================================================

/// Bearer credential issued by the identity provider. Lives for a single
/// provisioning call sequence and is never cached.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

// ==============================================================================
// MEETING DOMAIN MODELS
// ==============================================================================

/// Appends the UTC marker when missing. Already-suffixed values pass through.
pub fn normalize_utc(value: &str) -> String {
    if value.ends_with('Z') {
        value.to_string()
    } else {
        format!("{}Z", value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub subject: String,
    pub start: String,
    pub end: String,
}

impl MeetingRequest {
    pub fn new(subject: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn from_datetimes(subject: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(
            subject,
            start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            end.format("%Y-%m-%dT%H:%M:%S").to_string(),
        )
    }

    pub fn normalized(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            start: normalize_utc(&self.start),
            end: normalize_utc(&self.end),
        }
    }
}

/// Outcome of a meeting creation that reached the provider successfully.
/// A missing join URL is a legitimate result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingResult {
    pub join_url: Option<String>,
}

impl MeetingResult {
    pub fn has_link(&self) -> bool {
        self.join_url.is_some()
    }
}

/// Structured health-check result; never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCheck {
    pub success: bool,
    pub status: Option<u16>,
    pub body: String,
}

// ==============================================================================
// GRAPH API WIRE MODELS
// ==============================================================================

pub const ONLINE_MEETING_PROVIDER: &str = "teamsForBusiness";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventRequest {
    pub subject: String,
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
    pub is_online_meeting: bool,
    pub online_meeting_provider: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineMeetingRequest {
    pub start_date_time: String,
    pub end_date_time: String,
    pub subject: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MeetingPayload {
    CalendarEvent(CalendarEventRequest),
    Standalone(OnlineMeetingRequest),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineMeetingInfo {
    pub join_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventResponse {
    pub online_meeting: Option<OnlineMeetingInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineMeetingResponse {
    pub join_web_url: Option<String>,
}

// ==============================================================================
// MEETING STRATEGIES
// ==============================================================================

/// The two ways of provisioning a meeting link. A calendar event leaves an
/// entry in the mailbox calendar; a standalone online meeting does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingStrategy {
    #[serde(rename = "calendar_event")]
    CalendarEvent,
    #[serde(rename = "standalone")]
    Standalone,
}

impl MeetingStrategy {
    pub fn endpoint(&self, graph_base_url: &str, mailbox: &str) -> String {
        match self {
            MeetingStrategy::CalendarEvent => format!("{}/users/{}/events", graph_base_url, mailbox),
            MeetingStrategy::Standalone => {
                format!("{}/users/{}/onlineMeetings", graph_base_url, mailbox)
            }
        }
    }

    /// Expects a request whose timestamps are already normalized.
    pub fn request_body(&self, request: &MeetingRequest) -> MeetingPayload {
        match self {
            MeetingStrategy::CalendarEvent => MeetingPayload::CalendarEvent(CalendarEventRequest {
                subject: request.subject.clone(),
                start: DateTimeTimeZone {
                    date_time: request.start.clone(),
                    time_zone: "UTC".to_string(),
                },
                end: DateTimeTimeZone {
                    date_time: request.end.clone(),
                    time_zone: "UTC".to_string(),
                },
                is_online_meeting: true,
                online_meeting_provider: ONLINE_MEETING_PROVIDER.to_string(),
            }),
            MeetingStrategy::Standalone => MeetingPayload::Standalone(OnlineMeetingRequest {
                start_date_time: request.start.clone(),
                end_date_time: request.end.clone(),
                subject: request.subject.clone(),
            }),
        }
    }

    pub fn extract_join_url(&self, body: &str) -> Option<String> {
        let join_url = match self {
            MeetingStrategy::CalendarEvent => serde_json::from_str::<CalendarEventResponse>(body)
                .ok()
                .and_then(|event| event.online_meeting)
                .and_then(|meeting| meeting.join_url),
            MeetingStrategy::Standalone => serde_json::from_str::<OnlineMeetingResponse>(body)
                .ok()
                .and_then(|meeting| meeting.join_web_url),
        };

        join_url.filter(|url| !url.trim().is_empty())
    }
}

impl fmt::Display for MeetingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingStrategy::CalendarEvent => f.write_str("calendar_event"),
            MeetingStrategy::Standalone => f.write_str("standalone"),
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProvisioningError {
    #[error("Meeting provisioning not configured")]
    NotConfigured,

    #[error("No mailbox configured")]
    MailboxNotConfigured,

    #[error("Token request rejected: HTTP {status}: {body}")]
    TokenRejected { status: u16, body: String },

    #[error("Token response malformed: {0}")]
    MalformedTokenResponse(String),

    #[error("Graph API error: HTTP {status}: {body}")]
    RemoteCall { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ProvisioningError {
    /// HTTP status returned by the remote party, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProvisioningError::TokenRejected { status, .. }
            | ProvisioningError::RemoteCall { status, .. } => Some(*status),
            _ => None,
        }
    }
}
