// libs/notification-cell/src/models.rs
use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::identity::{Counterpart, PatientIdentity};

// ==============================================================================
// NOTIFICATION EVENTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentScheduled {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub clinician_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub meeting_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralCreated {
    pub referral_id: Uuid,
    pub patient_id: Uuid,
    pub specialist_id: Uuid,
    pub date: NaiveDate,
    pub observation: String,
}

/// Emitted by the appointment and referral workflows once their record is
/// persisted. Consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    AppointmentScheduled(AppointmentScheduled),
    ReferralCreated(ReferralCreated),
}

impl NotificationEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            NotificationEvent::AppointmentScheduled(_) => EventKind::AppointmentScheduled,
            NotificationEvent::ReferralCreated(_) => EventKind::ReferralCreated,
        }
    }

    pub fn patient_id(&self) -> Uuid {
        match self {
            NotificationEvent::AppointmentScheduled(event) => event.patient_id,
            NotificationEvent::ReferralCreated(event) => event.patient_id,
        }
    }

    pub fn counterpart_id(&self) -> Uuid {
        match self {
            NotificationEvent::AppointmentScheduled(event) => event.clinician_id,
            NotificationEvent::ReferralCreated(event) => event.specialist_id,
        }
    }

    /// Identifier of the record that triggered the event.
    pub fn record_id(&self) -> Uuid {
        match self {
            NotificationEvent::AppointmentScheduled(event) => event.appointment_id,
            NotificationEvent::ReferralCreated(event) => event.referral_id,
        }
    }

    /// Named fields handed to the mail template.
    pub fn payload(
        &self,
        patient: &PatientIdentity,
        counterpart: Option<&Counterpart>,
    ) -> BTreeMap<String, String> {
        let counterpart_name = counterpart.map(|c| c.full_name.clone()).unwrap_or_default();
        let specialty = counterpart
            .and_then(|c| c.specialty.clone())
            .unwrap_or_default();

        let mut fields = BTreeMap::new();
        fields.insert("patient_name".to_string(), patient.full_name.clone());
        fields.insert("specialty".to_string(), specialty);

        match self {
            NotificationEvent::AppointmentScheduled(event) => {
                fields.insert("appointment_id".to_string(), event.appointment_id.to_string());
                fields.insert("clinician_name".to_string(), counterpart_name);
                fields.insert("date".to_string(), event.date.format("%Y-%m-%d").to_string());
                fields.insert("start_time".to_string(), event.start_time.format("%H:%M").to_string());
                fields.insert("end_time".to_string(), event.end_time.format("%H:%M").to_string());
                fields.insert(
                    "meeting_link".to_string(),
                    event.meeting_link.clone().unwrap_or_default(),
                );
            }
            NotificationEvent::ReferralCreated(event) => {
                fields.insert("referral_id".to_string(), event.referral_id.to_string());
                fields.insert("specialist_name".to_string(), counterpart_name);
                fields.insert("date".to_string(), event.date.format("%d/%m/%Y").to_string());
                fields.insert("observation".to_string(), event.observation.clone());
            }
        }

        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AppointmentScheduled,
    ReferralCreated,
}

impl EventKind {
    pub fn subject(&self) -> &'static str {
        match self {
            EventKind::AppointmentScheduled => "Your appointment has been scheduled",
            EventKind::ReferralCreated => "A referral has been registered for you",
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            EventKind::AppointmentScheduled => "appointment_scheduled",
            EventKind::ReferralCreated => "referral_created",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name())
    }
}

// ==============================================================================
// OUTBOUND MAIL
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub kind: EventKind,
    pub fields: BTreeMap<String, String>,
}

/// What happened to a single event. Dispatch never fails outward; this is
/// the diagnostic the caller can inspect if it wants to.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Sent { recipient: String, redirected: bool },
    PatientNotFound,
    RecipientUnresolved,
    Failed { reason: String },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Directory lookup failed: {0}")]
    Directory(String),

    #[error("Mail transport {provider} failed: {message}")]
    Transport { provider: &'static str, message: String },

    #[error("Notification service not configured: {0}")]
    NotConfigured(String),
}
