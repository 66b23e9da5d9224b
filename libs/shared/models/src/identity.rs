use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patient identity attributes consulted when resolving a notification
/// recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientIdentity {
    pub id: Uuid,
    pub full_name: String,
    /// Professional registration number (CMP), the roster lookup key.
    #[serde(default)]
    pub registration_number: Option<String>,
    /// Login name; sometimes itself an email address.
    pub login_name: String,
}

/// The other party of a notification: the attending clinician for an
/// appointment, the receiving specialist for a referral.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Counterpart {
    pub id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

/// A row of the remunerated (or equivalent-remunerated) roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterEntry {
    #[serde(rename = "cmp")]
    pub registration_number: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl RosterEntry {
    /// The roster email, ignoring blank values.
    pub fn usable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
