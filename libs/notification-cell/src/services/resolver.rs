// libs/notification-cell/src/services/resolver.rs
use tracing::debug;

use shared_models::identity::PatientIdentity;
use shared_utils::validation::is_valid_email;

use crate::models::NotificationError;
use crate::services::directory::ClinicDirectory;

/// One place a patient's email may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientSource {
    /// Remunerated roster, keyed by registration number.
    RemuneratedRoster,
    /// Equivalent-remunerated roster, keyed by registration number.
    EquivalentRoster,
    /// Remunerated roster row whose email equals the login name.
    RosterEmailMatchesLogin,
    /// The login name itself, when it is a well-formed address.
    LoginNameAsEmail,
}

impl RecipientSource {
    pub const DEFAULT_ORDER: [RecipientSource; 4] = [
        RecipientSource::RemuneratedRoster,
        RecipientSource::EquivalentRoster,
        RecipientSource::RosterEmailMatchesLogin,
        RecipientSource::LoginNameAsEmail,
    ];

    pub async fn lookup(
        &self,
        directory: &dyn ClinicDirectory,
        patient: &PatientIdentity,
    ) -> Result<Option<String>, NotificationError> {
        let registration_number = patient
            .registration_number
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let login_name = patient.login_name.trim();

        let entry = match self {
            RecipientSource::RemuneratedRoster => match registration_number {
                Some(number) => directory.remunerated_by_registration(number).await?,
                None => None,
            },
            RecipientSource::EquivalentRoster => match registration_number {
                Some(number) => directory.equivalent_by_registration(number).await?,
                None => None,
            },
            RecipientSource::RosterEmailMatchesLogin => {
                if login_name.is_empty() {
                    None
                } else {
                    directory.remunerated_by_email(login_name).await?
                }
            }
            RecipientSource::LoginNameAsEmail => {
                return Ok(is_valid_email(login_name).then(|| login_name.to_string()));
            }
        };

        Ok(entry.and_then(|entry| entry.usable_email().map(str::to_string)))
    }
}

/// Ordered fallback chain; the first source yielding an address wins.
#[derive(Debug, Clone)]
pub struct RecipientResolver {
    sources: Vec<RecipientSource>,
}

impl Default for RecipientResolver {
    fn default() -> Self {
        Self::with_sources(RecipientSource::DEFAULT_ORDER.to_vec())
    }
}

impl RecipientResolver {
    pub fn with_sources(sources: Vec<RecipientSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[RecipientSource] {
        &self.sources
    }

    pub async fn resolve(
        &self,
        directory: &dyn ClinicDirectory,
        patient: &PatientIdentity,
    ) -> Result<Option<String>, NotificationError> {
        for source in &self.sources {
            if let Some(email) = source.lookup(directory, patient).await? {
                debug!(patient_id = %patient.id, source = ?source, "Recipient resolved");
                return Ok(Some(email));
            }
        }

        Ok(None)
    }
}
