// libs/notification-cell/src/services/directory.rs
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::identity::{Counterpart, PatientIdentity, RosterEntry};

use crate::models::NotificationError;

pub const PATIENTS_TABLE: &str = "patients";
pub const CLINICIANS_TABLE: &str = "clinicians";
pub const REMUNERATED_ROSTER_TABLE: &str = "remunerated_roster";
pub const EQUIVALENT_ROSTER_TABLE: &str = "equivalent_remunerated_roster";

/// Read access to the identity records and rosters consulted by the
/// dispatcher.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClinicDirectory: Send + Sync {
    async fn find_patient(&self, patient_id: Uuid) -> Result<Option<PatientIdentity>, NotificationError>;

    /// Clinician or specialist on the other side of the event.
    async fn find_counterpart(&self, counterpart_id: Uuid) -> Result<Option<Counterpart>, NotificationError>;

    async fn remunerated_by_registration(
        &self,
        registration_number: &str,
    ) -> Result<Option<RosterEntry>, NotificationError>;

    async fn equivalent_by_registration(
        &self,
        registration_number: &str,
    ) -> Result<Option<RosterEntry>, NotificationError>;

    async fn remunerated_by_email(&self, email: &str) -> Result<Option<RosterEntry>, NotificationError>;
}

pub struct SupabaseDirectory {
    supabase: SupabaseClient,
}

impl SupabaseDirectory {
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        if !config.is_database_configured() {
            return Err(NotificationError::NotConfigured(
                "SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY are required".to_string(),
            ));
        }

        Ok(Self {
            supabase: SupabaseClient::new(config),
        })
    }

    async fn find_first<T>(&self, table: &str, column: &str, value: &str) -> Result<Option<T>, NotificationError>
    where
        T: DeserializeOwned,
    {
        debug!("Looking up {} where {} = {}", table, column, value);

        self.supabase
            .find_first(table, column, value)
            .await
            .map_err(|e| NotificationError::Directory(format!("{}: {}", table, e)))
    }
}

#[async_trait]
impl ClinicDirectory for SupabaseDirectory {
    async fn find_patient(&self, patient_id: Uuid) -> Result<Option<PatientIdentity>, NotificationError> {
        self.find_first(PATIENTS_TABLE, "id", &patient_id.to_string()).await
    }

    async fn find_counterpart(&self, counterpart_id: Uuid) -> Result<Option<Counterpart>, NotificationError> {
        self.find_first(CLINICIANS_TABLE, "id", &counterpart_id.to_string()).await
    }

    async fn remunerated_by_registration(
        &self,
        registration_number: &str,
    ) -> Result<Option<RosterEntry>, NotificationError> {
        self.find_first(REMUNERATED_ROSTER_TABLE, "cmp", registration_number).await
    }

    async fn equivalent_by_registration(
        &self,
        registration_number: &str,
    ) -> Result<Option<RosterEntry>, NotificationError> {
        self.find_first(EQUIVALENT_ROSTER_TABLE, "cmp", registration_number).await
    }

    async fn remunerated_by_email(&self, email: &str) -> Result<Option<RosterEntry>, NotificationError> {
        self.find_first(REMUNERATED_ROSTER_TABLE, "email", email).await
    }
}
