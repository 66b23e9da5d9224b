// libs/notification-cell/src/services/dispatcher.rs
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use shared_config::AppConfig;
use shared_models::identity::PatientIdentity;

use crate::models::{DispatchOutcome, NotificationError, NotificationEvent, OutboundMail};
use crate::services::directory::{ClinicDirectory, SupabaseDirectory};
use crate::services::resolver::RecipientResolver;
use crate::services::transport::{MailTransport, SendGridTransport};

/// Turns domain events into outbound mail. A dispatch is a single linear
/// attempt; whatever goes wrong is logged and reported as a
/// [`DispatchOutcome`], never returned as an error.
pub struct NotificationDispatcher {
    directory: Arc<dyn ClinicDirectory>,
    transport: Arc<dyn MailTransport>,
    resolver: RecipientResolver,
    redirect_override: Option<String>,
}

impl NotificationDispatcher {
    pub fn new(
        config: &AppConfig,
        directory: Arc<dyn ClinicDirectory>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            directory,
            transport,
            resolver: RecipientResolver::default(),
            redirect_override: config.redirect_override().map(str::to_string),
        }
    }

    /// Supabase-backed directory and SendGrid transport.
    pub fn from_config(config: &AppConfig) -> Result<Self, NotificationError> {
        let directory = Arc::new(SupabaseDirectory::new(config)?);
        let transport = Arc::new(SendGridTransport::new(config)?);

        Ok(Self::new(config, directory, transport))
    }

    pub fn with_resolver(mut self, resolver: RecipientResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub async fn resolve_recipient_email(
        &self,
        patient: &PatientIdentity,
    ) -> Result<Option<String>, NotificationError> {
        self.resolver.resolve(&*self.directory, patient).await
    }

    #[instrument(skip(self, event), fields(kind = %event.kind(), record_id = %event.record_id()))]
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchOutcome {
        match self.try_dispatch(event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(patient_id = %event.patient_id(), "Notification dispatch failed: {}", e);
                DispatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_dispatch(&self, event: &NotificationEvent) -> Result<DispatchOutcome, NotificationError> {
        let patient_id = event.patient_id();

        let Some(patient) = self.directory.find_patient(patient_id).await? else {
            warn!(patient_id = %patient_id, "Patient not found, notification dropped");
            return Ok(DispatchOutcome::PatientNotFound);
        };

        let counterpart = self.directory.find_counterpart(event.counterpart_id()).await?;
        if counterpart.is_none() {
            warn!(counterpart_id = %event.counterpart_id(), "Counterpart not found, sending without name");
        }

        let Some(resolved) = self.resolve_recipient_email(&patient).await? else {
            warn!(
                patient_id = %patient.id,
                patient_name = %patient.full_name,
                "No recipient email resolved for patient, notification dropped"
            );
            return Ok(DispatchOutcome::RecipientUnresolved);
        };

        let (recipient, redirected) = match &self.redirect_override {
            Some(redirect) => {
                info!("Redirecting notification for {} to {}", resolved, redirect);
                (redirect.clone(), true)
            }
            None => (resolved, false),
        };

        let kind = event.kind();
        let mail = OutboundMail {
            to: recipient.clone(),
            subject: kind.subject().to_string(),
            kind,
            fields: event.payload(&patient, counterpart.as_ref()),
        };

        self.transport.send(&mail).await?;

        match event {
            NotificationEvent::AppointmentScheduled(appointment) => info!(
                "Appointment notification sent to {} for appointment {}",
                recipient, appointment.appointment_id
            ),
            NotificationEvent::ReferralCreated(_) => {
                info!("Referral notification sent to {}", recipient)
            }
        }

        Ok(DispatchOutcome::Sent {
            recipient,
            redirected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    use crate::models::{AppointmentScheduled, EventKind, ReferralCreated};
    use crate::services::directory::MockClinicDirectory;
    use crate::services::transport::MockMailTransport;
    use shared_utils::test_utils::{TestConfig, TestIdentities};

    fn appointment_event(patient_id: Uuid) -> NotificationEvent {
        NotificationEvent::AppointmentScheduled(AppointmentScheduled {
            appointment_id: Uuid::new_v4(),
            patient_id,
            clinician_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            meeting_link: Some("https://teams.example/l/1".to_string()),
        })
    }

    /// Directory knowing one patient (registration 12345, login jperez)
    /// with a roster email.
    fn directory_with_roster_patient(patient: PatientIdentity) -> MockClinicDirectory {
        let mut directory = MockClinicDirectory::new();
        directory
            .expect_find_patient()
            .returning(move |_| Ok(Some(patient.clone())));
        directory
            .expect_find_counterpart()
            .returning(|_| Ok(Some(TestIdentities::clinician())));
        directory
            .expect_remunerated_by_registration()
            .returning(|_| Ok(Some(TestIdentities::roster_entry("12345", Some("j.perez@roster.org")))));
        directory
    }

    fn dispatcher(
        config: &AppConfig,
        directory: MockClinicDirectory,
        transport: MockMailTransport,
    ) -> NotificationDispatcher {
        NotificationDispatcher::new(config, Arc::new(directory), Arc::new(transport))
    }

    #[tokio::test]
    async fn test_dispatch_sends_to_resolved_recipient() {
        let patient = TestIdentities::patient(Some("12345"), "jperez");
        let directory = directory_with_roster_patient(patient.clone());

        let mut transport = MockMailTransport::new();
        transport
            .expect_send()
            .withf(|mail| {
                mail.to == "j.perez@roster.org"
                    && mail.kind == EventKind::AppointmentScheduled
                    && mail.subject == EventKind::AppointmentScheduled.subject()
                    && mail.fields["start_time"] == "09:00"
                    && mail.fields["meeting_link"] == "https://teams.example/l/1"
            })
            .times(1)
            .returning(|_| Ok(()));

        let config = TestConfig::default().to_app_config();
        let outcome = dispatcher(&config, directory, transport)
            .dispatch(&appointment_event(patient.id))
            .await;

        assert_eq!(
            outcome,
            DispatchOutcome::Sent {
                recipient: "j.perez@roster.org".to_string(),
                redirected: false,
            }
        );
    }

    #[tokio::test]
    async fn test_redirect_override_supersedes_resolved_recipient() {
        let patient = TestIdentities::patient(Some("12345"), "jperez");
        let directory = directory_with_roster_patient(patient.clone());

        let mut transport = MockMailTransport::new();
        transport
            .expect_send()
            .withf(|mail| mail.to == "qa@clinic.test")
            .times(1)
            .returning(|_| Ok(()));

        let mut test_config = TestConfig::default();
        test_config.redirect_email = Some("qa@clinic.test".to_string());
        let config = test_config.to_app_config();

        let outcome = dispatcher(&config, directory, transport)
            .dispatch(&appointment_event(patient.id))
            .await;

        assert_eq!(
            outcome,
            DispatchOutcome::Sent {
                recipient: "qa@clinic.test".to_string(),
                redirected: true,
            }
        );
    }

    #[tokio::test]
    async fn test_missing_patient_returns_quietly() {
        let mut directory = MockClinicDirectory::new();
        directory.expect_find_patient().returning(|_| Ok(None));
        directory.expect_find_counterpart().times(0);

        let mut transport = MockMailTransport::new();
        transport.expect_send().times(0);

        let config = TestConfig::default().to_app_config();
        let outcome = dispatcher(&config, directory, transport)
            .dispatch(&appointment_event(Uuid::new_v4()))
            .await;

        assert_eq!(outcome, DispatchOutcome::PatientNotFound);
    }

    #[tokio::test]
    async fn test_unresolved_recipient_is_not_sent_even_with_override() {
        let patient = TestIdentities::patient(Some("99999"), "jperez");
        let mut directory = MockClinicDirectory::new();
        directory
            .expect_find_patient()
            .returning(move |_| Ok(Some(patient.clone())));
        directory.expect_find_counterpart().returning(|_| Ok(None));
        directory.expect_remunerated_by_registration().returning(|_| Ok(None));
        directory.expect_equivalent_by_registration().returning(|_| Ok(None));
        directory.expect_remunerated_by_email().returning(|_| Ok(None));

        let mut transport = MockMailTransport::new();
        transport.expect_send().times(0);

        let mut test_config = TestConfig::default();
        test_config.redirect_email = Some("qa@clinic.test".to_string());
        let config = test_config.to_app_config();

        let outcome = dispatcher(&config, directory, transport)
            .dispatch(&appointment_event(Uuid::new_v4()))
            .await;

        assert_eq!(outcome, DispatchOutcome::RecipientUnresolved);
    }

    #[tokio::test]
    async fn test_transport_failure_is_contained() {
        let patient = TestIdentities::patient(Some("12345"), "jperez");
        let directory = directory_with_roster_patient(patient.clone());

        let mut transport = MockMailTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Err(NotificationError::Transport {
                provider: "sendgrid",
                message: "HTTP 503".to_string(),
            })
        });

        let config = TestConfig::default().to_app_config();
        let outcome = dispatcher(&config, directory, transport)
            .dispatch(&appointment_event(patient.id))
            .await;

        assert_matches!(outcome, DispatchOutcome::Failed { ref reason } if reason.contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_directory_failure_is_contained() {
        let mut directory = MockClinicDirectory::new();
        directory
            .expect_find_patient()
            .returning(|_| Err(NotificationError::Directory("patients: timeout".to_string())));

        let mut transport = MockMailTransport::new();
        transport.expect_send().times(0);

        let config = TestConfig::default().to_app_config();
        let outcome = dispatcher(&config, directory, transport)
            .dispatch(&appointment_event(Uuid::new_v4()))
            .await;

        assert_matches!(outcome, DispatchOutcome::Failed { .. });
    }

    #[tokio::test]
    async fn test_referral_dispatch_uses_referral_subject_and_date_format() {
        let patient = TestIdentities::patient(None, "jperez@example.com");
        let patient_id = patient.id;
        let mut directory = MockClinicDirectory::new();
        directory
            .expect_find_patient()
            .returning(move |_| Ok(Some(patient.clone())));
        directory
            .expect_find_counterpart()
            .returning(|_| Ok(Some(TestIdentities::clinician())));
        directory.expect_remunerated_by_email().returning(|_| Ok(None));

        let mut transport = MockMailTransport::new();
        transport
            .expect_send()
            .withf(|mail| {
                mail.to == "jperez@example.com"
                    && mail.kind == EventKind::ReferralCreated
                    && mail.subject == EventKind::ReferralCreated.subject()
                    && mail.fields["date"] == "07/03/2025"
                    && mail.fields["specialist_name"] == "Dra. Ana Torres"
            })
            .times(1)
            .returning(|_| Ok(()));

        let event = NotificationEvent::ReferralCreated(ReferralCreated {
            referral_id: Uuid::new_v4(),
            patient_id,
            specialist_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            observation: "Evaluacion cardiologica".to_string(),
        });

        let config = TestConfig::default().to_app_config();
        let outcome = dispatcher(&config, directory, transport).dispatch(&event).await;

        assert!(outcome.is_sent());
    }
}
