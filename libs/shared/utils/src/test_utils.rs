use std::sync::Arc;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::identity::{Counterpart, PatientIdentity, RosterEntry};

pub struct TestConfig {
    pub supabase_url: String,
    pub graph_authority_url: String,
    pub graph_base_url: String,
    pub graph_mailbox: Option<String>,
    pub mail_api_base_url: String,
    pub redirect_email: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            graph_authority_url: "http://localhost:54322".to_string(),
            graph_base_url: "http://localhost:54323/v1.0".to_string(),
            graph_mailbox: Some("citas@clinic.test".to_string()),
            mail_api_base_url: "http://localhost:54324/v3".to_string(),
            redirect_email: None,
        }
    }
}

impl TestConfig {
    /// Points every remote collaborator at the same mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            graph_authority_url: uri.to_string(),
            graph_base_url: format!("{}/v1.0", uri),
            mail_api_base_url: format!("{}/v3", uri),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_role_key: "test-service-role-key".to_string(),
            graph_client_id: "test-client-id".to_string(),
            graph_client_secret: "test-client-secret".to_string(),
            graph_tenant_id: "test-tenant".to_string(),
            graph_mailbox: self.graph_mailbox.clone(),
            graph_authority_url: self.graph_authority_url.clone(),
            graph_base_url: self.graph_base_url.clone(),
            notification_redirect_email: self.redirect_email.clone(),
            mail_api_base_url: self.mail_api_base_url.clone(),
            mail_api_key: "test-mail-key".to_string(),
            mail_from_address: "no-reply@clinic.test".to_string(),
            mail_from_name: "Clinic".to_string(),
            mail_appointment_template_id: "d-appointment".to_string(),
            mail_referral_template_id: "d-referral".to_string(),
            server_port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestIdentities;

impl TestIdentities {
    pub fn patient(registration_number: Option<&str>, login_name: &str) -> PatientIdentity {
        PatientIdentity {
            id: Uuid::new_v4(),
            full_name: "Juan Perez".to_string(),
            registration_number: registration_number.map(str::to_string),
            login_name: login_name.to_string(),
        }
    }

    pub fn clinician() -> Counterpart {
        Counterpart {
            id: Uuid::new_v4(),
            full_name: "Dra. Ana Torres".to_string(),
            specialty: Some("Cardiologia".to_string()),
        }
    }

    pub fn roster_entry(registration_number: &str, email: Option<&str>) -> RosterEntry {
        RosterEntry {
            registration_number: registration_number.to_string(),
            email: email.map(str::to_string),
        }
    }
}

pub struct MockGraphResponses;

impl MockGraphResponses {
    pub fn token_response(token: &str) -> serde_json::Value {
        json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "ext_expires_in": 3599,
            "access_token": token
        })
    }

    pub fn event_response(join_url: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "subject": "Consulta",
            "isOnlineMeeting": true,
            "onlineMeetingProvider": "teamsForBusiness",
            "onlineMeeting": {
                "joinUrl": join_url
            }
        })
    }

    pub fn standalone_meeting_response(join_url: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "subject": "Consulta",
            "joinWebUrl": join_url
        })
    }

    pub fn error_response(code: &str, message: &str) -> serde_json::Value {
        json!({
            "error": {
                "code": code,
                "message": message
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert!(app_config.is_graph_configured());
        assert!(app_config.is_mail_configured());
        assert_eq!(app_config.redirect_override(), None);
    }

    #[test]
    fn test_mock_server_config_shares_uri() {
        let app_config = TestConfig::with_mock_server("http://127.0.0.1:9999").to_app_config();

        assert_eq!(app_config.graph_authority_url, "http://127.0.0.1:9999");
        assert_eq!(app_config.graph_base_url, "http://127.0.0.1:9999/v1.0");
        assert_eq!(app_config.mail_api_base_url, "http://127.0.0.1:9999/v3");
    }

    #[test]
    fn test_patient_fixture() {
        let patient = TestIdentities::patient(Some("12345"), "jperez");
        assert_eq!(patient.registration_number.as_deref(), Some("12345"));
        assert_eq!(patient.login_name, "jperez");
    }
}
