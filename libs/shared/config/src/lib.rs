use std::env;
use tracing::warn;

pub const DEFAULT_GRAPH_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_MAIL_API_BASE_URL: &str = "https://api.sendgrid.com/v3";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    pub graph_client_id: String,
    pub graph_client_secret: String,
    pub graph_tenant_id: String,
    pub graph_mailbox: Option<String>,
    pub graph_authority_url: String,
    pub graph_base_url: String,
    pub notification_redirect_email: Option<String>,
    pub mail_api_base_url: String,
    pub mail_api_key: String,
    pub mail_from_address: String,
    pub mail_from_name: String,
    pub mail_appointment_template_id: String,
    pub mail_referral_template_id: String,
    pub server_port: u16,
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn with_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using default", key);
        default.to_string()
    })
}

/// Empty or whitespace-only values count as "not set".
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(3000);

        let config = Self {
            supabase_url: required("SUPABASE_URL"),
            supabase_service_role_key: required("SUPABASE_SERVICE_ROLE_KEY"),
            graph_client_id: required("MS_GRAPH_CLIENT_ID"),
            graph_client_secret: required("MS_GRAPH_CLIENT_SECRET"),
            graph_tenant_id: required("MS_GRAPH_TENANT_ID"),
            graph_mailbox: optional("MS_GRAPH_MAILBOX"),
            graph_authority_url: with_default("MS_GRAPH_AUTHORITY_URL", DEFAULT_GRAPH_AUTHORITY_URL),
            graph_base_url: with_default("MS_GRAPH_BASE_URL", DEFAULT_GRAPH_BASE_URL),
            notification_redirect_email: optional("NOTIFICATION_REDIRECT_EMAIL"),
            mail_api_base_url: with_default("MAIL_API_BASE_URL", DEFAULT_MAIL_API_BASE_URL),
            mail_api_key: required("MAIL_API_KEY"),
            mail_from_address: required("MAIL_FROM_ADDRESS"),
            mail_from_name: with_default("MAIL_FROM_NAME", "Clinic Notifications"),
            mail_appointment_template_id: required("MAIL_TEMPLATE_APPOINTMENT"),
            mail_referral_template_id: required("MAIL_TEMPLATE_REFERRAL"),
            server_port,
        };

        if !config.is_graph_configured() {
            warn!("Meeting provisioning not configured - missing Graph credentials");
        }
        if config.graph_mailbox.is_none() {
            warn!("MS_GRAPH_MAILBOX not set, meeting creation will be refused");
        }
        if !config.is_mail_configured() {
            warn!("Mail transport not fully configured - missing environment variables");
        }
        if let Some(redirect) = config.redirect_override() {
            warn!("All notifications will be redirected to {}", redirect);
        }

        config
    }

    pub fn is_database_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_role_key.is_empty()
    }

    pub fn is_graph_configured(&self) -> bool {
        !self.graph_client_id.is_empty()
            && !self.graph_client_secret.is_empty()
            && !self.graph_tenant_id.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_key.is_empty() && !self.mail_from_address.is_empty()
    }

    /// Address that replaces every resolved recipient, if set.
    pub fn redirect_override(&self) -> Option<&str> {
        self.notification_redirect_email
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_config() -> AppConfig {
        AppConfig {
            supabase_url: String::new(),
            supabase_service_role_key: String::new(),
            graph_client_id: String::new(),
            graph_client_secret: String::new(),
            graph_tenant_id: String::new(),
            graph_mailbox: None,
            graph_authority_url: DEFAULT_GRAPH_AUTHORITY_URL.to_string(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            notification_redirect_email: None,
            mail_api_base_url: DEFAULT_MAIL_API_BASE_URL.to_string(),
            mail_api_key: String::new(),
            mail_from_address: String::new(),
            mail_from_name: String::new(),
            mail_appointment_template_id: String::new(),
            mail_referral_template_id: String::new(),
            server_port: 3000,
        }
    }

    #[test]
    fn test_graph_configuration_requires_all_credentials() {
        let mut config = blank_config();
        assert!(!config.is_graph_configured());

        config.graph_client_id = "client".to_string();
        config.graph_client_secret = "secret".to_string();
        assert!(!config.is_graph_configured());

        config.graph_tenant_id = "tenant".to_string();
        assert!(config.is_graph_configured());
    }

    #[test]
    fn test_blank_redirect_override_is_disabled() {
        let mut config = blank_config();
        assert_eq!(config.redirect_override(), None);

        config.notification_redirect_email = Some("   ".to_string());
        assert_eq!(config.redirect_override(), None);

        config.notification_redirect_email = Some(" qa@clinic.test ".to_string());
        assert_eq!(config.redirect_override(), Some("qa@clinic.test"));
    }
}
