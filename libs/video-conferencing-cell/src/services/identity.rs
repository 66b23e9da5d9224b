// libs/video-conferencing-cell/src/services/identity.rs
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{AccessToken, ProvisioningError, TokenResponse};

pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// OAuth2 client-credentials exchange against the tenant's token endpoint.
/// Every call performs a fresh exchange.
pub struct IdentityProviderClient {
    client: Client,
    client_id: String,
    client_secret: String,
    token_url: String,
}

impl IdentityProviderClient {
    pub fn new(config: &AppConfig, client: Client) -> Result<Self, ProvisioningError> {
        if !config.is_graph_configured() {
            return Err(ProvisioningError::NotConfigured);
        }

        Ok(Self {
            client,
            client_id: config.graph_client_id.clone(),
            client_secret: config.graph_client_secret.clone(),
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                config.graph_authority_url.trim_end_matches('/'),
                config.graph_tenant_id
            ),
        })
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// POST {authority}/{tenant}/oauth2/v2.0/token
    pub async fn acquire_token(&self) -> Result<AccessToken, ProvisioningError> {
        debug!("Requesting access token from {}", self.token_url);

        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", GRAPH_DEFAULT_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Token request failed before a response was received");
                ProvisioningError::Transport(e.to_string())
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(status = %status, error = %e, "Failed to read token response body");
            ProvisioningError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %response_text, "Token request rejected");
            return Err(ProvisioningError::TokenRejected {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!(status = status.as_u16(), body = %response_text, "Token response missing access_token");
            ProvisioningError::MalformedTokenResponse(e.to_string())
        })?;

        info!("Access token acquired");
        Ok(AccessToken::new(token_response.access_token))
    }
}
