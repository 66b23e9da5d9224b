// libs/video-conferencing-cell/src/services/graph.rs
use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};

use shared_config::AppConfig;

use crate::models::{AccessCheck, MeetingRequest, MeetingResult, MeetingStrategy, ProvisioningError};
use crate::services::identity::IdentityProviderClient;

/// Provisions Teams meeting links through Microsoft Graph on behalf of the
/// configured mailbox.
///
/// Every operation is a single attempt: no retries, no token cache. Failures
/// are logged with the provider's status and body and returned as values so
/// the appointment workflow can carry on without a link.
pub struct GraphMeetingClient {
    client: Client,
    identity: IdentityProviderClient,
    graph_base_url: String,
    mailbox: Option<String>,
}

impl GraphMeetingClient {
    pub fn new(config: &AppConfig) -> Result<Self, ProvisioningError> {
        let client = Client::new();
        let identity = IdentityProviderClient::new(config, client.clone())?;

        Ok(Self {
            client,
            identity,
            graph_base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            mailbox: config.graph_mailbox.clone(),
        })
    }

    fn mailbox(&self) -> Result<&str, ProvisioningError> {
        self.mailbox.as_deref().ok_or_else(|| {
            error!("No mailbox configured, refusing to provision meeting");
            ProvisioningError::MailboxNotConfigured
        })
    }

    /// Calendar event with an online meeting attached.
    /// POST /users/{mailbox}/events
    pub async fn create_event_meeting(
        &self,
        request: &MeetingRequest,
    ) -> Result<MeetingResult, ProvisioningError> {
        self.create_meeting(MeetingStrategy::CalendarEvent, request).await
    }

    /// Meeting object without a calendar entry.
    /// POST /users/{mailbox}/onlineMeetings
    pub async fn create_standalone_meeting(
        &self,
        request: &MeetingRequest,
    ) -> Result<MeetingResult, ProvisioningError> {
        self.create_meeting(MeetingStrategy::Standalone, request).await
    }

    #[instrument(skip(self, request), fields(subject = %request.subject))]
    pub async fn create_meeting(
        &self,
        strategy: MeetingStrategy,
        request: &MeetingRequest,
    ) -> Result<MeetingResult, ProvisioningError> {
        let mailbox = self.mailbox()?;
        let token = self.identity.acquire_token().await?;

        let request = request.normalized();
        let url = strategy.endpoint(&self.graph_base_url, mailbox);

        debug!("Creating {} meeting at {} ({} - {})", strategy, url, request.start, request.end);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.secret())
            .json(&strategy.request_body(&request))
            .send()
            .await
            .map_err(|e| {
                error!(strategy = %strategy, error = %e, "Meeting request failed before a response was received");
                ProvisioningError::Transport(e.to_string())
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(strategy = %strategy, status = %status, error = %e, "Failed to read meeting response body");
            ProvisioningError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            error!(strategy = %strategy, status = status.as_u16(), body = %response_text, "Meeting creation failed");
            return Err(ProvisioningError::RemoteCall {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let join_url = strategy.extract_join_url(&response_text);

        match &join_url {
            Some(url) => info!(strategy = %strategy, "Meeting created: {}", url),
            None => warn!(strategy = %strategy, status = status.as_u16(), body = %response_text, "Meeting created without a join URL"),
        }

        Ok(MeetingResult { join_url })
    }

    /// Flattens `create_meeting` for callers that only care about the link.
    /// Failures have already been logged by the time this returns `None`.
    pub async fn provision_join_url(
        &self,
        strategy: MeetingStrategy,
        request: &MeetingRequest,
    ) -> Option<String> {
        match self.create_meeting(strategy, request).await {
            Ok(result) => result.join_url,
            Err(e) => {
                warn!(strategy = %strategy, "Continuing without meeting link: {}", e);
                None
            }
        }
    }

    /// Diagnostic GET on the mailbox profile.
    /// GET /users/{mailbox}
    pub async fn check_access(&self) -> AccessCheck {
        let mailbox = match self.mailbox() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                return AccessCheck {
                    success: false,
                    status: None,
                    body: e.to_string(),
                }
            }
        };

        let token = match self.identity.acquire_token().await {
            Ok(token) => token,
            Err(e) => {
                return AccessCheck {
                    success: false,
                    status: e.status(),
                    body: e.to_string(),
                }
            }
        };

        let url = format!("{}/users/{}", self.graph_base_url, mailbox);
        debug!("Checking Graph access at {}", url);

        let response = match self.client.get(&url).bearer_auth(token.secret()).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Graph access check failed before a response was received");
                return AccessCheck {
                    success: false,
                    status: None,
                    body: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("Failed to read response body: {}", e));

        if status.is_success() {
            info!("Graph access check passed for {}", mailbox);
        } else {
            warn!(status = status.as_u16(), body = %body, "Graph access check failed");
        }

        AccessCheck {
            success: status.is_success(),
            status: Some(status.as_u16()),
            body,
        }
    }
}
