// libs/video-conferencing-cell/src/lib.rs
//! # Video Conferencing Cell
//!
//! Provisions Teams meeting links for appointments through Microsoft Graph,
//! authenticating as the clinic's own application (OAuth2 client-credentials).
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------+
//! |                   Video Cell                        |
//! +-----------------------------------------------------+
//! |  handlers.rs    |  Diagnostic endpoint handler      |
//! |  router.rs      |  Route definitions                |
//! |  models.rs      |  Requests, results, wire models   |
//! |  services/      |                                   |
//! |    identity.rs  |  Token endpoint client            |
//! |    graph.rs     |  Meeting creation + access check  |
//! +-----------------------------------------------------+
//! ```
//!
//! Two strategies are available, selected by the caller per appointment:
//!
//! - [`MeetingStrategy::CalendarEvent`] creates a calendar event in the
//!   configured mailbox with an online meeting attached.
//! - [`MeetingStrategy::Standalone`] creates only the online meeting object.
//!
//! Every call is a single attempt and re-authenticates. Failures come back as
//! [`ProvisioningError`] values (already logged) so that an appointment is
//! never rolled back because a meeting link could not be produced.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use shared_config::AppConfig;
//! use video_conferencing_cell::{GraphMeetingClient, MeetingRequest, MeetingStrategy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env();
//! let client = GraphMeetingClient::new(&config)?;
//!
//! let request = MeetingRequest::new("Consulta", "2025-03-10T09:00:00", "2025-03-10T09:30:00");
//! let link = client.provision_join_url(MeetingStrategy::CalendarEvent, &request).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! - `MS_GRAPH_CLIENT_ID`, `MS_GRAPH_CLIENT_SECRET`, `MS_GRAPH_TENANT_ID` - application credentials
//! - `MS_GRAPH_MAILBOX` - mailbox that owns the meetings
//! - `MS_GRAPH_AUTHORITY_URL`, `MS_GRAPH_BASE_URL` - endpoint overrides (optional)

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    normalize_utc, AccessCheck, AccessToken, MeetingRequest, MeetingResult, MeetingStrategy,
    ProvisioningError,
};

pub use services::{GraphMeetingClient, IdentityProviderClient};

pub use router::meeting_routes;
