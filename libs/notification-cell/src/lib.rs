// libs/notification-cell/src/lib.rs
//! # Notification Cell
//!
//! Delivers appointment and referral notifications to patients by email.
//!
//! For each [`NotificationEvent`] the dispatcher:
//!
//! 1. loads the patient and counterpart from the [`ClinicDirectory`],
//! 2. resolves the recipient through the [`RecipientResolver`] fallback chain
//!    (remunerated roster, equivalent roster, roster email matching the login
//!    name, then the login name itself if it is an address),
//! 3. swaps in `NOTIFICATION_REDIRECT_EMAIL` when set,
//! 4. hands subject, template and fields to the [`MailTransport`].
//!
//! Dispatch never fails outward. A missing patient, an unresolved address or
//! a transport error is logged and reported as a [`DispatchOutcome`], so the
//! workflow that persisted the appointment or referral always completes.

pub mod models;
pub mod services;

pub use models::{
    AppointmentScheduled, DispatchOutcome, EventKind, NotificationError, NotificationEvent,
    OutboundMail, ReferralCreated,
};

pub use services::{
    ClinicDirectory, MailTransport, NotificationDispatcher, RecipientResolver, RecipientSource,
    SendGridTransport, SupabaseDirectory,
};
