// libs/notification-cell/src/services/mod.rs

pub mod directory;
pub mod dispatcher;
pub mod resolver;
pub mod transport;

pub use directory::{ClinicDirectory, SupabaseDirectory};
pub use dispatcher::NotificationDispatcher;
pub use resolver::{RecipientResolver, RecipientSource};
pub use transport::{MailTransport, SendGridTransport};
