// libs/video-conferencing-cell/src/services/mod.rs

pub mod graph;
pub mod identity;

pub use graph::GraphMeetingClient;
pub use identity::IdentityProviderClient;
