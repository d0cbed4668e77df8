//! Authenticated client for the AppGallery Connect publishing API.

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod transport;

pub use auth::{AccessToken, AuthClient};
pub use client::PublishingClient;
pub use endpoint::Endpoints;
pub use error::{ApiError, AuthError};
pub use model::{AppInfoResponse, ReleaseType};
pub use transport::HttpSettings;
