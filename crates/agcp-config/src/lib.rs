//! Parse `agcp.toml`, the API credentials file, and `agconnect-services.json`,
//! and locate them on disk.

pub mod credentials;
pub mod error;
pub mod manifest;
pub mod resolve;
pub mod services;

pub use credentials::{ApiCredentials, ClientCredentials};
pub use error::ConfigError;
pub use manifest::Manifest;
pub use resolve::ConfigResolver;
pub use services::AppIdentity;
