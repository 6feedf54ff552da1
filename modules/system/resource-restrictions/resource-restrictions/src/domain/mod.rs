//! Domain layer for resource restrictions.

pub mod annotations;
pub mod azure;
pub mod error;
pub mod kubernetes;
pub mod local_client;
pub mod matcher;
pub mod rules;
pub mod service;
pub mod validation;

pub use error::DomainError;
pub use local_client::ResourceRestrictionsLocalClient;
pub use service::Service;
