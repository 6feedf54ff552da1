#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Resource Restrictions SDK
//!
//! This crate provides the public API for the `resource_restrictions` module:
//!
//! - [`ResourceRestrictionsClient`] - Public API trait for the authenticator
//! - [`RoleStore`] - Collaborator trait for role annotation lookup
//! - [`ResourceSpec`], [`IdentitySpec`], [`RuntimeClaims`] - Constraint models
//! - [`K8sResourceKind`], [`AzureResourceKind`] - Closed sets of constraint kinds
//! - [`ResourceRestrictionsError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use resource_restrictions_sdk::ResourceRestrictionsClient;
//!
//! let identity = restrictions.validate_k8s_request(&request).await?;
//! let container = identity.container_name();
//! ```

pub mod api;
pub mod claims;
pub mod error;
pub mod kinds;
pub mod models;
pub mod plugin_api;
pub mod requests;

// Re-export main types at crate root
pub use api::ResourceRestrictionsClient;
pub use claims::{AzureTokenClaims, K8sPodIdentity};
pub use error::ResourceRestrictionsError;
pub use kinds::{AzureResourceKind, ConstraintGroup, K8sResourceKind, KindInfo, ResourceKind};
pub use models::{
    Annotation, IdentitySpec, K8sApplicationIdentity, ResourceSet, ResourceSpec, RoleId,
    RoleRecord, RuntimeClaims,
};
pub use plugin_api::RoleStore;
pub use requests::{AzureAuthnRequest, K8sAuthnRequest};
