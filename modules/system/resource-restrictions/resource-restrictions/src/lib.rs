#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Resource Restrictions Module
//!
//! Validates the resource restrictions a role declares and enforces them
//! against the identity presented by an authentication request. Supports
//! Kubernetes hosts and Azure managed identities.
//!
//! The provider modules expose the stateless pipeline stages; [`Service`]
//! composes them with a [`RoleStore`](resource_restrictions_sdk::RoleStore)
//! and [`ResourceRestrictionsLocalClient`] exposes the service through the
//! SDK client trait.

pub mod config;
pub mod domain;

pub use config::{KubernetesConfig, ResourceRestrictionsConfig};
pub use domain::annotations::AnnotationIndex;
pub use domain::azure::{self, AzureRoleRestrictions, XmsMirid};
pub use domain::kubernetes::{self, HostIdentifier, K8sRoleRestrictions};
pub use domain::matcher::match_resources;
pub use domain::{DomainError, ResourceRestrictionsLocalClient, Service};
