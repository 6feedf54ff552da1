#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Role Store Plugin
//!
//! Serves role annotations from configuration for development, testing and
//! offline policy checks.
//!
//! ## Configuration
//!
//! ```yaml
//! roles:
//!   - id: "acct:host:conjur/authn-k8s/apps/ns1/*/*"
//!   - id: "acct:host:azure-apps/vm"
//!     annotations:
//!       - name: authn-azure/subscription-id
//!         value: "1111-2222"
//!       - name: authn-azure/resource-group
//!         value: "rg-prod"
//! ```

pub mod config;
pub mod domain;

pub use config::StaticRoleStoreConfig;
pub use domain::service::StaticRoleStore;
