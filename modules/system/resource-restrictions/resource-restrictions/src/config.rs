//! Configuration for the resource restrictions module.

use serde::{Deserialize, Serialize};

/// Configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceRestrictionsConfig {
    /// Kubernetes-specific settings.
    pub kubernetes: KubernetesConfig,
}

/// Kubernetes settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct KubernetesConfig {
    /// Container name used when no annotation names one.
    pub default_container_name: String,

    /// Pre-`authn-k8s` annotation consulted before the default.
    pub legacy_container_annotation: String,

    /// Accept `service_account`-style segments in host identifiers
    /// alongside the dash form.
    pub accept_underscored_host_segments: bool,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            default_container_name: "authenticator".to_owned(),
            legacy_container_annotation: "kubernetes/authentication-container-name".to_owned(),
            accept_underscored_host_segments: true,
        }
    }
}
