//! Role policy validation.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use resource_restrictions::{
    AzureRoleRestrictions, K8sRoleRestrictions, ResourceRestrictionsConfig, azure, kubernetes,
};
use resource_restrictions_sdk::{
    AzureResourceKind, K8sResourceKind, ResourceKind, ResourceRestrictionsError, RoleRecord,
};
use serde::Serialize;

use crate::scanner::load_policy;

/// Provider choice given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ProviderSelection {
    /// Infer providers from each role.
    #[default]
    Auto,
    K8s,
    Azure,
}

/// A provider a role was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Kubernetes,
    Azure,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kubernetes => "authn-k8s",
            Self::Azure => "authn-azure",
        })
    }
}

/// A single failed role, or a file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyError {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    pub error: String,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.file.display())?;
        if let Some(role_id) = &self.role_id {
            write!(f, " {role_id}")?;
        }
        if let Some(provider) = self.provider {
            write!(f, " [{provider}]")?;
        }
        write!(f, " {}", self.error)
    }
}

/// Aggregated validation results
#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<PolicyError>,
    pub files_scanned: usize,
    pub roles_checked: usize,
}

impl ValidationResult {
    #[must_use]
    pub fn new(files_scanned: usize) -> Self {
        Self {
            files_scanned,
            ..Self::default()
        }
    }

    pub fn add_errors(&mut self, errors: Vec<PolicyError>) {
        self.errors.extend(errors);
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn has_annotations_under(record: &RoleRecord, prefix: &str) -> bool {
    record.annotations.iter().any(|annotation| {
        annotation
            .name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Providers a role is validated against.
///
/// In auto mode a role is checked for Kubernetes when it has `authn-k8s/`
/// annotations or is a host without `authn-azure/` annotations, and for
/// Azure when it has `authn-azure/` annotations.
#[must_use]
pub fn providers_for(record: &RoleRecord, selection: ProviderSelection) -> Vec<Provider> {
    match selection {
        ProviderSelection::K8s => vec![Provider::Kubernetes],
        ProviderSelection::Azure => vec![Provider::Azure],
        ProviderSelection::Auto => {
            let k8s = has_annotations_under(record, K8sResourceKind::PROVIDER_PREFIX);
            let azure = has_annotations_under(record, AzureResourceKind::PROVIDER_PREFIX);
            let host = record.id.kind() == Some("host");

            let mut providers = Vec::new();
            if k8s || (host && !azure) {
                providers.push(Provider::Kubernetes);
            }
            if azure {
                providers.push(Provider::Azure);
            }
            providers
        }
    }
}

/// Validate the configuration of one role against one provider.
///
/// # Errors
///
/// The first configuration violation of the role.
pub fn validate_role_for(
    record: &RoleRecord,
    provider: Provider,
    service_id: &str,
    config: &ResourceRestrictionsConfig,
) -> Result<(), ResourceRestrictionsError> {
    match provider {
        Provider::Kubernetes => {
            let role =
                K8sRoleRestrictions::new(record.id.as_str(), &record.annotations, service_id);
            kubernetes::validate_configuration(&role, &config.kubernetes).map(|_| ())
        }
        Provider::Azure => {
            let role = AzureRoleRestrictions::new(&record.annotations, service_id);
            azure::validate_configuration(&role).map(|_| ())
        }
    }
}

/// Validate every role of a policy file.
///
/// Returns the errors found and the number of roles checked.
#[must_use]
pub fn validate_file(
    path: &Path,
    service_id: &str,
    selection: ProviderSelection,
    config: &ResourceRestrictionsConfig,
) -> (Vec<PolicyError>, usize) {
    let policy = match load_policy(path) {
        Ok(policy) => policy,
        Err(e) => {
            let error = format!("{e:#}");
            tracing::warn!(path = %path.display(), %error, "Could not load policy file");
            return (
                vec![PolicyError {
                    file: path.to_path_buf(),
                    role_id: None,
                    provider: None,
                    error,
                }],
                0,
            );
        }
    };

    let mut errors = Vec::new();
    for record in &policy.roles {
        for provider in providers_for(record, selection) {
            if let Err(e) = validate_role_for(record, provider, service_id, config) {
                errors.push(PolicyError {
                    file: path.to_path_buf(),
                    role_id: Some(record.id.to_string()),
                    provider: Some(provider),
                    error: e.to_string(),
                });
            }
        }
    }
    tracing::debug!(
        path = %path.display(),
        roles = policy.roles.len(),
        failures = errors.len(),
        "Validated policy file"
    );
    (errors, policy.roles.len())
}
