//! Kubernetes resource restrictions.
//!
//! A role declares its restrictions either through `authn-k8s/` annotations
//! or, when it has none, through the trailing segments of its host id.

pub mod host_id;

use resource_restrictions_sdk::{
    Annotation, IdentitySpec, K8sApplicationIdentity, K8sPodIdentity, K8sResourceKind,
    ResourceKind, ResourceRestrictionsError, ResourceSpec, RuntimeClaims,
};
use tracing::debug;

use super::annotations::AnnotationIndex;
use super::matcher::match_resources;
use super::rules::CONTAINER_NAME_ANNOTATION;
use super::validation::{validate_permitted_scope, validate_spec};
use crate::config::KubernetesConfig;

pub use host_id::HostIdentifier;

/// The declared side of one Kubernetes authentication attempt.
#[derive(Debug, Clone, Copy)]
pub struct K8sRoleRestrictions<'a> {
    /// Role id, read positionally when no annotation declares restrictions.
    pub host_id: &'a str,
    pub annotations: &'a [Annotation],
    pub service_id: &'a str,
}

impl<'a> K8sRoleRestrictions<'a> {
    #[must_use]
    pub fn new(host_id: &'a str, annotations: &'a [Annotation], service_id: &'a str) -> Self {
        Self {
            host_id,
            annotations,
            service_id,
        }
    }
}

/// Builds the application identity a role declares, without validating it.
///
/// # Errors
///
/// Host id parse errors when the role declares no `authn-k8s/` annotation.
pub fn build_application_identity(
    role: &K8sRoleRestrictions<'_>,
    config: &KubernetesConfig,
) -> Result<K8sApplicationIdentity, ResourceRestrictionsError> {
    build_from_index(&AnnotationIndex::new(role.annotations), role, config)
}

fn build_from_index(
    index: &AnnotationIndex<'_>,
    role: &K8sRoleRestrictions<'_>,
    config: &KubernetesConfig,
) -> Result<K8sApplicationIdentity, ResourceRestrictionsError> {
    let spec = if index.has_prefix(K8sResourceKind::PROVIDER_PREFIX) {
        debug!("reading resource restrictions from annotations");
        index.identity_spec(role.service_id)
    } else {
        debug!("reading resource restrictions from host id");
        HostIdentifier::parse(role.host_id, config.accept_underscored_host_segments)?.to_spec()
    };

    let container_name = index
        .resolve(
            K8sResourceKind::PROVIDER_PREFIX,
            role.service_id,
            CONTAINER_NAME_ANNOTATION,
        )
        .or_else(|| index.get(&config.legacy_container_annotation))
        .unwrap_or(config.default_container_name.as_str());

    Ok(K8sApplicationIdentity::new(spec, container_name))
}

/// Checks that a role's restrictions are well formed and returns the
/// identity they declare.
///
/// # Errors
///
/// - `ScopeNotSupported` for an unknown constraint annotation or host id type
/// - `InvalidHostId` for a malformed host id
/// - `MissingNamespaceConstraint` when no namespace is declared
/// - `IllegalConstraintCombinations` when several controllers are declared
#[tracing::instrument(skip_all, fields(host_id = role.host_id, service_id = role.service_id))]
pub fn validate_configuration(
    role: &K8sRoleRestrictions<'_>,
    config: &KubernetesConfig,
) -> Result<K8sApplicationIdentity, ResourceRestrictionsError> {
    let index = AnnotationIndex::new(role.annotations);
    validate_permitted_scope::<K8sResourceKind>(&index, role.service_id)?;

    let identity = build_from_index(&index, role, config)?;
    validate_spec(identity.spec())?;

    debug!(
        namespace_scoped = identity.namespace_scoped(),
        "validated kubernetes resource restrictions configuration"
    );
    Ok(identity)
}

/// Resources observed for the authenticating pod.
#[must_use]
pub fn runtime_claims(pod: &K8sPodIdentity) -> RuntimeClaims<K8sResourceKind> {
    [
        (K8sResourceKind::Namespace, Some(pod.namespace.as_str())),
        (
            K8sResourceKind::ServiceAccount,
            Some(pod.service_account.as_str()),
        ),
        (K8sResourceKind::Pod, Some(pod.pod.as_str())),
        (K8sResourceKind::Deployment, pod.deployment.as_deref()),
        (
            K8sResourceKind::DeploymentConfig,
            pod.deployment_config.as_deref(),
        ),
        (K8sResourceKind::StatefulSet, pod.stateful_set.as_deref()),
    ]
    .into_iter()
    .filter_map(|(kind, value)| {
        value
            .filter(|value| !value.is_empty())
            .map(|value| ResourceSpec::new(kind, value))
    })
    .collect()
}

/// Matches an already validated identity against the pod.
///
/// # Errors
///
/// `InvalidResourceRestrictions` naming the first unmatched constraint.
pub fn authorize_identity(
    identity: &K8sApplicationIdentity,
    pod: &K8sPodIdentity,
) -> Result<(), ResourceRestrictionsError> {
    authorize_spec(identity.spec(), pod)
}

/// Matches a declared spec against the pod.
///
/// # Errors
///
/// `InvalidResourceRestrictions` naming the first unmatched constraint.
pub fn authorize_spec(
    declared: &IdentitySpec<K8sResourceKind>,
    pod: &K8sPodIdentity,
) -> Result<(), ResourceRestrictionsError> {
    match_resources(declared, &runtime_claims(pod))
}

/// Builds the identity a role declares and matches it against the pod.
///
/// # Errors
///
/// Host id parse errors, or `InvalidResourceRestrictions` naming the first
/// unmatched constraint.
#[tracing::instrument(skip_all, fields(host_id = role.host_id, service_id = role.service_id))]
pub fn authorize(
    role: &K8sRoleRestrictions<'_>,
    config: &KubernetesConfig,
    pod: &K8sPodIdentity,
) -> Result<K8sApplicationIdentity, ResourceRestrictionsError> {
    let identity = build_application_identity(role, config)?;
    authorize_identity(&identity, pod)?;
    Ok(identity)
}
