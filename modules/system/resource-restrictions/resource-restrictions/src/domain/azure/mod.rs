//! Azure resource restrictions.
//!
//! Roles declare restrictions through `authn-azure/` annotations only. The
//! runtime side comes from the `xms_mirid` and `oid` token claims.

pub mod xms_mirid;

use resource_restrictions_sdk::{
    Annotation, AzureResourceKind, AzureTokenClaims, IdentitySpec, ResourceRestrictionsError,
    ResourceSpec, RuntimeClaims,
};
use tracing::debug;

use super::annotations::AnnotationIndex;
use super::matcher::match_resources;
use super::validation::{validate_permitted_scope, validate_spec};

pub use xms_mirid::XmsMirid;

/// The declared side of one Azure authentication attempt.
#[derive(Debug, Clone, Copy)]
pub struct AzureRoleRestrictions<'a> {
    pub annotations: &'a [Annotation],
    pub service_id: &'a str,
}

impl<'a> AzureRoleRestrictions<'a> {
    #[must_use]
    pub fn new(annotations: &'a [Annotation], service_id: &'a str) -> Self {
        Self {
            annotations,
            service_id,
        }
    }
}

/// Builds the identity a role declares, without validating it.
#[must_use]
pub fn build_identity_spec(role: &AzureRoleRestrictions<'_>) -> IdentitySpec<AzureResourceKind> {
    AnnotationIndex::new(role.annotations).identity_spec(role.service_id)
}

/// Checks that a role's restrictions are well formed and returns the identity
/// they declare.
///
/// # Errors
///
/// - `ConstraintNotSupported` for an unknown constraint annotation
/// - `RoleMissingConstraint` when subscription or resource group is absent
/// - `IllegalConstraintCombinations` when both identity kinds are declared
#[tracing::instrument(skip_all, fields(service_id = role.service_id))]
pub fn validate_configuration(
    role: &AzureRoleRestrictions<'_>,
) -> Result<IdentitySpec<AzureResourceKind>, ResourceRestrictionsError> {
    let index = AnnotationIndex::new(role.annotations);
    validate_permitted_scope::<AzureResourceKind>(&index, role.service_id)?;

    let spec = index.identity_spec(role.service_id);
    validate_spec(&spec)?;

    debug!("validated azure resource restrictions configuration");
    Ok(spec)
}

/// Resources observed for the token's issuer.
///
/// # Errors
///
/// - `XmsMiridParseError` or `MissingProviderFieldsInXmsMirid` for a
///   malformed `xms_mirid` claim
/// - `TokenFieldNotFoundOrEmpty` when a system-assigned identity presents an
///   empty `oid`
pub fn runtime_claims(
    claims: &AzureTokenClaims,
) -> Result<RuntimeClaims<AzureResourceKind>, ResourceRestrictionsError> {
    let mirid = XmsMirid::parse(&claims.xms_mirid)?;

    let identity = match mirid.resource_name().filter(|_| mirid.is_user_assigned()) {
        Some(name) => ResourceSpec::new(AzureResourceKind::UserAssignedIdentity, name),
        None if claims.oid.is_empty() => {
            return Err(ResourceRestrictionsError::TokenFieldNotFoundOrEmpty(
                AzureTokenClaims::OID.to_owned(),
            ));
        }
        None => {
            ResourceSpec::new(AzureResourceKind::SystemAssignedIdentity, claims.oid.as_str())
        }
    };

    let observed: RuntimeClaims<AzureResourceKind> = [
        ResourceSpec::new(AzureResourceKind::SubscriptionId, mirid.subscription_id()),
        ResourceSpec::new(AzureResourceKind::ResourceGroup, mirid.resource_group()),
        identity,
    ]
    .into_iter()
    .collect();

    debug!(
        user_assigned = mirid.is_user_assigned(),
        "extracted resource restrictions from token"
    );
    Ok(observed)
}

/// Matches a declared spec against the token claims.
///
/// # Errors
///
/// Claim parse errors, or `InvalidResourceRestrictions` naming the first
/// unmatched constraint.
pub fn authorize_spec(
    declared: &IdentitySpec<AzureResourceKind>,
    claims: &AzureTokenClaims,
) -> Result<(), ResourceRestrictionsError> {
    match_resources(declared, &runtime_claims(claims)?)
}

/// Builds the identity a role declares and matches it against the token claims.
///
/// # Errors
///
/// Claim parse errors, or `InvalidResourceRestrictions` naming the first
/// unmatched constraint.
#[tracing::instrument(skip_all, fields(service_id = role.service_id))]
pub fn authorize(
    role: &AzureRoleRestrictions<'_>,
    claims: &AzureTokenClaims,
) -> Result<(), ResourceRestrictionsError> {
    authorize_spec(&build_identity_spec(role), claims)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const OID: &str = "00000000-1111-2222-3333-444444444444";

    #[test]
    fn user_assigned_identity_comes_from_the_claim_path() {
        let claims = AzureTokenClaims::new(
            "/subscriptions/sub/resourcegroups/rg/providers/Microsoft.ManagedIdentity/userAssignedIdentities/my-id",
            OID,
        );
        let observed = runtime_claims(&claims).unwrap();

        assert_eq!(
            observed.get(AzureResourceKind::UserAssignedIdentity),
            Some("my-id")
        );
        assert!(!observed.contains(AzureResourceKind::SystemAssignedIdentity));
        assert_eq!(observed.get(AzureResourceKind::SubscriptionId), Some("sub"));
        assert_eq!(observed.get(AzureResourceKind::ResourceGroup), Some("rg"));
    }

    #[test]
    fn system_assigned_identity_comes_from_the_oid() {
        let claims = AzureTokenClaims::new(
            "/subscriptions/sub/resourcegroups/rg/providers/Microsoft.Compute/virtualMachines/vm",
            OID,
        );
        let observed = runtime_claims(&claims).unwrap();

        assert_eq!(
            observed.get(AzureResourceKind::SystemAssignedIdentity),
            Some(OID)
        );
        assert!(!observed.contains(AzureResourceKind::UserAssignedIdentity));
    }

    #[test]
    fn build_ignores_unsupported_annotations() {
        let list = vec![
            Annotation::new("authn-azure/subscription-id", "sub"),
            Annotation::new("authn-azure/vm-name", "x"),
        ];
        let spec = build_identity_spec(&AzureRoleRestrictions::new(&list, "svc"));
        assert_eq!(spec.len(), 1);
    }
}
