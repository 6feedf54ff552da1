//! Provider-specific rule tables consumed by the shared validators.

use resource_restrictions_sdk::{
    AzureResourceKind, K8sResourceKind, ResourceKind, ResourceRestrictionsError,
};

/// Base name of the annotation selecting the authenticator container.
pub const CONTAINER_NAME_ANNOTATION: &str = "authentication-container-name";

/// How one provider reports configuration violations.
pub trait ConstraintRules: ResourceKind {
    /// Every base name accepted one level below the provider prefix.
    const PERMITTED_ANNOTATIONS: &'static [&'static str];

    /// Error for an annotation outside [`Self::PERMITTED_ANNOTATIONS`].
    fn unsupported(constraint: &str) -> ResourceRestrictionsError;

    /// Error for a required kind the role does not declare.
    fn missing(kind: Self) -> ResourceRestrictionsError;

    #[must_use]
    fn is_permitted(base_name: &str) -> bool {
        Self::PERMITTED_ANNOTATIONS
            .iter()
            .any(|permitted| *permitted == base_name)
    }
}

impl ConstraintRules for K8sResourceKind {
    const PERMITTED_ANNOTATIONS: &'static [&'static str] = &[
        "namespace",
        "service-account",
        "pod",
        "deployment",
        "deployment-config",
        "stateful-set",
        CONTAINER_NAME_ANNOTATION,
    ];

    fn unsupported(constraint: &str) -> ResourceRestrictionsError {
        ResourceRestrictionsError::ScopeNotSupported {
            constraint: constraint.to_owned(),
            permitted: Self::PERMITTED_ANNOTATIONS,
        }
    }

    fn missing(_kind: Self) -> ResourceRestrictionsError {
        ResourceRestrictionsError::MissingNamespaceConstraint
    }
}

impl ConstraintRules for AzureResourceKind {
    const PERMITTED_ANNOTATIONS: &'static [&'static str] = &[
        "subscription-id",
        "resource-group",
        "user-assigned-identity",
        "system-assigned-identity",
    ];

    fn unsupported(constraint: &str) -> ResourceRestrictionsError {
        ResourceRestrictionsError::ConstraintNotSupported {
            constraint: constraint.to_owned(),
            permitted: Self::PERMITTED_ANNOTATIONS,
        }
    }

    fn missing(kind: Self) -> ResourceRestrictionsError {
        ResourceRestrictionsError::RoleMissingConstraint(kind.annotation_name().to_owned())
    }
}
