//! Error types for the resource restrictions module.

use thiserror::Error;

/// Errors that can occur when validating or enforcing resource restrictions.
///
/// Every variant is terminal for the authentication attempt that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceRestrictionsError {
    /// A Kubernetes annotation or host id names a constraint outside the permitted set.
    #[error(
        "resource type '{constraint}' is not a supported Kubernetes constraint, permitted: {}",
        .permitted.join(", ")
    )]
    ScopeNotSupported {
        constraint: String,
        permitted: &'static [&'static str],
    },

    /// An Azure annotation names a constraint outside the permitted set.
    #[error(
        "constraint '{constraint}' is not supported, permitted: {}",
        .permitted.join(", ")
    )]
    ConstraintNotSupported {
        constraint: String,
        permitted: &'static [&'static str],
    },

    /// A Kubernetes role declares no namespace.
    #[error("role must declare a 'namespace' constraint")]
    MissingNamespaceConstraint,

    /// An Azure role is missing a required constraint.
    #[error("role is missing required constraint '{0}'")]
    RoleMissingConstraint(String),

    /// Two or more mutually exclusive constraints are declared together.
    #[error("illegal constraint combination: {}", .0.join(", "))]
    IllegalConstraintCombinations(Vec<String>),

    /// The host identifier does not end in `<namespace>/<type>/<value>`.
    #[error("invalid host id '{0}'")]
    InvalidHostId(String),

    /// The `xms_mirid` claim does not follow the Azure resource path format.
    #[error("failed to parse xms_mirid '{claim}': {reason}")]
    XmsMiridParseError { claim: String, reason: String },

    /// The `xms_mirid` claim has an incomplete `providers` section.
    #[error("xms_mirid '{0}' is missing provider fields")]
    MissingProviderFieldsInXmsMirid(String),

    /// A required token claim is absent or empty.
    #[error("token field '{0}' not found or empty")]
    TokenFieldNotFoundOrEmpty(String),

    /// A declared constraint does not match what the request presented.
    #[error("resource restriction '{0}' does not match the request")]
    InvalidResourceRestrictions(String),

    /// The role-storage collaborator has no record of the role.
    #[error("role '{0}' not found")]
    RoleNotFound(String),

    /// A collaborator is not ready to serve requests.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResourceRestrictionsError {
    /// Whether the error comes from the role's own configuration rather
    /// than from the request or a collaborator.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ScopeNotSupported { .. }
                | Self::ConstraintNotSupported { .. }
                | Self::MissingNamespaceConstraint
                | Self::RoleMissingConstraint(_)
                | Self::IllegalConstraintCombinations(_)
                | Self::InvalidHostId(_)
        )
    }
}
