//! Domain errors for the resource restrictions service.

use resource_restrictions_sdk::ResourceRestrictionsError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("role '{role_id}' not found")]
    RoleNotFound { role_id: String },

    #[error("role store is not available: {0}")]
    RoleStoreUnavailable(String),

    #[error(transparent)]
    Restriction(#[from] ResourceRestrictionsError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Maps a failure reported by the role store collaborator.
    #[must_use]
    pub fn from_store(e: ResourceRestrictionsError) -> Self {
        match e {
            ResourceRestrictionsError::ServiceUnavailable(msg) => Self::RoleStoreUnavailable(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<DomainError> for ResourceRestrictionsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::RoleNotFound { role_id } => Self::RoleNotFound(role_id),
            DomainError::RoleStoreUnavailable(msg) => Self::ServiceUnavailable(msg),
            DomainError::Restriction(inner) => inner,
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
