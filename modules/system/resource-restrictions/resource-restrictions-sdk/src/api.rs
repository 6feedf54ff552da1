//! Public API trait for the resource restrictions module.
//!
//! The outer authenticator calls this after it has verified the caller's
//! token and before it issues any credential.

use async_trait::async_trait;

use crate::error::ResourceRestrictionsError;
use crate::models::K8sApplicationIdentity;
use crate::requests::{AzureAuthnRequest, K8sAuthnRequest};

/// Public API trait for resource restriction enforcement.
///
/// ```ignore
/// let restrictions: Arc<dyn ResourceRestrictionsClient> = ...;
///
/// restrictions.validate_azure_request(&request).await?;
/// ```
#[async_trait]
pub trait ResourceRestrictionsClient: Send + Sync {
    /// Validate an Azure request against the restrictions of its role.
    ///
    /// # Errors
    ///
    /// - `RoleNotFound` if the role store has no record for the login
    /// - any configuration error if the role's annotations are malformed
    /// - `XmsMiridParseError` / `MissingProviderFieldsInXmsMirid` for a malformed token claim
    /// - `InvalidResourceRestrictions` if a declared constraint does not match
    async fn validate_azure_request(
        &self,
        request: &AzureAuthnRequest,
    ) -> Result<(), ResourceRestrictionsError>;

    /// Validate a Kubernetes request against the restrictions of its host.
    ///
    /// Returns the host's application identity on success.
    ///
    /// # Errors
    ///
    /// - `RoleNotFound` if the role store has no record for the host
    /// - `InvalidHostId` / `ScopeNotSupported` and other configuration errors
    /// - `InvalidResourceRestrictions` if a declared constraint does not match the pod
    async fn validate_k8s_request(
        &self,
        request: &K8sAuthnRequest,
    ) -> Result<K8sApplicationIdentity, ResourceRestrictionsError>;
}
