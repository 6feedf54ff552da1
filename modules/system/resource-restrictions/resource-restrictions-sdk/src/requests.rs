//! Authentication requests handed to the resource restrictions service.

use crate::claims::{AzureTokenClaims, K8sPodIdentity};
use crate::models::RoleId;

/// An Azure authentication attempt whose token has already been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureAuthnRequest {
    pub account: String,
    pub service_id: String,
    pub username: String,
    pub claims: AzureTokenClaims,
}

impl AzureAuthnRequest {
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        RoleId::from_username(&self.account, &self.username)
    }
}

/// A Kubernetes authentication attempt together with the live binding of
/// the calling pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct K8sAuthnRequest {
    pub account: String,
    pub service_id: String,
    pub username: String,
    pub pod: K8sPodIdentity,
}

impl K8sAuthnRequest {
    /// The host role id, which doubles as the host identifier.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        RoleId::from_username(&self.account, &self.username)
    }
}
