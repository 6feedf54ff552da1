//! Local (in-process) client for resource restrictions.

use std::sync::Arc;

use async_trait::async_trait;
use resource_restrictions_sdk::{
    AzureAuthnRequest, K8sApplicationIdentity, K8sAuthnRequest, ResourceRestrictionsClient,
    ResourceRestrictionsError,
};

use super::{DomainError, Service};

/// Local client wrapping the service.
pub struct ResourceRestrictionsLocalClient {
    svc: Arc<Service>,
}

impl ResourceRestrictionsLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> ResourceRestrictionsError {
    match &e {
        DomainError::Restriction(_) | DomainError::RoleNotFound { .. } => {
            tracing::debug!(
                operation = op,
                error = %e,
                "request rejected by resource restrictions"
            );
        }
        DomainError::RoleStoreUnavailable(_) | DomainError::Internal(_) => {
            tracing::error!(operation = op, error = ?e, "resource_restrictions call failed");
        }
    }
    e.into()
}

#[async_trait]
impl ResourceRestrictionsClient for ResourceRestrictionsLocalClient {
    async fn validate_azure_request(
        &self,
        request: &AzureAuthnRequest,
    ) -> Result<(), ResourceRestrictionsError> {
        self.svc
            .validate_azure_request(request)
            .await
            .map_err(|e| log_and_convert("validate_azure_request", e))
    }

    async fn validate_k8s_request(
        &self,
        request: &K8sAuthnRequest,
    ) -> Result<K8sApplicationIdentity, ResourceRestrictionsError> {
        self.svc
            .validate_k8s_request(request)
            .await
            .map_err(|e| log_and_convert("validate_k8s_request", e))
    }
}
