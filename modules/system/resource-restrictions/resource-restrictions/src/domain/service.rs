//! Domain service for resource restrictions.
//!
//! Runs the full pipeline for one authentication attempt: fetch the role's
//! annotations, validate them, then match them against the request.

use std::sync::Arc;

use resource_restrictions_sdk::{
    Annotation, AzureAuthnRequest, K8sApplicationIdentity, K8sAuthnRequest, RoleId, RoleStore,
};
use tracing::debug;

use super::azure::{self, AzureRoleRestrictions};
use super::error::DomainError;
use super::kubernetes::{self, K8sRoleRestrictions};
use crate::config::ResourceRestrictionsConfig;

/// Resource restrictions service.
pub struct Service {
    role_store: Arc<dyn RoleStore>,
    config: ResourceRestrictionsConfig,
}

impl Service {
    #[must_use]
    pub fn new(role_store: Arc<dyn RoleStore>, config: ResourceRestrictionsConfig) -> Self {
        Self { role_store, config }
    }

    async fn role_annotations(&self, role_id: &RoleId) -> Result<Vec<Annotation>, DomainError> {
        self.role_store
            .role_annotations(role_id)
            .await
            .map_err(DomainError::from_store)?
            .ok_or_else(|| DomainError::RoleNotFound {
                role_id: role_id.to_string(),
            })
    }

    /// Validate an Azure request against its role.
    ///
    /// # Errors
    ///
    /// - `RoleNotFound` if the role does not exist
    /// - Role store errors
    /// - Configuration, claim and match errors as [`DomainError::Restriction`]
    #[tracing::instrument(
        skip_all,
        fields(role_id = tracing::field::Empty, service_id = %request.service_id)
    )]
    pub async fn validate_azure_request(
        &self,
        request: &AzureAuthnRequest,
    ) -> Result<(), DomainError> {
        let role_id = request.role_id();
        tracing::Span::current().record("role_id", role_id.as_str());

        let annotations = self.role_annotations(&role_id).await?;
        let role = AzureRoleRestrictions::new(&annotations, &request.service_id);

        let declared = azure::validate_configuration(&role)?;
        azure::authorize_spec(&declared, &request.claims)?;

        debug!("azure request satisfies resource restrictions");
        Ok(())
    }

    /// Validate a Kubernetes request against its host.
    ///
    /// # Errors
    ///
    /// - `RoleNotFound` if the host does not exist
    /// - Role store errors
    /// - Configuration and match errors as [`DomainError::Restriction`]
    #[tracing::instrument(
        skip_all,
        fields(role_id = tracing::field::Empty, service_id = %request.service_id)
    )]
    pub async fn validate_k8s_request(
        &self,
        request: &K8sAuthnRequest,
    ) -> Result<K8sApplicationIdentity, DomainError> {
        let role_id = request.role_id();
        tracing::Span::current().record("role_id", role_id.as_str());

        let annotations = self.role_annotations(&role_id).await?;
        let role = K8sRoleRestrictions::new(role_id.as_str(), &annotations, &request.service_id);

        let identity = kubernetes::validate_configuration(&role, &self.config.kubernetes)?;
        kubernetes::authorize_identity(&identity, &request.pod)?;

        debug!(
            container_name = identity.container_name(),
            "kubernetes request satisfies resource restrictions"
        );
        Ok(identity)
    }
}
