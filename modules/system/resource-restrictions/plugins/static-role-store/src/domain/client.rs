//! Client implementation for the static role store plugin.
//!
//! Implements `RoleStore` using the domain service.

use async_trait::async_trait;
use resource_restrictions_sdk::{Annotation, ResourceRestrictionsError, RoleId, RoleStore};

use super::service::StaticRoleStore;

#[async_trait]
impl RoleStore for StaticRoleStore {
    async fn role_annotations(
        &self,
        role_id: &RoleId,
    ) -> Result<Option<Vec<Annotation>>, ResourceRestrictionsError> {
        Ok(self.get(role_id).map(<[Annotation]>::to_vec))
    }
}
