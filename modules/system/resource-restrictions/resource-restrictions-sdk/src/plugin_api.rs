//! Collaborator API for role storage.
//!
//! The restrictions service never persists anything itself. A role store
//! plugin hands it the annotations of a role for each request.

use async_trait::async_trait;

use crate::error::ResourceRestrictionsError;
use crate::models::{Annotation, RoleId};

/// Source of role annotations.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Fetch the annotations of a role.
    ///
    /// Returns `Ok(None)` when the role does not exist.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the backing store cannot be reached
    /// - `Internal` for unexpected errors
    async fn role_annotations(
        &self,
        role_id: &RoleId,
    ) -> Result<Option<Vec<Annotation>>, ResourceRestrictionsError>;
}
