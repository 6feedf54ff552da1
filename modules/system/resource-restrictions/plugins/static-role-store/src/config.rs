//! Configuration for the static role store plugin.

use resource_restrictions_sdk::RoleRecord;
use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticRoleStoreConfig {
    /// Roles served by the store, looked up by id.
    pub roles: Vec<RoleRecord>,
}
