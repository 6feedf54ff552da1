//! Service implementation for the static role store plugin.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use resource_restrictions_sdk::{Annotation, RoleId};

use crate::config::StaticRoleStoreConfig;

/// Static role store.
///
/// Indexes the configured roles by id once; lookups never fail.
#[derive(Debug, Default)]
pub struct StaticRoleStore {
    roles: HashMap<RoleId, Vec<Annotation>>,
}

impl StaticRoleStore {
    /// Create a store from plugin configuration.
    ///
    /// When two records share an id the first one is kept.
    #[must_use]
    pub fn from_config(cfg: &StaticRoleStoreConfig) -> Self {
        let mut roles = HashMap::with_capacity(cfg.roles.len());
        for record in &cfg.roles {
            match roles.entry(record.id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(record.annotations.clone());
                }
                Entry::Occupied(_) => {
                    tracing::warn!(
                        role_id = %record.id,
                        "Duplicate role in static role store, keeping the first"
                    );
                }
            }
        }
        tracing::debug!(role_count = roles.len(), "Static role store initialized");
        Self { roles }
    }

    /// Annotations of a role, if the role is configured.
    #[must_use]
    pub fn get(&self, role_id: &RoleId) -> Option<&[Annotation]> {
        self.roles.get(role_id).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
