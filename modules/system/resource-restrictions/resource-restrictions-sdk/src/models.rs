//! Domain models for the resource restrictions module.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kinds::{K8sResourceKind, ResourceKind};

/// A single role annotation as stored by the role-storage collaborator.
///
/// Names are slash-delimited paths such as `authn-k8s/prod/namespace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub value: String,
}

impl Annotation {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One typed resource constraint, either declared by a role or observed
/// at authentication time. Equality is by `(kind, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceSpec<K> {
    kind: K,
    value: String,
}

impl<K: ResourceKind> ResourceSpec<K> {
    #[must_use]
    pub fn new(kind: K, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> K {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A set of resource specs holding at most one value per kind.
///
/// Iteration follows the kind's declaration order. The set is built once
/// through [`FromIterator`] and never mutated afterwards; when the source
/// yields the same kind twice the later value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSet<K> {
    resources: BTreeMap<K, String>,
}

/// The constraints a role declares.
pub type IdentitySpec<K> = ResourceSet<K>;

/// The resources observed for the caller of one authentication attempt.
pub type RuntimeClaims<K> = ResourceSet<K>;

impl<K: ResourceKind> ResourceSet<K> {
    #[must_use]
    pub fn get(&self, kind: K) -> Option<&str> {
        self.resources.get(&kind).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, kind: K) -> bool {
        self.resources.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.resources.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &str)> + '_ {
        self.resources
            .iter()
            .map(|(kind, value)| (*kind, value.as_str()))
    }

    /// Owned copies of every spec, in kind order.
    #[must_use]
    pub fn to_specs(&self) -> Vec<ResourceSpec<K>> {
        self.iter()
            .map(|(kind, value)| ResourceSpec::new(kind, value))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<K: ResourceKind> Default for ResourceSet<K> {
    fn default() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }
}

impl<K: ResourceKind> FromIterator<ResourceSpec<K>> for ResourceSet<K> {
    fn from_iter<I: IntoIterator<Item = ResourceSpec<K>>>(iter: I) -> Self {
        Self {
            resources: iter
                .into_iter()
                .map(|spec| (spec.kind, spec.value))
                .collect(),
        }
    }
}

/// Fully qualified identifier of a role: `<account>:<kind>:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the role id for a login name.
    ///
    /// `host/<id>` logins map to host roles, everything else to user roles.
    #[must_use]
    pub fn from_username(account: &str, username: &str) -> Self {
        match username.strip_prefix("host/") {
            Some(host) => Self(format!("{account}:host:{host}")),
            None => Self(format!("{account}:user:{username}")),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The role kind segment (`host`, `user`, ...), if the id is qualified.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        let mut parts = self.0.splitn(3, ':');
        parts.next()?;
        let kind = parts.next()?;
        parts.next().map(|_| kind)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role together with its annotations, as held by a role store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleRecord {
    pub id: RoleId,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// The validated application identity of a Kubernetes host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct K8sApplicationIdentity {
    spec: IdentitySpec<K8sResourceKind>,
    container_name: String,
}

impl K8sApplicationIdentity {
    #[must_use]
    pub fn new(spec: IdentitySpec<K8sResourceKind>, container_name: impl Into<String>) -> Self {
        Self {
            spec,
            container_name: container_name.into(),
        }
    }

    #[must_use]
    pub fn spec(&self) -> &IdentitySpec<K8sResourceKind> {
        &self.spec
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.spec.get(K8sResourceKind::Namespace)
    }

    /// The first declared constraint narrower than the namespace, if any.
    #[must_use]
    pub fn controller(&self) -> Option<(K8sResourceKind, &str)> {
        self.spec.iter().find(|(kind, _)| kind.is_controller())
    }

    /// Name of the container the authenticator sidecar runs in.
    #[must_use]
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// True iff no constraint narrower than the namespace is declared.
    #[must_use]
    pub fn namespace_scoped(&self) -> bool {
        self.controller().is_none()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::kinds::AzureResourceKind;

    #[test]
    fn role_id_for_host_login() {
        let id = RoleId::from_username("acct", "host/apps/ns1/*/*");
        assert_eq!(id.as_str(), "acct:host:apps/ns1/*/*");
        assert_eq!(id.kind(), Some("host"));
    }

    #[test]
    fn role_id_for_user_login() {
        let id = RoleId::from_username("acct", "alice");
        assert_eq!(id.to_string(), "acct:user:alice");
        assert_eq!(id.kind(), Some("user"));
        assert_eq!(RoleId::new("unqualified").kind(), None);
    }

    #[test]
    fn resource_set_iterates_in_kind_order() {
        let set: IdentitySpec<AzureResourceKind> = [
            ResourceSpec::new(AzureResourceKind::UserAssignedIdentity, "id"),
            ResourceSpec::new(AzureResourceKind::SubscriptionId, "sub"),
            ResourceSpec::new(AzureResourceKind::ResourceGroup, "rg"),
        ]
        .into_iter()
        .collect();

        let kinds: Vec<_> = set.kinds().collect();
        assert_eq!(
            kinds,
            vec![
                AzureResourceKind::SubscriptionId,
                AzureResourceKind::ResourceGroup,
                AzureResourceKind::UserAssignedIdentity,
            ]
        );
        assert_eq!(set.get(AzureResourceKind::ResourceGroup), Some("rg"));
        assert!(!set.contains(AzureResourceKind::SystemAssignedIdentity));
    }

    #[test]
    fn resource_set_keeps_one_value_per_kind() {
        let set: IdentitySpec<K8sResourceKind> = [
            ResourceSpec::new(K8sResourceKind::Pod, "first"),
            ResourceSpec::new(K8sResourceKind::Pod, "second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get(K8sResourceKind::Pod), Some("second"));
    }

    #[test]
    fn namespace_scoped_identity_has_no_controller() {
        let spec: IdentitySpec<K8sResourceKind> =
            std::iter::once(ResourceSpec::new(K8sResourceKind::Namespace, "ns1")).collect();
        let identity = K8sApplicationIdentity::new(spec, "authenticator");

        assert!(identity.namespace_scoped());
        assert_eq!(identity.namespace(), Some("ns1"));
        assert_eq!(identity.controller(), None);
    }

    #[test]
    fn role_record_deserializes_with_default_annotations() {
        let record: RoleRecord = serde_json::from_str(r#"{"id":"acct:host:app"}"#).unwrap();
        assert_eq!(record.id, RoleId::new("acct:host:app"));
        assert!(record.annotations.is_empty());
    }
}
