//! Constraint kinds understood by each provider.
//!
//! Every provider owns a closed set of resource kinds. Each kind maps to a
//! static [`KindInfo`] entry holding its annotation spelling and the
//! [`ConstraintGroup`] that drives required-constraint and mutual-exclusion
//! validation, so no caller ever converts between dash and underscore
//! spellings by hand.

use std::fmt;

/// How a constraint kind takes part in configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintGroup {
    /// Must be declared by every role.
    Required,
    /// May be declared alongside any other constraint.
    Optional,
    /// At most one kind of this group may be declared by a role.
    Exclusive,
}

/// Static description of a single constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// Dash-separated spelling used in annotations (`service-account`).
    pub annotation: &'static str,
    /// Underscore spelling accepted in legacy host identifiers (`service_account`).
    pub legacy: &'static str,
    pub group: ConstraintGroup,
}

/// A provider-scoped, closed set of constraint kinds.
///
/// `Ord` must follow declaration order: identity specs iterate their
/// resources in that order, which makes matching deterministic.
pub trait ResourceKind: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Annotation namespace of the provider, without trailing slash.
    const PROVIDER_PREFIX: &'static str;

    /// Every kind, in resolution and matching order.
    const ALL: &'static [Self];

    /// Static table entry for this kind.
    fn info(self) -> KindInfo;

    /// Dash-separated annotation spelling.
    #[must_use]
    fn annotation_name(self) -> &'static str {
        self.info().annotation
    }

    #[must_use]
    fn group(self) -> ConstraintGroup {
        self.info().group
    }

    /// Looks up a kind by its annotation spelling.
    #[must_use]
    fn from_annotation_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.annotation_name() == name)
    }

    /// Kinds belonging to `group`, in declaration order.
    fn in_group(group: ConstraintGroup) -> impl Iterator<Item = Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |kind| kind.group() == group)
    }
}

/// Kubernetes resources a host can be restricted to.
///
/// `Namespace` is always required. `Deployment`, `DeploymentConfig` and
/// `StatefulSet` are controllers and mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum K8sResourceKind {
    Namespace,
    ServiceAccount,
    Pod,
    Deployment,
    DeploymentConfig,
    StatefulSet,
}

impl K8sResourceKind {
    /// Looks up a kind by its dash or underscore spelling.
    #[must_use]
    pub fn from_any_spelling(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.annotation_name() == name || kind.info().legacy == name)
    }

    /// Whether this kind narrows a namespace to a workload.
    #[must_use]
    pub fn is_controller(self) -> bool {
        self != Self::Namespace
    }
}

impl ResourceKind for K8sResourceKind {
    const PROVIDER_PREFIX: &'static str = "authn-k8s";

    const ALL: &'static [Self] = &[
        Self::Namespace,
        Self::ServiceAccount,
        Self::Pod,
        Self::Deployment,
        Self::DeploymentConfig,
        Self::StatefulSet,
    ];

    fn info(self) -> KindInfo {
        match self {
            Self::Namespace => KindInfo {
                annotation: "namespace",
                legacy: "namespace",
                group: ConstraintGroup::Required,
            },
            Self::ServiceAccount => KindInfo {
                annotation: "service-account",
                legacy: "service_account",
                group: ConstraintGroup::Optional,
            },
            Self::Pod => KindInfo {
                annotation: "pod",
                legacy: "pod",
                group: ConstraintGroup::Optional,
            },
            Self::Deployment => KindInfo {
                annotation: "deployment",
                legacy: "deployment",
                group: ConstraintGroup::Exclusive,
            },
            Self::DeploymentConfig => KindInfo {
                annotation: "deployment-config",
                legacy: "deployment_config",
                group: ConstraintGroup::Exclusive,
            },
            Self::StatefulSet => KindInfo {
                annotation: "stateful-set",
                legacy: "stateful_set",
                group: ConstraintGroup::Exclusive,
            },
        }
    }
}

impl fmt::Display for K8sResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.annotation_name())
    }
}

/// Azure resources a host can be restricted to.
///
/// Subscription and resource group are required; the two identity kinds
/// are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AzureResourceKind {
    SubscriptionId,
    ResourceGroup,
    UserAssignedIdentity,
    SystemAssignedIdentity,
}

impl ResourceKind for AzureResourceKind {
    const PROVIDER_PREFIX: &'static str = "authn-azure";

    const ALL: &'static [Self] = &[
        Self::SubscriptionId,
        Self::ResourceGroup,
        Self::UserAssignedIdentity,
        Self::SystemAssignedIdentity,
    ];

    fn info(self) -> KindInfo {
        match self {
            Self::SubscriptionId => KindInfo {
                annotation: "subscription-id",
                legacy: "subscription_id",
                group: ConstraintGroup::Required,
            },
            Self::ResourceGroup => KindInfo {
                annotation: "resource-group",
                legacy: "resource_group",
                group: ConstraintGroup::Required,
            },
            Self::UserAssignedIdentity => KindInfo {
                annotation: "user-assigned-identity",
                legacy: "user_assigned_identity",
                group: ConstraintGroup::Exclusive,
            },
            Self::SystemAssignedIdentity => KindInfo {
                annotation: "system-assigned-identity",
                legacy: "system_assigned_identity",
                group: ConstraintGroup::Exclusive,
            },
        }
    }
}

impl fmt::Display for AzureResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.annotation_name())
    }
}
