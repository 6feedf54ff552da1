//! Positional parsing of Kubernetes host identifiers.
//!
//! Only the last three `/` segments of the host name carry meaning:
//!
//! ```text
//! <account>:<kind>:<...>/<namespace>/<constraint-type>/<constraint-value>
//! <account>:<kind>:<...>/<namespace>/*/*
//! ```

use resource_restrictions_sdk::{
    IdentitySpec, K8sResourceKind, ResourceKind, ResourceRestrictionsError, ResourceSpec,
};

/// Constraint types a host identifier may name.
pub const HOST_ID_CONSTRAINTS: &[&str] = &[
    "namespace",
    "service-account",
    "pod",
    "deployment",
    "deployment-config",
    "stateful-set",
];

const WILDCARD: &str = "*";

/// A parsed host identifier, borrowing from the role id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostIdentifier<'a> {
    namespace: &'a str,
    constraint: Option<(K8sResourceKind, &'a str)>,
}

impl<'a> HostIdentifier<'a> {
    /// Parses `host_id`. With `accept_underscored` the legacy
    /// `service_account` spelling is accepted next to `service-account`.
    ///
    /// # Errors
    ///
    /// - `InvalidHostId` if the host name has fewer than three segments, an
    ///   empty or wildcard namespace, a single wildcard, or a `namespace`
    ///   constraint that disagrees with the namespace segment
    /// - `ScopeNotSupported` if the constraint type is unknown
    pub fn parse(
        host_id: &'a str,
        accept_underscored: bool,
    ) -> Result<Self, ResourceRestrictionsError> {
        let invalid = || ResourceRestrictionsError::InvalidHostId(host_id.to_owned());

        let host_name = host_id.splitn(3, ':').last().unwrap_or(host_id);
        let segments: Vec<&str> = host_name.split('/').collect();
        let &[.., namespace, constraint_type, constraint_value] = segments.as_slice() else {
            return Err(invalid());
        };

        if namespace.is_empty() || namespace == WILDCARD {
            return Err(invalid());
        }

        match (constraint_type, constraint_value) {
            (WILDCARD, WILDCARD) => {
                return Ok(Self {
                    namespace,
                    constraint: None,
                });
            }
            (WILDCARD, _) | (_, WILDCARD) | ("", _) | (_, "") => return Err(invalid()),
            _ => {}
        }

        let lookup = if accept_underscored {
            K8sResourceKind::from_any_spelling
        } else {
            K8sResourceKind::from_annotation_name
        };
        let kind =
            lookup(constraint_type).ok_or_else(|| ResourceRestrictionsError::ScopeNotSupported {
                constraint: constraint_type.to_owned(),
                permitted: HOST_ID_CONSTRAINTS,
            })?;

        if kind == K8sResourceKind::Namespace {
            if constraint_value != namespace {
                return Err(invalid());
            }
            return Ok(Self {
                namespace,
                constraint: None,
            });
        }

        Ok(Self {
            namespace,
            constraint: Some((kind, constraint_value)),
        })
    }

    #[must_use]
    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    #[must_use]
    pub fn constraint(&self) -> Option<(K8sResourceKind, &'a str)> {
        self.constraint
    }

    #[must_use]
    pub fn namespace_scoped(&self) -> bool {
        self.constraint.is_none()
    }

    #[must_use]
    pub fn to_spec(&self) -> IdentitySpec<K8sResourceKind> {
        std::iter::once(ResourceSpec::new(K8sResourceKind::Namespace, self.namespace))
            .chain(
                self.constraint
                    .map(|(kind, value)| ResourceSpec::new(kind, value)),
            )
            .collect()
    }
}
