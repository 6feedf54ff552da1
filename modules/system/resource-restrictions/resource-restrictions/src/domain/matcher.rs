//! Comparison of declared constraints against runtime claims.

use resource_restrictions_sdk::{
    IdentitySpec, ResourceKind, ResourceRestrictionsError, RuntimeClaims,
};
use tracing::debug;

/// Every declared constraint must be observed with an equal value.
///
/// Declared constraints are checked in kind order and the first mismatch
/// is reported. A kind the request does not present at all is a mismatch.
///
/// # Errors
///
/// `InvalidResourceRestrictions` naming the first unmatched kind.
pub fn match_resources<K: ResourceKind>(
    declared: &IdentitySpec<K>,
    observed: &RuntimeClaims<K>,
) -> Result<(), ResourceRestrictionsError> {
    for (kind, expected) in declared.iter() {
        if observed.get(kind) != Some(expected) {
            debug!(resource = %kind, "resource restriction not met by request");
            return Err(ResourceRestrictionsError::InvalidResourceRestrictions(
                kind.annotation_name().to_owned(),
            ));
        }
    }
    debug!("validated resource restrictions");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use resource_restrictions_sdk::{K8sResourceKind, ResourceSpec};

    fn set(pairs: &[(K8sResourceKind, &str)]) -> IdentitySpec<K8sResourceKind> {
        pairs
            .iter()
            .map(|(kind, value)| ResourceSpec::new(*kind, *value))
            .collect()
    }

    #[test]
    fn identical_sets_match() {
        let declared = set(&[
            (K8sResourceKind::Namespace, "ns1"),
            (K8sResourceKind::Pod, "p1"),
        ]);
        assert!(match_resources(&declared, &declared.clone()).is_ok());
    }

    #[test]
    fn extra_observed_resources_are_ignored() {
        let declared = set(&[(K8sResourceKind::Namespace, "ns1")]);
        let observed = set(&[
            (K8sResourceKind::Namespace, "ns1"),
            (K8sResourceKind::ServiceAccount, "sa"),
        ]);
        assert!(match_resources(&declared, &observed).is_ok());
    }

    #[test]
    fn first_mismatch_in_kind_order_is_reported() {
        let declared = set(&[
            (K8sResourceKind::Namespace, "ns1"),
            (K8sResourceKind::ServiceAccount, "sa1"),
            (K8sResourceKind::Pod, "p1"),
        ]);
        let observed = set(&[
            (K8sResourceKind::Namespace, "ns1"),
            (K8sResourceKind::ServiceAccount, "other"),
            (K8sResourceKind::Pod, "p2"),
        ]);

        assert_eq!(
            match_resources(&declared, &observed).unwrap_err(),
            ResourceRestrictionsError::InvalidResourceRestrictions("service-account".to_owned())
        );
    }

    #[test]
    fn missing_observed_kind_is_a_mismatch() {
        let declared = set(&[
            (K8sResourceKind::Namespace, "ns1"),
            (K8sResourceKind::Deployment, "web"),
        ]);
        let observed = set(&[(K8sResourceKind::Namespace, "ns1")]);

        assert_eq!(
            match_resources(&declared, &observed).unwrap_err(),
            ResourceRestrictionsError::InvalidResourceRestrictions("deployment".to_owned())
        );
    }
}
