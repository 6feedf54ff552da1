//! Configuration validation shared by both providers.
//!
//! Checks run in a fixed order and stop at the first violation:
//! permitted scope, required constraints, then exclusive combinations.

use resource_restrictions_sdk::{
    ConstraintGroup, IdentitySpec, ResourceKind, ResourceRestrictionsError,
};
use tracing::debug;

use super::annotations::AnnotationIndex;
use super::rules::ConstraintRules;

/// Every annotation one level below `<prefix>/` or `<prefix>/<service_id>/`
/// must name a permitted constraint.
///
/// # Errors
///
/// The provider's unsupported-constraint error naming the first offender.
pub fn validate_permitted_scope<K: ConstraintRules>(
    index: &AnnotationIndex<'_>,
    service_id: &str,
) -> Result<(), ResourceRestrictionsError> {
    let mut prefixes = vec![format!("{}/", K::PROVIDER_PREFIX)];
    if !service_id.is_empty() {
        prefixes.push(format!("{}/{service_id}/", K::PROVIDER_PREFIX));
    }

    for prefix in &prefixes {
        debug!(prefix = %prefix, "validating annotations with prefix");
        if let Some(name) = index
            .names_one_level_below(prefix)
            .find(|name| !K::is_permitted(name))
        {
            return Err(K::unsupported(name));
        }
    }
    Ok(())
}

/// Every kind of the required group must be declared.
///
/// # Errors
///
/// The provider's missing-constraint error for the first absent kind.
pub fn validate_required_constraints<K: ConstraintRules>(
    spec: &IdentitySpec<K>,
) -> Result<(), ResourceRestrictionsError> {
    match K::in_group(ConstraintGroup::Required).find(|kind| !spec.contains(*kind)) {
        Some(kind) => Err(K::missing(kind)),
        None => Ok(()),
    }
}

/// At most one kind of the exclusive group may be declared.
///
/// # Errors
///
/// `IllegalConstraintCombinations` listing every declared exclusive kind.
pub fn validate_constraint_combinations<K: ResourceKind>(
    spec: &IdentitySpec<K>,
) -> Result<(), ResourceRestrictionsError> {
    let declared: Vec<String> = K::in_group(ConstraintGroup::Exclusive)
        .filter(|kind| spec.contains(*kind))
        .map(|kind| kind.annotation_name().to_owned())
        .collect();

    if declared.len() > 1 {
        return Err(ResourceRestrictionsError::IllegalConstraintCombinations(
            declared,
        ));
    }
    Ok(())
}

/// Required-constraint and combination checks over a built spec.
///
/// # Errors
///
/// The first violation found.
pub fn validate_spec<K: ConstraintRules>(
    spec: &IdentitySpec<K>,
) -> Result<(), ResourceRestrictionsError> {
    validate_required_constraints(spec)?;
    validate_constraint_combinations(spec)
}
