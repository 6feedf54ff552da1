//! Hierarchical lookup over a role's annotations.
//!
//! Constraint annotations live under a provider prefix, optionally narrowed
//! to one authenticator service:
//!
//! ```text
//! <prefix>/<service-id>/<constraint>   service-specific, wins
//! <prefix>/<constraint>                generic fallback
//! ```

use std::collections::HashMap;

use resource_restrictions_sdk::{Annotation, IdentitySpec, ResourceKind, ResourceSpec};
use tracing::debug;

/// Name-indexed view over an annotation list, built once per request.
///
/// When the list holds the same name twice, the first entry wins.
#[derive(Debug)]
pub struct AnnotationIndex<'a> {
    annotations: &'a [Annotation],
    by_name: HashMap<&'a str, &'a str>,
}

impl<'a> AnnotationIndex<'a> {
    #[must_use]
    pub fn new(annotations: &'a [Annotation]) -> Self {
        let mut by_name = HashMap::with_capacity(annotations.len());
        for annotation in annotations {
            by_name
                .entry(annotation.name.as_str())
                .or_insert(annotation.value.as_str());
        }
        Self {
            annotations,
            by_name,
        }
    }

    /// Value of the annotation named exactly `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let value = self.by_name.get(name).copied();
        if value.is_some() {
            debug!(annotation = name, "retrieved annotation value");
        }
        value
    }

    /// Resolves `base_name` under `prefix`, preferring the `service_id`
    /// specific annotation over the generic one.
    #[must_use]
    pub fn resolve(&self, prefix: &str, service_id: &str, base_name: &str) -> Option<&'a str> {
        let service_specific = if service_id.is_empty() {
            None
        } else {
            self.get(&format!("{prefix}/{service_id}/{base_name}"))
        };
        service_specific.or_else(|| self.get(&format!("{prefix}/{base_name}")))
    }

    /// Builds the identity spec a role declares through annotations under
    /// the provider prefix of `K`.
    #[must_use]
    pub fn identity_spec<K: ResourceKind>(&self, service_id: &str) -> IdentitySpec<K> {
        K::ALL
            .iter()
            .filter_map(|&kind| {
                self.resolve(K::PROVIDER_PREFIX, service_id, kind.annotation_name())
                    .map(|value| ResourceSpec::new(kind, value))
            })
            .collect()
    }

    /// Whether any annotation lives under `<prefix>/`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        let prefix = format!("{prefix}/");
        self.annotations
            .iter()
            .any(|annotation| annotation.name.starts_with(&prefix))
    }

    /// Base names of the annotations exactly one level below `prefix`,
    /// in list order. `prefix` must end with a slash. A single trailing slash
    /// on the base name does not add a level.
    pub fn names_one_level_below<'s>(
        &'s self,
        prefix: &'s str,
    ) -> impl Iterator<Item = &'a str> + 's {
        self.annotations.iter().filter_map(move |annotation| {
            let base = annotation.name.strip_prefix(prefix)?;
            let base = base.strip_suffix('/').unwrap_or(base);
            (!base.is_empty() && !base.contains('/')).then_some(base)
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn annotations(pairs: &[(&str, &str)]) -> Vec<Annotation> {
        pairs
            .iter()
            .map(|(name, value)| Annotation::new(*name, *value))
            .collect()
    }

    #[test]
    fn service_specific_annotation_overrides_generic() {
        let list = annotations(&[
            ("authn-k8s/namespace", "generic-ns"),
            ("authn-k8s/prod/namespace", "prod-ns"),
        ]);
        let index = AnnotationIndex::new(&list);

        assert_eq!(
            index.resolve("authn-k8s", "prod", "namespace"),
            Some("prod-ns")
        );
        assert_eq!(
            index.resolve("authn-k8s", "staging", "namespace"),
            Some("generic-ns")
        );
        assert_eq!(index.resolve("authn-k8s", "prod", "pod"), None);
    }

    #[test]
    fn identity_spec_resolves_every_declared_kind() {
        use resource_restrictions_sdk::AzureResourceKind;

        let list = annotations(&[
            ("authn-azure/subscription-id", "sub"),
            ("authn-azure/prod/resource-group", "rg-prod"),
            ("authn-azure/resource-group", "rg"),
            ("authn-k8s/namespace", "ignored"),
        ]);
        let index = AnnotationIndex::new(&list);

        let spec: IdentitySpec<AzureResourceKind> = index.identity_spec("prod");
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get(AzureResourceKind::SubscriptionId), Some("sub"));
        assert_eq!(spec.get(AzureResourceKind::ResourceGroup), Some("rg-prod"));
    }

    #[test]
    fn first_duplicate_wins() {
        let list = annotations(&[
            ("authn-azure/resource-group", "a"),
            ("authn-azure/resource-group", "b"),
        ]);
        let index = AnnotationIndex::new(&list);
        assert_eq!(index.get("authn-azure/resource-group"), Some("a"));
    }

    #[test]
    fn one_level_below_skips_deeper_and_foreign_names() {
        let list = annotations(&[
            ("authn-k8s/namespace", "ns"),
            ("authn-k8s/prod/pod", "p"),
            ("authn-k8s/", "empty"),
            ("kubernetes/authentication-container-name", "c"),
            ("description", "d"),
        ]);
        let index = AnnotationIndex::new(&list);

        let generic: Vec<_> = index.names_one_level_below("authn-k8s/").collect();
        assert_eq!(generic, vec!["namespace"]);

        let scoped: Vec<_> = index.names_one_level_below("authn-k8s/prod/").collect();
        assert_eq!(scoped, vec!["pod"]);
    }

    #[test]
    fn trailing_slash_stays_at_the_same_level() {
        let list = annotations(&[
            ("authn-k8s/bogus/", "x"),
            ("authn-k8s//", "x"),
            ("authn-k8s/prod/pod/", "p"),
            ("authn-k8s/prod/pod//", "p"),
        ]);
        let index = AnnotationIndex::new(&list);

        let generic: Vec<_> = index.names_one_level_below("authn-k8s/").collect();
        assert_eq!(generic, vec!["bogus"]);

        let scoped: Vec<_> = index.names_one_level_below("authn-k8s/prod/").collect();
        assert_eq!(scoped, vec!["pod"]);
    }

    #[test]
    fn has_prefix_requires_the_slash() {
        let list = annotations(&[("authn-k8sfoo", "x")]);
        let index = AnnotationIndex::new(&list);
        assert!(!index.has_prefix("authn-k8s"));
    }

    #[test]
    #[traced_test]
    fn resolution_is_traced() {
        let list = annotations(&[("authn-azure/subscription-id", "sub")]);
        let index = AnnotationIndex::new(&list);
        let _ = index.resolve("authn-azure", "svc", "subscription-id");
        assert!(logs_contain("retrieved annotation value"));
    }
}
