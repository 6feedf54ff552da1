//! Request-side inputs: verified token claims and live pod bindings.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ResourceRestrictionsError;

/// Claims of a verified Azure AD token that identify the calling resource.
///
/// `xms_mirid` holds the resource path of the issuing identity and `oid`
/// the object id of its service principal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AzureTokenClaims {
    pub xms_mirid: String,
    pub oid: String,
}

impl AzureTokenClaims {
    pub const XMS_MIRID: &'static str = "xms_mirid";
    pub const OID: &'static str = "oid";

    #[must_use]
    pub fn new(xms_mirid: impl Into<String>, oid: impl Into<String>) -> Self {
        Self {
            xms_mirid: xms_mirid.into(),
            oid: oid.into(),
        }
    }

    /// Extracts the claims from a decoded token payload.
    ///
    /// # Errors
    ///
    /// `TokenFieldNotFoundOrEmpty` if either claim is missing, not a string,
    /// or empty.
    pub fn from_claims(claims: &Value) -> Result<Self, ResourceRestrictionsError> {
        Ok(Self {
            xms_mirid: required_claim(claims, Self::XMS_MIRID)?,
            oid: required_claim(claims, Self::OID)?,
        })
    }
}

fn required_claim(claims: &Value, field: &str) -> Result<String, ResourceRestrictionsError> {
    claims
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ResourceRestrictionsError::TokenFieldNotFoundOrEmpty(field.to_owned()))
}

/// The live binding of the authenticating pod, as reported by the
/// Kubernetes API collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct K8sPodIdentity {
    pub namespace: String,
    pub service_account: String,
    pub pod: String,
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default)]
    pub deployment_config: Option<String>,
    #[serde(default)]
    pub stateful_set: Option<String>,
}

impl K8sPodIdentity {
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        service_account: impl Into<String>,
        pod: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            service_account: service_account.into(),
            pod: pod.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_deployment(mut self, name: impl Into<String>) -> Self {
        self.deployment = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_deployment_config(mut self, name: impl Into<String>) -> Self {
        self.deployment_config = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_stateful_set(mut self, name: impl Into<String>) -> Self {
        self.stateful_set = Some(name.into());
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn azure_claims_from_token_payload() {
        let claims = AzureTokenClaims::from_claims(&json!({
            "xms_mirid": "/subscriptions/s/resourcegroups/rg/providers/Microsoft.Compute/virtualMachines/vm",
            "oid": "0000-1111",
            "aud": "https://management.azure.com/",
        }))
        .unwrap();

        assert_eq!(claims.oid, "0000-1111");
        assert!(claims.xms_mirid.starts_with("/subscriptions/s"));
    }

    #[test]
    fn azure_claims_reject_missing_or_empty_fields() {
        let missing = AzureTokenClaims::from_claims(&json!({ "oid": "x" })).unwrap_err();
        assert_eq!(
            missing,
            ResourceRestrictionsError::TokenFieldNotFoundOrEmpty("xms_mirid".to_owned())
        );

        let empty =
            AzureTokenClaims::from_claims(&json!({ "xms_mirid": "/subscriptions", "oid": "" }))
                .unwrap_err();
        assert_eq!(
            empty,
            ResourceRestrictionsError::TokenFieldNotFoundOrEmpty("oid".to_owned())
        );

        let not_a_string =
            AzureTokenClaims::from_claims(&json!({ "xms_mirid": 7, "oid": "x" })).unwrap_err();
        assert!(matches!(
            not_a_string,
            ResourceRestrictionsError::TokenFieldNotFoundOrEmpty(_)
        ));
    }

    #[test]
    fn pod_identity_builder_sets_controllers() {
        let pod = K8sPodIdentity::new("ns1", "sa1", "pod-1").with_stateful_set("db");
        assert_eq!(pod.stateful_set.as_deref(), Some("db"));
        assert!(pod.deployment.is_none());
    }
}
