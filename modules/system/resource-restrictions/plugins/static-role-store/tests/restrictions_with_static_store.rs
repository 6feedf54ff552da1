#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use resource_restrictions::{ResourceRestrictionsConfig, ResourceRestrictionsLocalClient, Service};
use resource_restrictions_sdk::{
    K8sAuthnRequest, K8sPodIdentity, ResourceRestrictionsClient, ResourceRestrictionsError,
};
use static_role_store::{StaticRoleStore, StaticRoleStoreConfig};

fn client(yaml_like: serde_json::Value) -> ResourceRestrictionsLocalClient {
    let cfg: StaticRoleStoreConfig = serde_json::from_value(yaml_like).unwrap();
    let store = StaticRoleStore::from_config(&cfg);
    let svc = Service::new(Arc::new(store), ResourceRestrictionsConfig::default());
    ResourceRestrictionsLocalClient::new(Arc::new(svc))
}

fn request(username: &str, pod: K8sPodIdentity) -> K8sAuthnRequest {
    K8sAuthnRequest {
        account: "acct".to_owned(),
        service_id: "prod".to_owned(),
        username: username.to_owned(),
        pod,
    }
}

#[tokio::test]
async fn static_store_drives_kubernetes_validation() {
    let client = client(serde_json::json!({
        "roles": [
            { "id": "acct:host:apps/ns1/service-account/sa1" },
            {
                "id": "acct:host:billing",
                "annotations": [
                    { "name": "authn-k8s/namespace", "value": "billing" },
                    { "name": "authn-k8s/stateful-set", "value": "ledger" },
                ]
            }
        ]
    }));

    let identity = client
        .validate_k8s_request(&request(
            "host/apps/ns1/service-account/sa1",
            K8sPodIdentity::new("ns1", "sa1", "p1"),
        ))
        .await
        .unwrap();
    assert_eq!(identity.namespace(), Some("ns1"));

    let err = client
        .validate_k8s_request(&request(
            "host/billing",
            K8sPodIdentity::new("billing", "default", "ledger-0").with_deployment("ledger"),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ResourceRestrictionsError::InvalidResourceRestrictions("stateful-set".to_owned())
    );

    let err = client
        .validate_k8s_request(&request("host/unknown", K8sPodIdentity::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceRestrictionsError::RoleNotFound(_)));
}
