// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP query interface tests, driven through `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sentinel_core::application::advisor::AdvisorService;
use sentinel_core::application::config_store::ConfigStore;
use sentinel_core::domain::advisor::{AdvisorError, AdvisorGateway};
use sentinel_core::domain::config::AgentConfiguration;
use sentinel_core::infrastructure::repositories::InMemoryDocumentRepository;
use sentinel_core::presentation::api;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct EchoGateway;

#[async_trait]
impl AdvisorGateway for EchoGateway {
    async fn advise(
        &self,
        utterance: &str,
        snapshot: &AgentConfiguration,
    ) -> Result<String, AdvisorError> {
        Ok(format!(
            "{} ({} services, channel {})",
            utterance,
            snapshot.services.len(),
            snapshot.notifications.channel
        ))
    }
}

struct Harness {
    store: Arc<ConfigStore>,
    repo: InMemoryDocumentRepository,
    router: Router,
}

async fn harness(load: bool) -> Harness {
    harness_with(InMemoryDocumentRepository::new(), load).await
}

async fn harness_with(repo: InMemoryDocumentRepository, load: bool) -> Harness {
    let store = Arc::new(ConfigStore::new(Arc::new(repo.clone())));
    if load {
        store.load().await.unwrap();
    }
    let advisor = Arc::new(AdvisorService::new(store.clone(), Arc::new(EchoGateway)));
    let router = api::app(store.clone(), advisor, 3001);
    Harness { store, repo, router }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_get_config_before_load_is_unavailable() {
    let h = harness(false).await;
    let (status, body) = send(&h.router, "GET", "/api/config", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "error": "unavailable" }));

    let candidate = serde_json::to_value(AgentConfiguration::default()).unwrap();
    let (status, body) = send(&h.router, "PUT", "/api/config", Some(candidate)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "error": "unavailable" }));
    assert!(h.repo.contents().is_none());
}

#[tokio::test]
async fn test_writes_after_fallback_keep_the_document() {
    let broken = "services: [unterminated\n";
    let h = harness_with(InMemoryDocumentRepository::with_document(broken), true).await;
    assert!(h.store.fell_back());

    let (status, body) = send(&h.router, "GET", "/api/config", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, conflict) = send(&h.router, "PUT", "/api/config", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["error"], "fallback");

    let request = json!({ "name": "db", "type": "systemd", "details": "postgresql" });
    let (status, _) = send(&h.router, "POST", "/api/config/services", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&h.router, "DELETE", "/api/config/services/svc-0", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(h.repo.contents().as_deref(), Some(broken));
}

#[tokio::test]
async fn test_get_config_uses_camel_case_fields() {
    let h = harness(true).await;
    let (status, body) = send(&h.router, "GET", "/api/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maintenanceWindow"]["timezone"], "UTC");
    assert_eq!(body["notifications"]["channel"], "email");
    assert_eq!(body["notifications"]["notifyOnWarning"], true);
    assert_eq!(body["autoRemediation"]["restartService"], false);
    assert_eq!(body["credentialReference"], "");
}

#[tokio::test]
async fn test_put_config_accepts_valid_candidate() {
    let h = harness(true).await;
    let (_, mut candidate) = send(&h.router, "GET", "/api/config", None).await;
    candidate["maintenanceWindow"]["days"] = json!(["Sunday", "Saturday"]);
    candidate["maintenanceWindow"]["startTime"] = json!("22:00");
    candidate["maintenanceWindow"]["endTime"] = json!("02:00");
    candidate["notifications"]["channel"] = json!("slack");

    let (status, body) = send(&h.router, "PUT", "/api/config", Some(candidate)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maintenanceWindow"]["days"], json!(["Saturday", "Sunday"]));
    assert!(h.repo.contents().unwrap().contains("method: slack"));
}

#[tokio::test]
async fn test_put_config_reports_every_violation() {
    let h = harness(true).await;
    let (_, mut candidate) = send(&h.router, "GET", "/api/config", None).await;
    candidate["maintenanceWindow"]["days"] = json!(["Funday"]);
    candidate["notifications"]["channel"] = json!("fax");

    let (status, body) = send(&h.router, "PUT", "/api/config", Some(candidate)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["maintenanceWindow.days", "notifications.channel"]);
    assert_eq!(h.store.current().notifications.channel.as_str(), "email");
}

#[tokio::test]
async fn test_service_add_and_remove() {
    let h = harness(true).await;
    let (status, created) = send(
        &h.router,
        "POST",
        "/api/config/services",
        Some(json!({ "name": "api-server", "type": "docker", "details": "api" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("svc-"));
    assert_eq!(created["type"], "docker");

    let (status, body) = send(&h.router, "DELETE", &format!("/api/config/services/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"], json!([]));

    let (status, _) = send(&h.router, "DELETE", "/api/config/services/svc-missing", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_service_add_with_unknown_type_is_rejected() {
    let h = harness(true).await;
    let (status, body) = send(
        &h.router,
        "POST",
        "/api/config/services",
        Some(json!({ "name": "mainframe", "type": "zos" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"][0]["field"], "services[0].type");
    assert!(h.store.current().services.is_empty());
}

#[tokio::test]
async fn test_summary_masks_destination() {
    let h = harness(true).await;
    let mut candidate = (*h.store.current()).clone();
    candidate.notifications.destination = "oncall@example.com".into();
    h.store.replace(candidate).await.unwrap();

    let (status, body) = send(&h.router, "GET", "/api/config/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"], 0);
    assert_eq!(body["remediationTotal"], 4);
    assert_eq!(body["durability"], "durable");
    let preview = body["preview"].as_str().unwrap();
    assert!(!preview.contains("oncall@example.com"));
    assert!(preview.contains("*******"));
}

#[tokio::test]
async fn test_advisor_receives_current_snapshot() {
    let h = harness(true).await;
    h.store
        .add_service("db", sentinel_core::domain::config::ServiceType::Systemd, "postgresql")
        .await
        .unwrap();

    let (status, body) = send(
        &h.router,
        "POST",
        "/api/advisor",
        Some(json!({ "prompt": "Is backup covered?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Is backup covered? (1 services, channel email)");
}
