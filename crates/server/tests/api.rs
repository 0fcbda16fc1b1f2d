use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::routes::{self, ServerState};
use service::{
    ids::UuidIds,
    storage::MemoryStore,
    CollectionService, Document,
};

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn app_with(store: Arc<MemoryStore>) -> Router {
    let collections = Arc::new(CollectionService::new(store, Arc::new(UuidIds)));
    routes::build_router(ServerState { collections }, cors())
}

fn seeded(v: Value) -> Arc<MemoryStore> {
    let doc: Document = serde_json::from_value(v).expect("document");
    MemoryStore::with_document(doc)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, json))
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_routes() -> anyhow::Result<()> {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/requests/{id}"].is_object());
    assert!(body["paths"]["/api/history"].is_object());
    let health = &body["paths"]["/health"]["get"]["responses"]["200"]["content"]["application/json"]["schema"];
    assert_eq!(health["$ref"], "#/components/schemas/HealthResponse");
    Ok(())
}

#[tokio::test]
async fn empty_store_lists_empty_arrays() -> anyhow::Result<()> {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "GET", "/api/requests", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    let (status, body) = send(&app, "GET", "/api/history", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn request_lifecycle() -> anyhow::Result<()> {
    let app = app_with(MemoryStore::new());

    let (status, body) = send(&app, "POST", "/api/requests", Some(json!({"name": "x", "method": "GET"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["saved"]["name"], "x");
    let id = body["saved"]["id"].as_str().expect("id").to_string();
    assert!(!id.is_empty());

    let (status, fetched) = send(&app, "GET", &format!("/api/requests/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body["saved"]);

    let (status, body) = send(&app, "PUT", &format!("/api/requests/{id}"), Some(json!({"url": "/a"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "updated");
    assert_eq!(body["updated"]["name"], "x");
    assert_eq!(body["updated"]["url"], "/a");
    assert_eq!(body["updated"]["id"], id.as_str());

    let (status, body) = send(&app, "DELETE", &format!("/api/requests/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted", "id": id}));

    let (_, list) = send(&app, "GET", "/api/requests", None).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn missing_request_is_404_with_error_body() -> anyhow::Result<()> {
    let app = app_with(MemoryStore::new());
    let (status, body) = send(&app, "GET", "/api/requests/nope", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Request not found"}));

    let (status, body) = send(&app, "PUT", "/api/requests/nope", Some(json!({"a": 1}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Request not found"}));
    Ok(())
}

#[tokio::test]
async fn deleting_unknown_request_still_succeeds() -> anyhow::Result<()> {
    let store = seeded(json!({"requests": [{"id": "1"}, {"id": "2"}]}));
    let app = app_with(store.clone());

    let (status, body) = send(&app, "DELETE", "/api/requests/zzz", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "zzz");

    let (status, _) = send(&app, "DELETE", "/api/requests/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = send(&app, "GET", "/api/requests", None).await?;
    assert_eq!(list, json!([{"id": "2"}]));
    Ok(())
}

#[tokio::test]
async fn history_create_delete_and_clear() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let app = app_with(store.clone());

    let mut ids = Vec::new();
    for url in ["/a", "/b", "/c"] {
        let (status, body) = send(&app, "POST", "/api/history", Some(json!({"url": url}))).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["savedHistoryItem"]["url"], url);
        ids.push(body["savedHistoryItem"]["id"].as_str().expect("id").to_string());
    }

    let (status, body) = send(&app, "DELETE", &format!("/api/history/{}", ids[0]), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "DELETE", "/api/history/unknown", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&app, "GET", "/api/history", None).await?;
    let urls: Vec<&str> = list.as_array().expect("array").iter().filter_map(|i| i["url"].as_str()).collect();
    assert_eq!(urls, ["/b", "/c"]);

    let (status, _) = send(&app, "DELETE", "/api/history", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = send(&app, "GET", "/api/history", None).await?;
    assert_eq!(list, json!([]));
    assert!(store.snapshot().await.history.is_empty());
    Ok(())
}

#[tokio::test]
async fn non_object_body_is_rejected_without_write() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let app = app_with(store.clone());
    let (status, _) = send(&app, "POST", "/api/requests", Some(json!([1, 2, 3]))).await?;
    assert!(status.is_client_error());
    assert_eq!(store.persist_count(), 0);
    Ok(())
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> anyhow::Result<(StatusCode, Value)> {
    let req = Request::builder().method(method).uri(uri).body(Body::from(body))?;
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn bodyless_post_creates_item_with_only_an_id() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let app = app_with(store.clone());

    let (status, body) = send(&app, "POST", "/api/requests", None).await?;
    assert_eq!(status, StatusCode::OK);
    let saved = body["saved"].as_object().expect("object");
    assert_eq!(saved.keys().collect::<Vec<_>>(), ["id"]);

    let (status, body) = send(&app, "POST", "/api/history", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["savedHistoryItem"]["id"].is_string());
    assert_eq!(store.persist_count(), 2);
    Ok(())
}

#[tokio::test]
async fn bodyless_put_returns_item_unchanged() -> anyhow::Result<()> {
    let app = app_with(seeded(json!({"requests": [{"id": "1", "name": "x"}]})));
    let (status, body) = send(&app, "PUT", "/api/requests/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], json!({"id": "1", "name": "x"}));

    // JSON text without a Content-Type header is still read
    let (status, body) = send_raw(&app, "PUT", "/api/requests/1", r#"{"url": "/a"}"#).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], json!({"id": "1", "name": "x", "url": "/a"}));
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_400_without_write() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let app = app_with(store.clone());
    let (status, body) = send_raw(&app, "POST", "/api/requests", "{\"name\": ").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON body");
    assert_eq!(store.persist_count(), 0);
    Ok(())
}
