use crate::*;
use crate::algos::{parse_at_uri, resolve_feed, FeedSkeleton};
use axum::body::Body;
use axum::Router;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use hf_core::{CreateOp, FeedConfig, Operations, PostRecord};
use hf_haiku::HaikuExtractor;
use hf_ingest::{Ingestor, RetentionPolicy};
use hf_store::{MemoryPostStore, PostStore};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const FEED: &str = "at://did:example:alice/app.bsky.feed.generator/haiku";

fn rec(uri: &str, cid: &str, ms: i64) -> PostRecord {
    let at = Utc.timestamp_millis_opt(ms).unwrap();
    PostRecord::new(uri, cid, at, "text", "a\nb\nc")
}

fn seeded_app() -> Router {
    let store = MemoryPostStore::with_records([
        rec("at://p/1", "c1", 1_000),
        rec("at://p/2", "c2", 2_000),
        rec("at://p/3", "c3", 3_000),
        rec("at://p/4", "c4", 4_000),
        rec("at://p/5", "c5", 5_000),
    ]);
    app_with_state(AppState::new(FeedConfig::default(), Arc::new(store)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn skeleton_uri(limit: Option<usize>, cursor: Option<&str>) -> String {
    let mut uri = format!("/xrpc/app.bsky.feed.getFeedSkeleton?feed={FEED}");
    if let Some(l) = limit {
        uri.push_str(&format!("&limit={l}"));
    }
    if let Some(c) = cursor {
        uri.push_str(&format!("&cursor={c}"));
    }
    uri
}

fn posts(body: &Value) -> Vec<String> {
    body["feed"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["post"].as_str().unwrap().to_string())
        .collect()
}

// ========== Feed URI ==========

#[test]
fn test_parse_at_uri() {
    let u = parse_at_uri(FEED).unwrap();
    assert_eq!(u.authority, "did:example:alice");
    assert_eq!(u.collection, "app.bsky.feed.generator");
    assert_eq!(u.rkey, "haiku");
    assert!(parse_at_uri("https://example.com").is_none());
    assert!(parse_at_uri("at://did:x/app.bsky.feed.generator").is_none());
}

#[test]
fn test_resolve_feed() {
    assert_eq!(resolve_feed(FEED, "did:example:alice", "haiku").unwrap(), "haiku");
    assert!(resolve_feed(FEED, "did:example:bob", "haiku").is_err());
    assert!(resolve_feed(FEED, "did:example:alice", "other").is_err());
}

// ========== Routes ==========

#[tokio::test]
async fn test_health() {
    let (status, body) = get(seeded_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["posts"], 5);
}

#[tokio::test]
async fn test_skeleton_newest_first() {
    let (status, body) = get(seeded_app(), &skeleton_uri(Some(2), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts(&body), vec!["at://p/5", "at://p/4"]);
    assert_eq!(body["cursor"], "4000");
}

#[tokio::test]
async fn test_skeleton_full_sweep_returns_each_once() {
    let app = seeded_app();
    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let (_, body) = get(app.clone(), &skeleton_uri(Some(2), cursor.as_deref())).await;
        let page = posts(&body);
        if page.is_empty() {
            assert!(body.get("cursor").is_none());
            break;
        }
        seen.extend(page);
        cursor = body["cursor"].as_str().map(String::from);
    }
    assert_eq!(seen, vec!["at://p/5", "at://p/4", "at://p/3", "at://p/2", "at://p/1"]);
}

#[tokio::test]
async fn test_skeleton_sweep_over_single_batch() {
    let pond = "An old silent pond a frog jumps into the pond splash! Silence again.";
    let batch = Operations {
        creates: ["a", "b", "c"]
            .iter()
            .map(|k| CreateOp::new(format!("at://p/{k}"), format!("cid-{k}"), pond))
            .collect(),
        deletes: vec![],
    };
    let ingestor = Ingestor::new(HaikuExtractor::english(), RetentionPolicy::default());
    let mutation = ingestor.ingest(&batch, &[], Utc.timestamp_millis_opt(1_000).unwrap());
    let store = Arc::new(MemoryPostStore::new());
    store.apply_mutation(&mutation).await.unwrap();
    let app = app_with_state(AppState::new(FeedConfig::default(), store));

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let (_, body) = get(app.clone(), &skeleton_uri(Some(1), cursor.as_deref())).await;
        let page = posts(&body);
        if page.is_empty() {
            break;
        }
        seen.extend(page);
        cursor = body["cursor"].as_str().map(String::from);
    }
    assert_eq!(seen, vec!["at://p/c", "at://p/b", "at://p/a"]);
}

#[tokio::test]
async fn test_skeleton_default_limit() {
    let (_, body) = get(seeded_app(), &skeleton_uri(None, None)).await;
    let parsed: FeedSkeleton = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.feed.len(), 5);
    assert_eq!(parsed.cursor.as_deref(), Some("1000"));
}

#[tokio::test]
async fn test_skeleton_limit_clamped() {
    let (status, body) = get(seeded_app(), &skeleton_uri(Some(0), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts(&body).len(), 1);
}

#[tokio::test]
async fn test_skeleton_invalid_cursor() {
    let (status, body) = get(seeded_app(), &skeleton_uri(None, Some("soon"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidCursor");
}

#[tokio::test]
async fn test_skeleton_unknown_feed() {
    let uri = "/xrpc/app.bsky.feed.getFeedSkeleton?feed=at://did:example:alice/app.bsky.feed.generator/cats";
    let (status, body) = get(seeded_app(), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UnsupportedAlgorithm");
}

#[tokio::test]
async fn test_skeleton_empty_store() {
    let (status, body) = get(app(), &skeleton_uri(None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(posts(&body).is_empty());
    assert!(body.get("cursor").is_none());
}

#[tokio::test]
async fn test_describe_feed_generator() {
    let (status, body) = get(seeded_app(), "/xrpc/app.bsky.feed.describeFeedGenerator").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["did"], "did:web:example.com");
    assert_eq!(body["feeds"][0]["uri"], FEED);
}

#[tokio::test]
async fn test_did_document() {
    let (status, body) = get(seeded_app(), "/.well-known/did.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "did:web:example.com");
    assert_eq!(body["service"][0]["serviceEndpoint"], "https://example.com");
}

#[tokio::test]
async fn test_did_document_foreign_did() {
    let mut config = FeedConfig::default();
    config.feed.service_did = Some("did:plc:abc123".into());
    let app = app_with_state(AppState::new(config, Arc::new(MemoryPostStore::new())));
    let (status, _) = get(app, "/.well-known/did.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_did_document_requires_exact_host() {
    let mut config = FeedConfig::default();
    config.feed.service_did = Some("did:web:evilexample.com".into());
    let app = app_with_state(AppState::new(config, Arc::new(MemoryPostStore::new())));
    let (status, _) = get(app, "/.well-known/did.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
