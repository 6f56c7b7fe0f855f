use crate::algos::{self, FeedParams, FeedSkeleton};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::debug;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/xrpc/app.bsky.feed.getFeedSkeleton", get(get_feed_skeleton))
        .route("/xrpc/app.bsky.feed.describeFeedGenerator", get(describe_feed_generator))
}

pub fn well_known_routes() -> Router<AppState> {
    Router::new().route("/.well-known/did.json", get(did_document))
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let posts = state.posts.len().await?;
    Ok(Json(json!({
        "status": "ok",
        "posts": posts,
        "uptime_secs": state.start_time.elapsed().as_secs(),
    })))
}

async fn get_feed_skeleton(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedSkeleton>, ApiError> {
    let feed = &state.config.feed;
    algos::resolve_feed(&params.feed, &feed.publisher_did, &feed.shortname)?;
    let limit = params.limit.unwrap_or(feed.default_limit).clamp(1, feed.max_limit.max(1));
    debug!(limit, cursor = ?params.cursor, "feed skeleton request");
    let skeleton = algos::haiku_skeleton(state.posts.as_ref(), limit, params.cursor.as_deref()).await?;
    Ok(Json(skeleton))
}

async fn describe_feed_generator(State(state): State<AppState>) -> Json<Value> {
    let feed = &state.config.feed;
    Json(json!({
        "did": feed.service_did(),
        "feeds": [{ "uri": feed.feed_uri() }],
    }))
}

async fn did_document(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let feed = &state.config.feed;
    let did = feed.service_did();
    if did != format!("did:web:{}", feed.hostname) {
        return Err(ApiError::not_found("service DID is not a did:web for this host"));
    }
    Ok(Json(json!({
        "@context": ["https://www.w3.org/ns/did/v1"],
        "id": did,
        "service": [{
            "id": "#bsky_fg",
            "type": "BskyFeedGenerator",
            "serviceEndpoint": format!("https://{}", feed.hostname),
        }],
    })))
}
