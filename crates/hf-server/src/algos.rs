//! Feed algorithms. The only one served is the haiku feed.

use hf_core::{cursor, FeedError, Result};
use hf_store::PostReader;
use serde::{Deserialize, Serialize};

pub const FEED_GENERATOR_COLLECTION: &str = "app.bsky.feed.generator";

#[derive(Debug, Clone, Deserialize)]
pub struct FeedParams {
    pub feed: String,
    pub limit: Option<usize>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonItem {
    pub post: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSkeleton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub feed: Vec<SkeletonItem>,
}

/// Parts of `at://<did>/<collection>/<rkey>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtUri<'a> {
    pub authority: &'a str,
    pub collection: &'a str,
    pub rkey: &'a str,
}

pub fn parse_at_uri(uri: &str) -> Option<AtUri<'_>> {
    let rest = uri.strip_prefix("at://")?;
    let mut parts = rest.splitn(3, '/');
    let authority = parts.next().filter(|s| !s.is_empty())?;
    let collection = parts.next().filter(|s| !s.is_empty())?;
    let rkey = parts.next().filter(|s| !s.is_empty() && !s.contains('/'))?;
    Some(AtUri { authority, collection, rkey })
}

/// Resolve the requested feed URI to the shortname this service publishes.
pub fn resolve_feed<'a>(feed: &'a str, publisher_did: &str, shortname: &str) -> Result<&'a str> {
    match parse_at_uri(feed) {
        Some(uri)
            if uri.authority == publisher_did
                && uri.collection == FEED_GENERATOR_COLLECTION
                && uri.rkey == shortname =>
        {
            Ok(uri.rkey)
        }
        _ => Err(FeedError::UnknownFeed(feed.to_string())),
    }
}

/// Newest-first page of stored haiku, strictly older than `cursor`.
pub async fn haiku_skeleton(posts: &dyn PostReader, limit: usize, cursor: Option<&str>) -> Result<FeedSkeleton> {
    let before = cursor.map(cursor::decode).transpose()?;
    let page = posts.page(limit, before).await?;
    let next = page.last().map(|r| cursor::encode(r.indexed_at));
    Ok(FeedSkeleton {
        cursor: next,
        feed: page.into_iter().map(|r| SkeletonItem { post: r.uri }).collect(),
    })
}
