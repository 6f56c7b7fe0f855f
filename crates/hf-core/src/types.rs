use crate::post::PostRecord;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Post payload carried by a create operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostContent {
    /// Non-text payloads decode to an empty string and are rejected by extraction.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub text: String,
}

fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn content_or_empty<'de, D>(deserializer: D) -> std::result::Result<PostContent, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::Object(mut map) => match map.remove("text") {
            Some(Value::String(s)) => s,
            _ => String::new(),
        },
        _ => String::new(),
    };
    Ok(PostContent { text })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOp {
    pub uri: String,
    pub cid: String,
    #[serde(default, deserialize_with = "content_or_empty")]
    pub record: PostContent,
}

impl CreateOp {
    pub fn new(uri: impl Into<String>, cid: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            cid: cid.into(),
            record: PostContent { text: text.into() },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOp {
    pub uri: String,
}

impl DeleteOp {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Create and delete operations decoded from one upstream event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operations {
    #[serde(default)]
    pub creates: Vec<CreateOp>,
    #[serde(default)]
    pub deletes: Vec<DeleteOp>,
}

impl Operations {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.deletes.is_empty()
    }
}

/// One delivery unit from the upstream stream. `seq` is its checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub seq: i64,
    #[serde(flatten)]
    pub ops: Operations,
}

impl Batch {
    pub fn new(seq: i64, ops: Operations) -> Self {
        Self { seq, ops }
    }
}

/// Store changes computed for one batch. Deletes apply before inserts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mutation {
    pub to_delete: BTreeSet<String>,
    pub to_insert: Vec<PostRecord>,
}

impl Mutation {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_insert.is_empty()
    }
}

/// What a store actually changed when applying a [`Mutation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    pub deleted: usize,
    pub inserted: usize,
    pub skipped_existing: usize,
}
