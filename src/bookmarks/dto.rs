use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use crate::bookmarks::repo::Bookmark;

/// Request body for POST /bookmarks.
#[derive(Debug, Default, Deserialize)]
pub struct BookmarkForm {
    pub url: Option<String>,
}

/// Wire shape of a bookmark: timestamps as strings, absent values null,
/// tags defaulting to an empty list, owner exposed as `user`.
#[derive(Debug, Serialize)]
pub struct BookmarkJson {
    pub id: Uuid,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub screenshot: Option<String>,
    pub tags: Vec<String>,
    pub user: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Bookmark> for BookmarkJson {
    fn from(b: Bookmark) -> Self {
        Self {
            id: b.id,
            url: b.url,
            title: b.title,
            description: b.description,
            screenshot: b.screenshot,
            tags: b.tags,
            user: b.user_id,
            created_at: fmt_timestamp(b.created_at),
            updated_at: fmt_timestamp(b.updated_at),
        }
    }
}

fn fmt_timestamp(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

/// Envelope for GET /bookmarks.
#[derive(Debug, Serialize)]
pub struct BookmarkList {
    pub bookmarks: Vec<BookmarkJson>,
}

/// Envelope for single-bookmark responses.
#[derive(Debug, Serialize)]
pub struct BookmarkEnvelope {
    pub bookmark: BookmarkJson,
}
