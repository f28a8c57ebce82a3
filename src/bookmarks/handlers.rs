use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::services::CurrentUser,
    bookmarks::{
        dto::{BookmarkEnvelope, BookmarkForm, BookmarkJson, BookmarkList},
        fetcher,
        repo::Bookmark,
    },
    error::AppError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(list).post(add))
        .route("/bookmarks/:id", get(get_one).delete(delete))
}

fn is_valid_url(url: &str) -> bool {
    url.len() > 4
}

/// Path ids arrive as raw strings; anything that does not parse as a UUID
/// is an unknown bookmark, not a client error.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound)
}

#[instrument(skip(state, user))]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<BookmarkList>, AppError> {
    let rows = Bookmark::list_active(&state.db, user.id).await?;
    Ok(Json(BookmarkList {
        bookmarks: rows.into_iter().map(BookmarkJson::from).collect(),
    }))
}

#[instrument(skip(state, user))]
pub async fn get_one(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<BookmarkEnvelope>, AppError> {
    let id = parse_id(&id)?;
    let bookmark = Bookmark::find_active(&state.db, user.id, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(BookmarkEnvelope {
        bookmark: bookmark.into(),
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Option<Json<BookmarkForm>>,
) -> Result<Json<BookmarkEnvelope>, AppError> {
    let url = payload
        .map(|Json(p)| p)
        .unwrap_or_default()
        .url
        .unwrap_or_default();
    if !is_valid_url(&url) {
        warn!(url = %url, "rejected bookmark url");
        return Err(AppError::Validation(vec![
            "Dude, what's wrong with you ?".to_string(),
            "Invalid Bookmark Url".to_string(),
        ]));
    }

    let bookmark = match Bookmark::upsert(&state.db, user.id, &url).await {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, url = %url, "bookmark save failed");
            return Err(AppError::Save(vec![json!({ "url": url, "user": user.id })]));
        }
    };

    // Fresh rows carry no metadata yet; revived rows keep what they had.
    if bookmark.title.is_none() && bookmark.description.is_none() {
        fetcher::spawn_enrichment(state.clone(), bookmark.id, bookmark.url.clone());
    }

    info!(bookmark_id = %bookmark.id, user_id = %user.id, "bookmark saved");
    Ok(Json(BookmarkEnvelope {
        bookmark: bookmark.into(),
    }))
}

#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    match Bookmark::soft_delete(&state.db, user.id, id).await {
        Ok(true) => {
            info!(bookmark_id = %id, user_id = %user.id, "bookmark deleted");
            Ok(Json(json!({})))
        }
        Ok(false) => Err(AppError::NotFound),
        Err(e) => {
            warn!(error = %e, bookmark_id = %id, "bookmark delete failed");
            Err(AppError::Save(vec![json!({ "id": id, "user": user.id })]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_sanity_check_is_length_based() {
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("abcde"));
        assert!(!is_valid_url("abcd"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn unparseable_id_is_not_found() {
        assert!(matches!(
            parse_id("not-a-uuid").unwrap_err(),
            AppError::NotFound
        ));
        assert!(parse_id("550f02ce-a675-4a98-8520-8f53c6c2a6e1").is_ok());
    }
}
