use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsForm, PublicUser, RegisterResponse, TokenResponse},
        repo::User,
        services::{hash_password, verify_password, JwtKeys},
    },
    error::AppError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/token", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Option<Json<CredentialsForm>>,
) -> Result<Json<RegisterResponse>, AppError> {
    let form = payload.map(|Json(p)| p).unwrap_or_default();
    let (email, password) = form.validate().map_err(AppError::Validation)?;

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Duplicate);
    }

    let hash = hash_password(&password).map_err(|e| AppError::Internal(e.to_string()))?;

    let user = match User::create(&state.db, &email, &hash).await {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, email = %email, "create user failed");
            return Err(AppError::Save(vec![json!("Undefined error")]));
        }
    };

    let token = JwtKeys::from_ref(&state)
        .sign(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(RegisterResponse {
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
        token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<CredentialsForm>>,
) -> Result<Json<TokenResponse>, AppError> {
    let form = payload.map(|Json(p)| p).unwrap_or_default();
    let (email, password) = form.validate().map_err(AppError::Auth)?;

    let user = match User::find_by_email(&state.db, &email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::auth("Invalid login"));
        }
    };

    let ok = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !ok {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::auth("Invalid login"));
    }

    let token = JwtKeys::from_ref(&state)
        .sign(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}
