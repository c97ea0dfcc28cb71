use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, TokenResponse},
        extractors::AuthUser,
        password,
        repo::User,
        token::JwtKeys,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn public(user: &User) -> PublicUser {
    PublicUser {
        id: user.id,
        username: user.username.clone(),
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if payload.username.is_empty() {
        warn!("empty username");
        return Err(ApiError::Validation("Username must not be empty".into()));
    }
    if payload.username.trim() != payload.username {
        warn!("username has surrounding whitespace");
        return Err(ApiError::Validation(
            "Username cannot start or end with whitespace".into(),
        ));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    let cost = state.config.password_cost;
    let plain = payload.password;
    let hash = tokio::task::spawn_blocking(move || password::hash(&plain, cost))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    // No lookup first: the unique constraint decides races between two
    // concurrent registrations of the same name.
    let user = User::create(&state.db, &payload.username, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::internal)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: public(&user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    // Unknown username and wrong password must be indistinguishable to the
    // client.
    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::CredentialMismatch);
        }
    };

    let plain = payload.password;
    let digest = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || password::verify(&plain, &digest))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    if !ok {
        warn!(user_id = %user.id, "login wrong password");
        return Err(ApiError::CredentialMismatch);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::internal)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: public(&user),
    }))
}

/// Stateless re-issue: a still-valid token buys a fresh one. Nothing is
/// revoked; the old token stays valid until its own expiry.
#[instrument(skip(state))]
pub async fn refresh(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TokenResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user_id).map_err(ApiError::internal)?;
    info!(user_id = %user_id, "token refreshed");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(public(&user)))
}
