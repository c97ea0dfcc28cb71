use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    gifts::repo::Gift,
    lists::{
        dto::{AddGiftRequest, CreateListRequest, ListDetails, UpdateListRequest},
        repo::List,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lists", get(list_lists).post(create_list))
        .route("/lists/:id", put(rename_list).delete(delete_list))
        .route("/lists/:id/gifts", post(add_gift))
        .route("/lists/:id/gifts/:gift_id", delete(remove_gift))
}

async fn details(state: &AppState, list: List) -> Result<ListDetails, ApiError> {
    let gifts = List::gifts(&state.db, list.id).await?;
    Ok(ListDetails {
        id: list.id,
        title: list.title,
        created_at: list.created_at,
        gifts,
    })
}

/// The account view: every list the authenticated user owns, with gifts.
#[instrument(skip(state))]
pub async fn list_lists(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ListDetails>>, ApiError> {
    let lists = List::list_by_user(&state.db, user_id).await?;
    let mut out = Vec::with_capacity(lists.len());
    for list in lists {
        out.push(details(&state, list).await?);
    }
    Ok(Json(out))
}

#[instrument(skip(state, payload))]
pub async fn create_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<ListDetails>), ApiError> {
    if payload.title.trim().is_empty() {
        warn!("empty list title");
        return Err(ApiError::Validation(
            "Missing `title` in request body".into(),
        ));
    }

    let list = List::create(&state.db, user_id, &payload.title).await?;
    info!(list_id = %list.id, user_id = %user_id, "list created");
    Ok((
        StatusCode::CREATED,
        Json(ListDetails {
            id: list.id,
            title: list.title,
            created_at: list.created_at,
            gifts: Vec::new(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn rename_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateListRequest>,
) -> Result<Json<ListDetails>, ApiError> {
    if payload.title.trim().is_empty() {
        warn!("empty list title");
        return Err(ApiError::Validation(
            "Missing `title` in request body".into(),
        ));
    }

    let list = List::rename(&state.db, user_id, id, &payload.title)
        .await?
        .ok_or(ApiError::NotFound("List"))?;
    info!(list_id = %list.id, "list renamed");
    Ok(Json(details(&state, list).await?))
}

#[instrument(skip(state))]
pub async fn delete_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !List::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("List"));
    }
    info!(list_id = %id, user_id = %user_id, "list deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn add_gift(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddGiftRequest>,
) -> Result<Json<ListDetails>, ApiError> {
    let list = List::find_owned(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("List"))?;
    Gift::find(&state.db, payload.gift_id)
        .await?
        .ok_or(ApiError::NotFound("Gift"))?;

    List::add_gift(&state.db, list.id, payload.gift_id).await?;
    info!(list_id = %list.id, gift_id = %payload.gift_id, "gift saved to list");
    Ok(Json(details(&state, list).await?))
}

#[instrument(skip(state))]
pub async fn remove_gift(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, gift_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let list = List::find_owned(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("List"))?;

    if !List::remove_gift(&state.db, list.id, gift_id).await? {
        return Err(ApiError::NotFound("Gift"));
    }
    info!(list_id = %list.id, gift_id = %gift_id, "gift removed from list");
    Ok(StatusCode::NO_CONTENT)
}
