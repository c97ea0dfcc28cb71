use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    gifts::{
        dto::{CarouselRequest, CarouselResponse, CreateGiftRequest, SearchRequest},
        repo::{Gift, NewGift},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/gifts", post(create_gift))
        .route("/gifts/search", post(search_gifts))
        .route("/carousel", post(carousel))
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ApiError> {
    value.as_deref().ok_or_else(|| {
        warn!(field, "missing required field");
        ApiError::Validation(format!("Missing `{field}` in request body"))
    })
}

#[instrument(skip(state, payload))]
pub async fn create_gift(
    State(state): State<AppState>,
    Json(payload): Json<CreateGiftRequest>,
) -> Result<(StatusCode, Json<Gift>), ApiError> {
    let new = NewGift {
        name: required(&payload.name, "name")?,
        price: required(&payload.price, "price")?,
        holiday: required(&payload.holiday, "holiday")?,
        recipient: required(&payload.recipient, "recipient")?,
        description: required(&payload.description, "description")?,
        link: required(&payload.link, "link")?,
        image: required(&payload.image, "image")?,
    };

    let gift = Gift::create(&state.db, new).await?;
    info!(gift_id = %gift.id, name = %gift.name, "gift created");
    Ok((StatusCode::CREATED, Json(gift)))
}

#[instrument(skip(state, payload))]
pub async fn search_gifts(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<Gift>>, ApiError> {
    let gifts = Gift::search(
        &state.db,
        payload.holiday.as_deref(),
        payload.recipient.as_deref(),
        payload.price.as_deref(),
        payload.name.as_deref(),
    )
    .await?;
    Ok(Json(gifts))
}

#[instrument(skip(state, payload))]
pub async fn carousel(
    State(state): State<AppState>,
    Json(payload): Json<CarouselRequest>,
) -> Result<Json<CarouselResponse>, ApiError> {
    let gifts = Gift::carousel(&state.db, &payload.holiday, &payload.recipient).await?;
    Ok(Json(CarouselResponse {
        holiday: payload.holiday,
        recipient: payload.recipient,
        gifts,
    }))
}
