use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::gifts::repo::Gift;

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateListRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AddGiftRequest {
    pub gift_id: Uuid,
}

/// A list with its gifts resolved, as the client sees it.
#[derive(Debug, Serialize)]
pub struct ListDetails {
    pub id: Uuid,
    pub title: String,
    pub created_at: OffsetDateTime,
    pub gifts: Vec<Gift>,
}
