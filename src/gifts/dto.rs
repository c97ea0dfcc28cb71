use serde::{Deserialize, Serialize};

use crate::gifts::repo::Gift;

/// Request body for creating a gift. Fields are optional at the serde layer
/// so each missing one can be reported by name.
#[derive(Debug, Deserialize)]
pub struct CreateGiftRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub holiday: Option<String>,
    pub recipient: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub name: Option<String>,
    pub holiday: Option<String>,
    pub recipient: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CarouselRequest {
    pub holiday: String,
    pub recipient: String,
}

#[derive(Debug, Serialize)]
pub struct CarouselResponse {
    pub holiday: String,
    pub recipient: String,
    pub gifts: Vec<Gift>,
}
