use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::urls::FALLBACK_LABEL;

// ── Enrichment ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EnrichmentRequest {
    pub url: String,
}

/// Title and image pulled from a page. Either may be missing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedMetadata {
    pub title: Option<String>,
    pub image: Option<String>,
}

/// Outcome of one enrichment attempt. Failures always carry a label the
/// caller can fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentResult {
    Success {
        title: String,
        image: Option<String>,
    },
    Failure {
        error: String,
        fallback_title: String,
    },
}

impl EnrichmentResult {
    pub fn failure(error: impl Into<String>, fallback_title: impl Into<String>) -> Self {
        EnrichmentResult::Failure {
            error: error.into(),
            fallback_title: fallback_title.into(),
        }
    }

    pub fn url_required() -> Self {
        Self::failure("URL required", FALLBACK_LABEL)
    }

    pub fn unexpected() -> Self {
        Self::failure("Unexpected error", FALLBACK_LABEL)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EnrichmentResult::Success { .. })
    }

    /// Wire shape of `POST /scrape`.
    pub fn to_json(&self) -> Value {
        match self {
            EnrichmentResult::Success { title, image } => json!({
                "success": true,
                "data": { "title": title, "image": image },
            }),
            EnrichmentResult::Failure {
                error,
                fallback_title,
            } => json!({
                "success": false,
                "error": error,
                "fallback": { "title": fallback_title },
            }),
        }
    }
}

impl IntoResponse for EnrichmentResult {
    fn into_response(self) -> Response {
        Json(self.to_json()).into_response()
    }
}

// ── Cards ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Berlin,
    Rome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Sight,
    Activity,
    Nightlife,
    Stay,
    Transport,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub title: String,
    pub link_url: Option<String>,
    pub image_url: Option<String>,
    pub city: Option<City>,
    pub category: Option<Category>,
    pub likes: Vec<String>,
    pub is_booked: bool,
    pub day: Option<String>,
    pub notes: Option<String>,
}

/// What the board hands to the store when a card is first written.
#[derive(Debug, Clone, Default)]
pub struct CardDraft {
    pub title: String,
    pub city: Option<City>,
    pub category: Option<Category>,
    pub link_url: Option<String>,
}

/// Fields rewritten once enrichment completes. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub image_url: Option<String>,
}

/// Body of `POST /cards`.
#[derive(Debug, Deserialize)]
pub struct NewCardRequest {
    pub title: String,
    #[serde(default)]
    pub city: Option<City>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub link_url: Option<String>,
}
