use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Card, CardDraft, EnrichmentRequest, EnrichmentResult, NewCardRequest};
use crate::urls::{extract_domain, is_url, normalize_url};
use crate::AppState;

pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// POST /scrape
///
/// Always answers 200; success or failure is carried in the body.
pub async fn scrape(State(state): State<AppState>, body: Bytes) -> EnrichmentResult {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable scrape request body");
            return EnrichmentResult::unexpected();
        }
    };

    let url = match payload.get("url").and_then(Value::as_str) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return EnrichmentResult::url_required(),
    };

    state.enricher.enrich(EnrichmentRequest { url }).await
}

// ── Cards ────────────────────────────────────────────────────────────────────

/// GET /cards
pub async fn list_cards(State(state): State<AppState>) -> AppResult<Json<Vec<Card>>> {
    Ok(Json(state.store.list().await?))
}

/// POST /cards
pub async fn create_card(
    State(state): State<AppState>,
    payload: Result<Json<NewCardRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Card>)> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let card = submit_card(&state, req).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// DELETE /cards/:id
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a card from a board submission.
///
/// A link typed as the title becomes a placeholder card named after its
/// domain, and enrichment is started only after the create has completed.
/// That link is the card's link; a separately supplied `link_url` is ignored.
/// Any other title is stored verbatim.
pub async fn submit_card(state: &AppState, req: NewCardRequest) -> AppResult<Card> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title required".into()));
    }

    if is_url(title) {
        let url = normalize_url(title);
        if let Some(ignored) = req.link_url.as_deref().filter(|l| !l.trim().is_empty()) {
            tracing::debug!(%url, %ignored, "title is a link, ignoring separate link_url");
        }
        let draft = CardDraft {
            title: extract_domain(&url),
            city: req.city,
            category: req.category,
            link_url: Some(url.clone()),
        };
        let card = state.store.create(draft).await?;
        tracing::info!(card_id = %card.id, %url, "link card created, enriching in background");
        state.reconciler.spawn(card.id, url);
        return Ok(card);
    }

    let link_url = req
        .link_url
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(normalize_url);

    let draft = CardDraft {
        title: title.to_string(),
        city: req.city,
        category: req.category,
        link_url,
    };
    let card = state.store.create(draft).await?;
    tracing::info!(card_id = %card.id, "card created");
    Ok(card)
}
