use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod urls;

use enrich::Enricher;
use reconcile::Reconciler;
use store::CardStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub enricher: Enricher,
    pub store: Arc<dyn CardStore>,
    pub reconciler: Reconciler,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/scrape", post(handlers::scrape))
        .route("/cards", get(handlers::list_cards).post(handlers::create_card))
        .route("/cards/:id", delete(handlers::delete_card))
        .with_state(state)
}
