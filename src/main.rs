use std::sync::Arc;

use tripboard_api::{
    config::Config,
    enrich::Enricher,
    fetch::PageFetcher,
    reconcile::{self, Reconciler},
    store::{CardStore, InMemoryCardStore},
    AppState,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    let fetcher = PageFetcher::new(&config).expect("Failed to build HTTP client");
    let enricher = Enricher::new(fetcher);

    let store: Arc<dyn CardStore> = Arc::new(InMemoryCardStore::new());
    let (reconciler, events) = Reconciler::new(enricher.clone(), store.clone());
    tokio::spawn(reconcile::log_events(events));

    let app = tripboard_api::app(AppState {
        enricher,
        store,
        reconciler,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(
        fetch_timeout_ms = config.fetch_timeout.as_millis() as u64,
        "listening on {}",
        listener.local_addr().expect("listener has no local address")
    );
    axum::serve(listener, app).await.expect("server error");
}
