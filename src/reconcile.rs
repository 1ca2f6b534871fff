use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::enrich::Enricher;
use crate::models::{CardPatch, EnrichmentRequest, EnrichmentResult};
use crate::store::CardStore;

/// What happened to a card after its background enrichment finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileEvent {
    Patched {
        card_id: Uuid,
        title: String,
        image_url: Option<String>,
    },
    /// Enrichment failed; the placeholder was left alone.
    Skipped { card_id: Uuid, error: String },
    PatchFailed { card_id: Uuid, error: String },
}

impl ReconcileEvent {
    pub fn card_id(&self) -> Uuid {
        match self {
            ReconcileEvent::Patched { card_id, .. }
            | ReconcileEvent::Skipped { card_id, .. }
            | ReconcileEvent::PatchFailed { card_id, .. } => *card_id,
        }
    }
}

/// Patches freshly created link cards with their enriched title and image.
///
/// Work is detached from the request that created the card. Outcomes flow
/// one way, out through the event channel, and never back into creation.
#[derive(Clone)]
pub struct Reconciler {
    enricher: Enricher,
    store: Arc<dyn CardStore>,
    events: mpsc::UnboundedSender<ReconcileEvent>,
}

impl Reconciler {
    pub fn new(
        enricher: Enricher,
        store: Arc<dyn CardStore>,
    ) -> (Self, mpsc::UnboundedReceiver<ReconcileEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                enricher,
                store,
                events,
            },
            rx,
        )
    }

    /// Enrich `url` in the background and patch `card_id` on success.
    /// Must only be called once the card exists in the store.
    pub fn spawn(&self, card_id: Uuid, url: String) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let event = this.reconcile(card_id, url).await;
            // A closed receiver just means nobody is listening.
            let _ = this.events.send(event);
        })
    }

    async fn reconcile(&self, card_id: Uuid, url: String) -> ReconcileEvent {
        match self.enricher.enrich(EnrichmentRequest { url }).await {
            EnrichmentResult::Success { title, image } => {
                let patch = CardPatch {
                    title: Some(title.clone()),
                    image_url: image.clone(),
                };
                match self.store.patch(card_id, patch).await {
                    Ok(()) => ReconcileEvent::Patched {
                        card_id,
                        title,
                        image_url: image,
                    },
                    Err(e) => ReconcileEvent::PatchFailed {
                        card_id,
                        error: e.to_string(),
                    },
                }
            }
            EnrichmentResult::Failure { error, .. } => ReconcileEvent::Skipped { card_id, error },
        }
    }
}

/// Drain reconciliation outcomes into the log until every sender is gone.
pub async fn log_events(mut rx: mpsc::UnboundedReceiver<ReconcileEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            ReconcileEvent::Patched {
                card_id,
                title,
                image_url,
            } => {
                tracing::info!(%card_id, %title, has_image = image_url.is_some(), "card enriched")
            }
            ReconcileEvent::Skipped { card_id, error } => {
                tracing::warn!(%card_id, %error, "enrichment failed, keeping placeholder")
            }
            ReconcileEvent::PatchFailed { card_id, error } => {
                tracing::warn!(%card_id, %error, "could not patch enriched card")
            }
        }
    }
}
