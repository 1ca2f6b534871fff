use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Card, CardDraft, CardPatch};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("card {0} not found")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
}

/// Persistence for board cards. The board only creates, lists, patches and
/// deletes; durability and ordering belong to the implementation.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn create(&self, draft: CardDraft) -> Result<Card, StoreError>;

    async fn patch(&self, id: Uuid, patch: CardPatch) -> Result<(), StoreError>;

    /// All cards, newest first.
    async fn list(&self) -> Result<Vec<Card>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Process-local store. Cheaply cloneable; clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryCardStore {
    cards: Arc<RwLock<HashMap<Uuid, Card>>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: Uuid) -> Option<Card> {
        self.cards.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn create(&self, draft: CardDraft) -> Result<Card, StoreError> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::Validation("Title required".into()));
        }

        let card = Card {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            created_by: None,
            title: draft.title,
            link_url: draft.link_url,
            image_url: None,
            city: draft.city,
            category: draft.category,
            likes: Vec::new(),
            is_booked: false,
            day: None,
            notes: None,
        };
        self.cards.write().await.insert(card.id, card.clone());
        Ok(card)
    }

    async fn patch(&self, id: Uuid, patch: CardPatch) -> Result<(), StoreError> {
        let mut cards = self.cards.write().await;
        let card = cards.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(title) = patch.title {
            card.title = title;
        }
        if let Some(image_url) = patch.image_url {
            card.image_url = Some(image_url);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Card>, StoreError> {
        let mut cards: Vec<Card> = self.cards.read().await.values().cloned().collect();
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cards)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.cards
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
