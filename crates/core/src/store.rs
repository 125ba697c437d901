//! Persistence seam for promotions.
//!
//! The store owns record identity: it assigns ids, stamps audit columns and
//! serializes writers per record. Domain code only ever hands it complete,
//! already-validated records.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::promotion::{Promotion, PromotionFields};
use crate::types::DbId;

/// A pure change to one record, run while the store holds it exclusively.
pub type Change<'a> = &'a (dyn Fn(&Promotion) -> CoreResult<Promotion> + Send + Sync);

#[async_trait]
pub trait PromotionStore: Send + Sync {
    /// Persist a new record under a fresh id. Ids are never reused.
    async fn insert(&self, fields: PromotionFields) -> CoreResult<Promotion>;

    async fn find(&self, id: DbId) -> CoreResult<Option<Promotion>>;

    /// Every record, in insertion order.
    async fn list(&self) -> CoreResult<Vec<Promotion>>;

    /// Atomically replace a record with `change(current)`.
    ///
    /// Returns `Ok(None)` when no record has this id, including when a
    /// concurrent delete got there first. An error from `change` leaves the
    /// record untouched and is passed through.
    async fn modify(&self, id: DbId, change: Change<'_>) -> CoreResult<Option<Promotion>>;

    /// Hard-delete a record. Returns whether it existed.
    async fn remove(&self, id: DbId) -> CoreResult<bool>;

    async fn health_check(&self) -> CoreResult<()>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    last_id: DbId,
    records: BTreeMap<DbId, Promotion>,
}

/// Process-local store. Ids increase monotonically, so id order is
/// insertion order.
#[derive(Debug, Default)]
pub struct MemoryPromotionStore {
    state: RwLock<MemoryState>,
}

impl MemoryPromotionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromotionStore for MemoryPromotionStore {
    async fn insert(&self, fields: PromotionFields) -> CoreResult<Promotion> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let now = Utc::now();
        let promotion = Promotion {
            id: state.last_id,
            fields,
            created_at: now,
            updated_at: now,
        };
        state.records.insert(promotion.id, promotion.clone());
        Ok(promotion)
    }

    async fn find(&self, id: DbId) -> CoreResult<Option<Promotion>> {
        Ok(self.state.read().await.records.get(&id).cloned())
    }

    async fn list(&self) -> CoreResult<Vec<Promotion>> {
        Ok(self.state.read().await.records.values().cloned().collect())
    }

    async fn modify(&self, id: DbId, change: Change<'_>) -> CoreResult<Option<Promotion>> {
        let mut state = self.state.write().await;
        let Some(current) = state.records.get(&id) else {
            return Ok(None);
        };

        let mut next = change(current)?;
        next.id = current.id;
        next.created_at = current.created_at;
        next.updated_at = Utc::now();

        state.records.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn remove(&self, id: DbId) -> CoreResult<bool> {
        Ok(self.state.write().await.records.remove(&id).is_some())
    }

    async fn health_check(&self) -> CoreResult<()> {
        Ok(())
    }
}
