//! [`PromotionStore`] backed by PostgreSQL.

use async_trait::async_trait;
use promo_core::error::{CoreError, CoreResult};
use promo_core::promotion::{Promotion, PromotionFields};
use promo_core::store::{Change, PromotionStore};
use promo_core::types::DbId;
use sqlx::error::ErrorKind;

use crate::repositories::PromotionRepo;
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgPromotionStore {
    pool: DbPool,
}

impl PgPromotionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromotionStore for PgPromotionStore {
    async fn insert(&self, fields: PromotionFields) -> CoreResult<Promotion> {
        let row = PromotionRepo::create(&self.pool, &fields)
            .await
            .map_err(storage_error)?;
        row.try_into()
    }

    async fn find(&self, id: DbId) -> CoreResult<Option<Promotion>> {
        PromotionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage_error)?
            .map(Promotion::try_from)
            .transpose()
    }

    async fn list(&self) -> CoreResult<Vec<Promotion>> {
        PromotionRepo::list(&self.pool)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(Promotion::try_from)
            .collect()
    }

    async fn modify(&self, id: DbId, change: Change<'_>) -> CoreResult<Option<Promotion>> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let Some(row) = PromotionRepo::find_for_update(&mut *tx, id)
            .await
            .map_err(storage_error)?
        else {
            return Ok(None);
        };

        // Dropping `tx` on any early return rolls back and releases the lock.
        let current = Promotion::try_from(row)?;
        let next = change(&current)?;

        let updated = PromotionRepo::replace(&mut *tx, id, &next.fields)
            .await
            .map_err(storage_error)?
            .map(Promotion::try_from)
            .transpose()?;

        tx.commit().await.map_err(storage_error)?;
        Ok(updated)
    }

    async fn remove(&self, id: DbId) -> CoreResult<bool> {
        PromotionRepo::delete(&self.pool, id)
            .await
            .map_err(storage_error)
    }

    async fn health_check(&self) -> CoreResult<()> {
        crate::health_check(&self.pool).await.map_err(storage_error)
    }
}

/// Translate a sqlx failure into the domain taxonomy.
///
/// Check-constraint violations mirror domain invariants and surface as
/// validation errors; everything else is an internal storage failure.
fn storage_error(err: sqlx::Error) -> CoreError {
    if let Some(db_err) = err.as_database_error() {
        if matches!(db_err.kind(), ErrorKind::CheckViolation) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return CoreError::Validation(format!(
                "Promotion violates constraint: {constraint}"
            ));
        }
    }
    tracing::error!(error = %err, "Promotion store error");
    CoreError::Internal(err.to_string())
}
