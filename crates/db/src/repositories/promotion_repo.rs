//! Repository for the `promotions` table.

use promo_core::promotion::PromotionFields;
use promo_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::promotion::PromotionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, discount_x, discount_y, product_id, description, \
                       validity, start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for promotions.
pub struct PromotionRepo;

impl PromotionRepo {
    /// Insert a new promotion, returning the created row.
    pub async fn create(pool: &PgPool, input: &PromotionFields) -> Result<PromotionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO promotions \
                (name, category, discount_x, discount_y, product_id, description, \
                 validity, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(&input.name)
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.discount_x)
            .bind(input.discount_y)
            .bind(input.product_id)
            .bind(&input.description)
            .bind(input.validity)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a promotion by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PromotionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promotions WHERE id = $1");
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a promotion and lock its row until the surrounding transaction ends.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<PromotionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promotions WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all promotions in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<PromotionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promotions ORDER BY id");
        sqlx::query_as::<_, PromotionRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every client-visible column and bump `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn replace(
        conn: &mut PgConnection,
        id: DbId,
        input: &PromotionFields,
    ) -> Result<Option<PromotionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE promotions SET \
                name = $2, \
                category = $3, \
                discount_x = $4, \
                discount_y = $5, \
                product_id = $6, \
                description = $7, \
                validity = $8, \
                start_date = $9, \
                end_date = $10, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromotionRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.discount_x)
            .bind(input.discount_y)
            .bind(input.product_id)
            .bind(&input.description)
            .bind(input.validity)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(conn)
            .await
    }

    /// Hard-delete a promotion. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
