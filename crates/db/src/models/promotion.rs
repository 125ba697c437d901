//! Promotion row model.

use promo_core::error::CoreError;
use promo_core::promotion::{Category, Promotion, PromotionFields};
use promo_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `promotions` table.
#[derive(Debug, Clone, FromRow)]
pub struct PromotionRow {
    pub id: DbId,
    pub name: String,
    pub category: Option<String>,
    pub discount_x: Option<i32>,
    pub discount_y: Option<i32>,
    pub product_id: i64,
    pub description: String,
    pub validity: bool,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<PromotionRow> for Promotion {
    type Error = CoreError;

    fn try_from(row: PromotionRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| {
                CoreError::Internal(format!("promotion {} has a corrupt category: {e}", row.id))
            })?;

        Ok(Promotion {
            id: row.id,
            fields: PromotionFields {
                name: row.name,
                category,
                discount_x: row.discount_x,
                discount_y: row.discount_y,
                product_id: row.product_id,
                description: row.description,
                validity: row.validity,
                start_date: row.start_date,
                end_date: row.end_date,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
