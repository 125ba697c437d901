//! The promotion record, its category enum and the request payloads that
//! create or patch it.
//!
//! Payloads are parsed from raw JSON here rather than by the transport so
//! that wrong-typed fields (a string `product_id`, a numeric `validity`)
//! surface as [`CoreError::Validation`] like every other rule violation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Literal accepted (case-insensitively) in place of a category to mean
/// "no category".
pub const CATEGORY_UNKNOWN: &str = "UNKNOWN";

/// How `discount_x` / `discount_y` are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// `discount_x` percent off; `discount_y` unused.
    #[serde(rename = "PERCENTAGE_DISCOUNT_X")]
    PercentageDiscountX,
    /// Buy `discount_x` units, get `discount_y` free.
    #[serde(rename = "BUY_X_GET_Y_FREE")]
    BuyXGetYFree,
    /// Spend `discount_x`, save `discount_y`.
    #[serde(rename = "SPEND_X_SAVE_Y")]
    SpendXSaveY,
}

/// All categories, in declaration order.
pub const ALL_CATEGORIES: &[Category] = &[
    Category::PercentageDiscountX,
    Category::BuyXGetYFree,
    Category::SpendXSaveY,
];

impl Category {
    /// Wire / storage name, e.g. `"BUY_X_GET_Y_FREE"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::PercentageDiscountX => "PERCENTAGE_DISCOUNT_X",
            Category::BuyXGetYFree => "BUY_X_GET_Y_FREE",
            Category::SpendXSaveY => "SPEND_X_SAVE_Y",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid category '{raw}'. Must be one of: {}, {CATEGORY_UNKNOWN}",
                    ALL_CATEGORIES
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Parse a category name where `UNKNOWN` means "no category".
pub fn parse_category(raw: &str) -> CoreResult<Option<Category>> {
    if raw.trim().eq_ignore_ascii_case(CATEGORY_UNKNOWN) {
        return Ok(None);
    }
    raw.parse().map(Some)
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// The client-visible content of a promotion, without identity or audit
/// columns. Every record in a store satisfies these rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct PromotionFields {
    #[validate(length(min = 1, max = 63, message = "name must be between 1 and 63 characters"))]
    pub name: String,
    pub category: Option<Category>,
    pub discount_x: Option<i32>,
    pub discount_y: Option<i32>,
    #[validate(range(min = 0, message = "product_id must be a non-negative integer"))]
    pub product_id: i64,
    #[validate(length(
        min = 1,
        max = 256,
        message = "description must be between 1 and 256 characters"
    ))]
    pub description: String,
    pub validity: bool,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// A stored promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Promotion {
    pub id: DbId,
    #[serde(flatten)]
    pub fields: PromotionFields,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Body of a create or update request.
///
/// Every field is optional at this level; which ones are required is decided
/// by the lifecycle. The outer `Option` records whether the key was present
/// at all and the inner one whether it was `null`, so an update can clear a
/// nullable value and reject a `null` for a required one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromotionInput {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub discount_x: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub discount_y: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub product_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub validity: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "present")]
    pub end_date: Option<Option<Date>>,
}

impl PromotionInput {
    /// Parse a request body, reporting type errors as validation failures.
    pub fn from_json(body: serde_json::Value) -> CoreResult<Self> {
        serde_json::from_value(body)
            .map_err(|e| CoreError::Validation(format!("Invalid promotion: {e}")))
    }
}

/// Body of `PUT /promotions/{id}/extend`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtendInput {
    pub end_date: Option<Date>,
}

impl ExtendInput {
    pub fn from_json(body: serde_json::Value) -> CoreResult<Self> {
        serde_json::from_value(body)
            .map_err(|e| CoreError::Validation(format!("Invalid extension: {e}")))
    }

    /// The requested end date, which must be present.
    pub fn required_end_date(&self) -> CoreResult<Date> {
        self.end_date
            .ok_or_else(|| CoreError::Validation("end_date is required".to_string()))
    }
}

/// Marks a key that appeared in the body, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
