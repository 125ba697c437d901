//! Single-criterion promotion queries.
//!
//! A query filters the whole collection on at most one dimension. The
//! criterion is a tagged variant so that "one filter only" holds by
//! construction rather than by convention.
//!
//! Matching rules:
//! - `name` is an exact, case-sensitive match.
//! - `validity` compares booleans; `true/false`, `yes/no` and `1/0` are
//!   accepted, case-insensitively.
//! - `category`, `product_id`, `start_date` and `end_date` are exact
//!   equality. `category=UNKNOWN` selects records without a category.
//!
//! Results keep store order. An empty result is a normal answer.

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::promotion::{parse_category, Category, Promotion};
use crate::types::Date;

/// The one dimension a query filters on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Criterion {
    /// No filter: the whole collection.
    #[default]
    None,
    ByName(String),
    ByCategory(Option<Category>),
    ByValidity(bool),
    ByStartDate(Date),
    ByEndDate(Date),
    ByProductId(i64),
}

/// Raw query-string parameters, as sent by the clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    pub name: Option<String>,
    pub validity: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub product_id: Option<String>,
}

impl Criterion {
    /// Pick the criterion to honor from raw parameters.
    ///
    /// Empty values are ignored. When several are supplied the first in the
    /// order name, validity, category, start_date, end_date, product_id wins.
    pub fn from_params(params: &QueryParams) -> CoreResult<Self> {
        let candidates = [
            ("name", &params.name),
            ("validity", &params.validity),
            ("category", &params.category),
            ("start_date", &params.start_date),
            ("end_date", &params.end_date),
            ("product_id", &params.product_id),
        ];

        candidates
            .into_iter()
            .find_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (key, v))
            })
            .map_or(Ok(Criterion::None), |(key, value)| Self::parse(key, value))
    }

    /// Parse a single `key=value` pair.
    pub fn parse(key: &str, value: &str) -> CoreResult<Self> {
        match key {
            "name" => Ok(Criterion::ByName(value.to_string())),
            "validity" => parse_bool(value).map(Criterion::ByValidity),
            "category" => parse_category(value).map(Criterion::ByCategory),
            "start_date" => parse_date(key, value).map(Criterion::ByStartDate),
            "end_date" => parse_date(key, value).map(Criterion::ByEndDate),
            "product_id" => value
                .trim()
                .parse::<i64>()
                .map(Criterion::ByProductId)
                .map_err(|_| {
                    CoreError::Validation(format!("product_id must be an integer, got '{value}'"))
                }),
            other => Err(CoreError::Validation(format!(
                "Unsupported query criterion '{other}'"
            ))),
        }
    }

    /// Whether a record satisfies this criterion.
    pub fn matches(&self, promotion: &Promotion) -> bool {
        let fields = &promotion.fields;
        match self {
            Criterion::None => true,
            Criterion::ByName(name) => fields.name == *name,
            Criterion::ByCategory(category) => fields.category == *category,
            Criterion::ByValidity(validity) => fields.validity == *validity,
            Criterion::ByStartDate(date) => fields.start_date == Some(*date),
            Criterion::ByEndDate(date) => fields.end_date == Some(*date),
            Criterion::ByProductId(product_id) => fields.product_id == *product_id,
        }
    }

    /// Keep the records that match, preserving their order.
    pub fn filter(&self, promotions: Vec<Promotion>) -> Vec<Promotion> {
        if *self == Criterion::None {
            return promotions;
        }
        promotions.into_iter().filter(|p| self.matches(p)).collect()
    }
}

fn parse_bool(value: &str) -> CoreResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(CoreError::Validation(format!(
            "validity must be true or false, got '{value}'"
        ))),
    }
}

fn parse_date(key: &str, value: &str) -> CoreResult<Date> {
    Date::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!("{key} must be a YYYY-MM-DD date, got '{value}'"))
    })
}
