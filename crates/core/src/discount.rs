//! Category-dependent meaning of a promotion's two discount magnitudes.
//!
//! This is business vocabulary shared by every renderer, not formatting.

use crate::promotion::Category;

/// Label used when a promotion has no category.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Placeholder for a magnitude the category needs but the record lacks.
pub const MISSING_MAGNITUDE: &str = "?";

/// Describe what a promotion offers, e.g. `"Buy 2 Get 1 Free"`.
///
/// Total over all inputs: an unset category yields [`UNKNOWN_LABEL`] and a
/// missing magnitude renders as [`MISSING_MAGNITUDE`].
pub fn describe(category: Option<Category>, x: Option<i32>, y: Option<i32>) -> String {
    match category {
        Some(Category::PercentageDiscountX) => format!("{}% off", magnitude(x)),
        Some(Category::BuyXGetYFree) => format!("Buy {} Get {} Free", magnitude(x), magnitude(y)),
        Some(Category::SpendXSaveY) => format!("Spend {} Save {}", magnitude(x), magnitude(y)),
        None => UNKNOWN_LABEL.to_string(),
    }
}

fn magnitude(value: Option<i32>) -> String {
    value.map_or_else(|| MISSING_MAGNITUDE.to_string(), |v| v.to_string())
}
