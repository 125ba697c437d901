//! Promotion lifecycle: creation, patching, validity toggling and end-date
//! extension.
//!
//! Every function here is pure: it takes the current record (if any) plus
//! the request and returns the record that should be stored, or the reason
//! it must not be. This is the one place the record invariants are checked;
//! callers persist the result through a [`crate::store::PromotionStore`].
//!
//! Validity has two states with unconditional transitions in both
//! directions, so there is no transition table to consult.

use validator::Validate;

use crate::error::{CoreError, CoreResult};
use crate::promotion::{parse_category, Category, Promotion, PromotionFields, PromotionInput};
use crate::types::Date;

/// Build the fields of a new promotion from a create request.
///
/// `name`, `product_id` and `description` are required; `validity` defaults
/// to `false`; everything else is optional.
pub fn create(input: &PromotionInput) -> CoreResult<PromotionFields> {
    let fields = PromotionFields {
        name: input.name.clone().flatten().ok_or_else(|| missing("name"))?,
        category: resolve_category(input.category.clone().flatten().as_deref())?,
        discount_x: input.discount_x.flatten(),
        discount_y: input.discount_y.flatten(),
        product_id: input.product_id.flatten().ok_or_else(|| missing("product_id"))?,
        description: input
            .description
            .clone()
            .flatten()
            .ok_or_else(|| missing("description"))?,
        validity: input.validity.flatten().unwrap_or(false),
        start_date: input.start_date.flatten(),
        end_date: input.end_date.flatten(),
    };
    validate(&fields)?;
    Ok(fields)
}

/// Apply a field-level patch and re-check the merged record.
///
/// Absent keys keep their current value; `null` clears an optional field.
/// The id and audit timestamps are never touched.
pub fn update(current: &Promotion, patch: &PromotionInput) -> CoreResult<Promotion> {
    let mut fields = current.fields.clone();

    if let Some(name) = &patch.name {
        fields.name = required(name.clone(), "name")?;
    }
    if let Some(category) = &patch.category {
        fields.category = resolve_category(category.as_deref())?;
    }
    if let Some(discount_x) = patch.discount_x {
        fields.discount_x = discount_x;
    }
    if let Some(discount_y) = patch.discount_y {
        fields.discount_y = discount_y;
    }
    if let Some(product_id) = patch.product_id {
        fields.product_id = required(product_id, "product_id")?;
    }
    if let Some(description) = &patch.description {
        fields.description = required(description.clone(), "description")?;
    }
    if let Some(validity) = patch.validity {
        fields.validity = required(validity, "validity")?;
    }
    if let Some(start_date) = patch.start_date {
        fields.start_date = start_date;
    }
    if let Some(end_date) = patch.end_date {
        fields.end_date = end_date;
    }

    validate(&fields)?;
    Ok(Promotion {
        fields,
        ..current.clone()
    })
}

/// Mark a promotion valid or invalid. Idempotent.
pub fn set_validity(current: &Promotion, target: bool) -> Promotion {
    let mut next = current.clone();
    next.fields.validity = target;
    next
}

/// Move the end date, earlier or later.
///
/// The only constraint is that it may not fall before the start date.
pub fn extend(current: &Promotion, new_end_date: Date) -> CoreResult<Promotion> {
    validate_date_range(current.fields.start_date, Some(new_end_date))?;
    let mut next = current.clone();
    next.fields.end_date = Some(new_end_date);
    Ok(next)
}

/// Check every invariant of a candidate record.
pub fn validate(fields: &PromotionFields) -> CoreResult<()> {
    if fields.name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be blank".to_string()));
    }
    if fields.description.trim().is_empty() {
        return Err(CoreError::Validation(
            "description must not be blank".to_string(),
        ));
    }
    fields.validate().map_err(|errors| {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map_or_else(|| format!("{field} is invalid"), |m| m.to_string())
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        messages.sort();
        CoreError::Validation(messages.join("; "))
    })?;
    validate_date_range(fields.start_date, fields.end_date)
}

/// Reject an end date that precedes the start date. Open ranges pass.
pub fn validate_date_range(start_date: Option<Date>, end_date: Option<Date>) -> CoreResult<()> {
    match (start_date, end_date) {
        (Some(start), Some(end)) if end < start => Err(CoreError::Validation(format!(
            "end_date {end} is before start_date {start}"
        ))),
        _ => Ok(()),
    }
}

fn resolve_category(raw: Option<&str>) -> CoreResult<Option<Category>> {
    raw.map_or(Ok(None), parse_category)
}

/// A patch value for a field that cannot be cleared.
fn required<T>(value: Option<T>, field: &str) -> CoreResult<T> {
    value.ok_or_else(|| CoreError::Validation(format!("{field} must not be null")))
}

fn missing(field: &str) -> CoreError {
    CoreError::Validation(format!("Invalid promotion: missing {field}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(body: serde_json::Value) -> PromotionInput {
        PromotionInput::from_json(body).unwrap()
    }

    fn stored(fields: PromotionFields) -> Promotion {
        let now = Utc::now();
        Promotion {
            id: 7,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Promotion {
        stored(
            create(&input(json!({
                "name": "Spring sale",
                "category": "PERCENTAGE_DISCOUNT_X",
                "discount_x": 20,
                "product_id": 42,
                "description": "20% off garden tools",
                "start_date": "2024-03-01",
                "end_date": "2024-03-31"
            })))
            .unwrap(),
        )
    }

    // -- create --------------------------------------------------------------

    #[test]
    fn create_applies_defaults() {
        let fields = create(&input(json!({
            "name": "n",
            "product_id": 1,
            "description": "d"
        })))
        .unwrap();

        assert!(!fields.validity);
        assert_eq!(fields.category, None);
        assert_eq!(fields.discount_x, None);
        assert_eq!(fields.discount_y, None);
        assert_eq!(fields.start_date, None);
        assert_eq!(fields.end_date, None);
    }

    #[test]
    fn create_keeps_supplied_validity() {
        let fields = create(&input(json!({
            "name": "n",
            "product_id": 1,
            "description": "d",
            "validity": true
        })))
        .unwrap();
        assert!(fields.validity);
    }

    #[test]
    fn create_requires_name_product_and_description() {
        for absent in ["name", "product_id", "description"] {
            let mut body = json!({ "name": "n", "product_id": 1, "description": "d" });
            body.as_object_mut().unwrap().remove(absent);

            let err = create(&input(body)).unwrap_err();
            assert_matches!(
                err,
                CoreError::Validation(msg) if msg.contains(absent),
                "missing {absent} must be rejected"
            );
        }
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = create(&input(json!({
            "name": "   ",
            "product_id": 1,
            "description": "d"
        })))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn create_rejects_overlong_name() {
        let err = create(&input(json!({
            "name": "x".repeat(64),
            "product_id": 1,
            "description": "d"
        })))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("name"));
    }

    #[test]
    fn create_rejects_negative_product_id() {
        let err = create(&input(json!({
            "name": "n",
            "product_id": -1,
            "description": "d"
        })))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("product_id"));
    }

    #[test]
    fn create_rejects_end_before_start() {
        let err = create(&input(json!({
            "name": "n",
            "product_id": 1,
            "description": "d",
            "start_date": "2024-02-01",
            "end_date": "2024-01-01"
        })))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn create_accepts_same_day_range() {
        let fields = create(&input(json!({
            "name": "n",
            "product_id": 1,
            "description": "d",
            "start_date": "2024-02-01",
            "end_date": "2024-02-01"
        })))
        .unwrap();
        assert_eq!(fields.start_date, fields.end_date);
    }

    #[test]
    fn create_treats_unknown_category_as_none() {
        let fields = create(&input(json!({
            "name": "n",
            "product_id": 1,
            "description": "d",
            "category": "UNKNOWN"
        })))
        .unwrap();
        assert_eq!(fields.category, None);
    }

    // -- update --------------------------------------------------------------

    #[test]
    fn update_changes_only_supplied_fields() {
        let current = sample();
        let next = update(&current, &input(json!({ "name": "Summer sale" }))).unwrap();

        assert_eq!(next.id, current.id);
        assert_eq!(next.fields.name, "Summer sale");
        assert_eq!(next.fields.discount_x, Some(20));
        assert_eq!(next.fields.end_date, current.fields.end_date);
    }

    #[test]
    fn update_null_clears_optional_field() {
        let current = sample();
        let next = update(&current, &input(json!({ "category": null, "end_date": null }))).unwrap();

        assert_eq!(next.fields.category, None);
        assert_eq!(next.fields.end_date, None);
        assert_eq!(next.fields.start_date, current.fields.start_date);
    }

    #[test]
    fn update_revalidates_merged_dates() {
        let current = sample();
        let err = update(&current, &input(json!({ "start_date": "2024-04-15" }))).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn update_ignores_id_in_body() {
        let current = sample();
        let next = update(&current, &input(json!({ "id": 999, "validity": true }))).unwrap();
        assert_eq!(next.id, current.id);
        assert!(next.fields.validity);
    }

    #[test]
    fn update_rejects_bad_category() {
        let current = sample();
        let err = update(&current, &input(json!({ "category": "FREE_LUNCH" }))).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn update_rejects_null_for_required_fields() {
        let current = sample();
        for field in ["name", "product_id", "description", "validity"] {
            let err = update(&current, &input(json!({ field: null }))).unwrap_err();
            assert_matches!(
                err,
                CoreError::Validation(msg) if msg == format!("{field} must not be null")
            );
        }
    }

    #[test]
    fn create_treats_null_required_field_as_missing() {
        let err = create(&input(json!({
            "name": "n",
            "product_id": null,
            "description": "d"
        })))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("product_id"));
    }

    // -- validity ------------------------------------------------------------

    #[test]
    fn set_validity_is_idempotent() {
        let current = sample();
        let once = set_validity(&current, true);
        let twice = set_validity(&once, true);
        assert!(once.fields.validity);
        assert_eq!(once, twice);
    }

    #[test]
    fn set_validity_goes_both_ways() {
        let valid = set_validity(&sample(), true);
        let invalid = set_validity(&valid, false);
        assert!(!invalid.fields.validity);
    }

    // -- extend --------------------------------------------------------------

    #[test]
    fn extend_lengthens() {
        let next = extend(&sample(), date(2024, 6, 30)).unwrap();
        assert_eq!(next.fields.end_date, Some(date(2024, 6, 30)));
    }

    #[test]
    fn extend_may_shorten() {
        let next = extend(&sample(), date(2024, 3, 10)).unwrap();
        assert_eq!(next.fields.end_date, Some(date(2024, 3, 10)));
    }

    #[test]
    fn extend_rejects_end_before_start() {
        let err = extend(&sample(), date(2024, 2, 1)).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn extend_without_start_date_is_unconstrained() {
        let mut current = sample();
        current.fields.start_date = None;
        let next = extend(&current, date(1999, 1, 1)).unwrap();
        assert_eq!(next.fields.end_date, Some(date(1999, 1, 1)));
    }

    #[test]
    fn open_ranges_pass() {
        assert!(validate_date_range(None, None).is_ok());
        assert!(validate_date_range(Some(date(2024, 1, 1)), None).is_ok());
        assert!(validate_date_range(None, Some(date(2024, 1, 1))).is_ok());
    }
}
