//! Promotion service: the operations exposed to transports.
//!
//! Each operation runs the lifecycle or query rules and persists through the
//! configured [`PromotionStore`]. Read-modify-write operations go through
//! [`PromotionStore::modify`], so concurrent writers to one id are
//! serialized and a writer that loses a race against a delete sees
//! [`CoreError::NotFound`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::discount::describe;
use crate::error::{CoreError, CoreResult};
use crate::lifecycle;
use crate::promotion::{Promotion, PromotionInput};
use crate::query::Criterion;
use crate::store::{Change, PromotionStore};
use crate::types::{Date, DbId};

#[derive(Clone)]
pub struct PromotionService {
    store: Arc<dyn PromotionStore>,
}

impl std::fmt::Debug for PromotionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromotionService").finish_non_exhaustive()
    }
}

impl PromotionService {
    pub fn new(store: Arc<dyn PromotionStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(name = "promotions.service.create", skip(self, input), err)]
    pub async fn create(&self, input: PromotionInput) -> CoreResult<Promotion> {
        let fields = lifecycle::create(&input)?;
        let promotion = self.store.insert(fields).await?;
        info!(
            promotion_id = promotion.id,
            offer = %describe(
                promotion.fields.category,
                promotion.fields.discount_x,
                promotion.fields.discount_y
            ),
            "Created promotion"
        );
        Ok(promotion)
    }

    #[tracing::instrument(name = "promotions.service.get", skip(self), err)]
    pub async fn get(&self, id: DbId) -> CoreResult<Promotion> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| CoreError::promotion_not_found(id))
    }

    #[tracing::instrument(name = "promotions.service.update", skip(self, patch), err)]
    pub async fn update(&self, id: DbId, patch: PromotionInput) -> CoreResult<Promotion> {
        let promotion = self
            .modify(id, &|current: &Promotion| lifecycle::update(current, &patch))
            .await?;
        info!(promotion_id = id, "Updated promotion");
        Ok(promotion)
    }

    #[tracing::instrument(name = "promotions.service.delete", skip(self), err)]
    pub async fn delete(&self, id: DbId) -> CoreResult<()> {
        if self.store.remove(id).await? {
            info!(promotion_id = id, "Deleted promotion");
            Ok(())
        } else {
            Err(CoreError::promotion_not_found(id))
        }
    }

    #[tracing::instrument(name = "promotions.service.query", skip(self), err)]
    pub async fn query(&self, criterion: &Criterion) -> CoreResult<Vec<Promotion>> {
        let all = self.store.list().await?;
        let total = all.len();
        let hits = criterion.filter(all);
        debug!(total, matched = hits.len(), "Queried promotions");
        Ok(hits)
    }

    #[tracing::instrument(name = "promotions.service.set_validity", skip(self), err)]
    pub async fn set_validity(&self, id: DbId, target: bool) -> CoreResult<Promotion> {
        let promotion = self
            .modify(id, &|current: &Promotion| {
                Ok(lifecycle::set_validity(current, target))
            })
            .await?;
        info!(
            promotion_id = id,
            "Promotion {}",
            if target { "validated" } else { "invalidated" }
        );
        Ok(promotion)
    }

    #[tracing::instrument(name = "promotions.service.extend", skip(self), err)]
    pub async fn extend(&self, id: DbId, end_date: Date) -> CoreResult<Promotion> {
        let promotion = self
            .modify(id, &|current: &Promotion| lifecycle::extend(current, end_date))
            .await?;
        info!(promotion_id = id, %end_date, "Extended promotion");
        Ok(promotion)
    }

    pub async fn health_check(&self) -> CoreResult<()> {
        self.store.health_check().await
    }

    async fn modify(&self, id: DbId, change: Change<'_>) -> CoreResult<Promotion> {
        self.store
            .modify(id, change)
            .await?
            .ok_or_else(|| CoreError::promotion_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::query::QueryParams;
    use crate::store::MemoryPromotionStore;

    fn service() -> PromotionService {
        PromotionService::new(Arc::new(MemoryPromotionStore::new()))
    }

    fn input(body: serde_json::Value) -> PromotionInput {
        PromotionInput::from_json(body).unwrap()
    }

    fn valid_body(name: &str, product_id: i64) -> serde_json::Value {
        json!({
            "name": name,
            "category": "BUY_X_GET_Y_FREE",
            "discount_x": 2,
            "discount_y": 1,
            "product_id": product_id,
            "description": "bundle deal",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31"
        })
    }

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn created_ids_are_unique_and_stable() {
        let svc = service();
        let a = svc.create(input(valid_body("a", 1))).await.unwrap();
        let b = svc.create(input(valid_body("b", 2))).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(svc.get(a.id).await.unwrap(), a);
        assert_eq!(svc.get(b.id).await.unwrap(), b);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input() {
        let svc = service();
        let err = svc
            .create(input(json!({
                "name": "n",
                "description": "d",
                "product_id": 1,
                "start_date": "2024-02-01",
                "end_date": "2024-01-01"
            })))
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert!(svc.query(&Criterion::None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let err = service().get(404).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { id: 404, .. });
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let svc = service();
        let created = svc.create(input(valid_body("a", 1))).await.unwrap();

        let updated = svc
            .update(created.id, input(json!({ "discount_x": 3 })))
            .await
            .unwrap();
        assert_eq!(updated.fields.discount_x, Some(3));
        assert_eq!(updated.fields.name, "a");
        assert_eq!(svc.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let err = service()
            .update(9, input(json!({ "name": "x" })))
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::NotFound { .. });
    }

    #[tokio::test]
    async fn invalid_update_is_not_persisted() {
        let svc = service();
        let created = svc.create(input(valid_body("a", 1))).await.unwrap();

        let err = svc
            .update(created.id, input(json!({ "end_date": "2023-12-31" })))
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(svc.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        let created = svc.create(input(valid_body("a", 1))).await.unwrap();

        svc.delete(created.id).await.unwrap();
        assert_matches!(svc.get(created.id).await, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn repeated_delete_keeps_reporting_not_found() {
        let svc = service();
        let created = svc.create(input(valid_body("a", 1))).await.unwrap();

        svc.delete(created.id).await.unwrap();
        assert_matches!(svc.delete(created.id).await, Err(CoreError::NotFound { .. }));
        assert_matches!(svc.delete(created.id).await, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn set_validity_twice_is_idempotent() {
        let svc = service();
        let created = svc.create(input(valid_body("a", 1))).await.unwrap();

        let first = svc.set_validity(created.id, true).await.unwrap();
        let second = svc.set_validity(created.id, true).await.unwrap();
        assert!(first.fields.validity);
        assert_eq!(first.fields, second.fields);
        assert_eq!(first.id, second.id);

        let invalid = svc.set_validity(created.id, false).await.unwrap();
        assert!(!invalid.fields.validity);
    }

    #[tokio::test]
    async fn set_validity_unknown_is_not_found() {
        let err = service().set_validity(3, true).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { .. });
    }

    #[tokio::test]
    async fn extend_moves_end_date_either_way() {
        let svc = service();
        let created = svc.create(input(valid_body("a", 1))).await.unwrap();

        let longer = svc.extend(created.id, date(2024, 3, 31)).await.unwrap();
        assert_eq!(longer.fields.end_date, Some(date(2024, 3, 31)));

        let shorter = svc.extend(created.id, date(2024, 1, 10)).await.unwrap();
        assert_eq!(shorter.fields.end_date, Some(date(2024, 1, 10)));

        let err = svc.extend(created.id, date(2023, 12, 1)).await.unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[tokio::test]
    async fn query_by_validity_returns_subset_in_order() {
        let svc = service();
        let mut expected = Vec::new();
        for i in 0..6 {
            let p = svc.create(input(valid_body(&format!("p{i}"), i))).await.unwrap();
            if i % 2 == 0 {
                expected.push(svc.set_validity(p.id, true).await.unwrap().id);
            }
        }

        let criterion = Criterion::from_params(&QueryParams {
            validity: Some("true".into()),
            ..QueryParams::default()
        })
        .unwrap();
        let hits = svc.query(&criterion).await.unwrap();

        assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), expected);
    }

    #[tokio::test]
    async fn query_without_criterion_returns_everything() {
        let svc = service();
        for i in 0..3 {
            svc.create(input(valid_body(&format!("p{i}"), i))).await.unwrap();
        }
        let all = svc.query(&Criterion::None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_never_resurrect_a_deleted_record() {
        let svc = service();
        let created = svc.create(input(valid_body("a", 1))).await.unwrap();
        let id = created.id;

        let mut handles = Vec::new();
        for i in 0..16 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                if i == 8 {
                    svc.delete(id).await.map(|()| None)
                } else {
                    svc.set_validity(id, i % 2 == 0).await.map(Some)
                }
            }));
        }

        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => {}
                Err(err) => assert_matches!(err, CoreError::NotFound { .. }),
            }
        }
        assert_matches!(svc.get(id).await, Err(CoreError::NotFound { .. }));
    }
}
