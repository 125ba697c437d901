use promo_core::service::PromotionService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the service holds its store behind an `Arc`).
#[derive(Clone, Debug)]
pub struct AppState {
    /// Promotion operations over the configured store.
    pub promotions: PromotionService,
}
