//! Request handlers.
//!
//! Handlers parse the request, delegate to the
//! [`PromotionService`](promo_core::service::PromotionService) held in
//! [`AppState`](crate::state::AppState) and map errors via
//! [`AppError`](crate::error::AppError).

pub mod promotion;
