//! Promotion domain rules.
//!
//! Holds the promotion record and its invariants, the category-dependent
//! discount vocabulary, the validity/extension lifecycle, the single-criterion
//! query engine and the [`service::PromotionService`] that composes them over
//! a [`store::PromotionStore`].

pub mod discount;
pub mod error;
pub mod lifecycle;
pub mod promotion;
pub mod query;
pub mod service;
pub mod store;
pub mod types;
