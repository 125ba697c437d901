//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or a transaction's connection) as the first argument.

pub mod promotion_repo;

pub use promotion_repo::PromotionRepo;
