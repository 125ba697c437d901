//! Database row structs.
//!
//! Rows mirror the table layout; conversion into domain records happens here
//! so the repository never hands unchecked values upward.

pub mod promotion;
