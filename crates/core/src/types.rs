/// Promotion ids are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates are exchanged as ISO `YYYY-MM-DD`.
pub type Date = chrono::NaiveDate;
