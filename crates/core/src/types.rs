/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Logical content item identity, shared by all revisions of one item.
pub type ItemNumber = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
