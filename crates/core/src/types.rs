/// All database primary keys are SQLite INTEGER rowids.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque device identifier supplied by callers. Never empty once validated.
pub type DeviceId = String;
