//! Values for the `category` field attached to every domain log event.
//!
//! Log aggregation filters on these, so they are part of the operational
//! contract and must not be renamed casually.

/// Metric ingestion events.
pub const METRIC: &str = "metric";

/// Alert evaluation and persistence events.
pub const ALERT: &str = "alert";

/// Device configuration events.
pub const CONFIG: &str = "config";

/// Admission gate decisions and limiter overrides.
pub const ADMISSION: &str = "admission";
