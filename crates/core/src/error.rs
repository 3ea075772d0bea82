use crate::types::DeviceId;

/// Domain error shared by every layer of the metrics service.
///
/// The HTTP and RPC front-ends each map these variants onto their own
/// transport vocabulary; the variants themselves never carry transport detail.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed validation. The message lists the offending fields.
    #[error("validation error: {0}")]
    Validation(String),

    /// The admission gate denied the call.
    #[error("rate limit exceeded")]
    RateLimited { device_id: DeviceId },

    /// A metric or alert referenced a device that has no configuration.
    #[error("device {device_id} has no configuration")]
    ReferentialIntegrity { device_id: DeviceId },

    /// The storage backend failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The metric was committed but no alert evaluator is wired in.
    #[error("alerting unavailable: metric stored without evaluation")]
    AlertingUnavailable,

    /// A limiter override was requested while admission control is off.
    #[error("no admission control configured")]
    AdmissionDisabled,
}
