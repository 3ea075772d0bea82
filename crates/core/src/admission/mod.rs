//! Per-device admission control.
//!
//! [`AdmissionStore`] keeps one [`TokenBucket`] per device, created lazily
//! with the store defaults on first contact. [`AdmissionGate`] is the
//! handle both front-ends share; it may wrap no store at all, in which
//! case every call is admitted and overrides are refused.
//!
//! # Blocking Lock Usage
//!
//! Uses `parking_lot::Mutex` around the bucket map because:
//! 1. Every operation is a map lookup plus a few float ops
//! 2. Lock is never held across `.await` points
//! 3. No I/O inside lock scope

mod bucket;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

pub use bucket::TokenBucket;

use crate::error::CoreError;
use crate::log_categories;
use crate::types::DeviceId;

/// Device-scoped operations exposed by the front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UpdateConfig,
    PostMetrics,
    GetAlerts,
    SetLimiter,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::UpdateConfig,
        Operation::PostMetrics,
        Operation::GetAlerts,
        Operation::SetLimiter,
    ];

    /// Whether calls pass through the admission gate.
    ///
    /// Limiter overrides are exempt so an operator can always lift a
    /// throttled device.
    pub const fn is_rate_limited(self) -> bool {
        match self {
            Operation::UpdateConfig | Operation::PostMetrics | Operation::GetAlerts => true,
            Operation::SetLimiter => false,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operation::UpdateConfig => "update_config",
            Operation::PostMetrics => "post_metrics",
            Operation::GetAlerts => "get_alerts",
            Operation::SetLimiter => "set_limiter",
        }
    }
}

/// Rate and burst for one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateOverride {
    /// Tokens per second.
    pub rate: f64,
    /// Bucket capacity.
    pub burst: u32,
}

/// Point-in-time view of one device's bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSnapshot {
    pub rate: f64,
    pub capacity: f64,
    pub tokens: f64,
}

/// Map of device id to token bucket.
#[derive(Debug)]
pub struct AdmissionStore {
    buckets: Mutex<HashMap<DeviceId, TokenBucket>>,
    defaults: RateOverride,
}

impl AdmissionStore {
    pub fn new(default_rate: f64, default_burst: u32) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            defaults: RateOverride {
                rate: default_rate,
                burst: default_burst,
            },
        }
    }

    /// Try to admit one call for `device_id` now.
    pub fn check(&self, device_id: &str) -> bool {
        self.check_at(device_id, Instant::now())
    }

    /// Try to admit one call for `device_id` at `now`, creating a full
    /// default bucket on first contact.
    pub fn check_at(&self, device_id: &str, now: Instant) -> bool {
        let mut buckets = self.buckets.lock();
        if let Some(bucket) = buckets.get_mut(device_id) {
            return bucket.try_acquire(now);
        }
        let mut bucket = TokenBucket::new(self.defaults.rate, self.defaults.burst, now);
        let admitted = bucket.try_acquire(now);
        buckets.insert(device_id.to_string(), bucket);
        admitted
    }

    /// Replace the device's bucket with a fresh, full one using `limits`.
    ///
    /// Tokens accumulated under the previous bucket are discarded.
    pub fn set_override(&self, device_id: &str, limits: RateOverride) {
        self.set_override_at(device_id, limits, Instant::now());
    }

    pub fn set_override_at(&self, device_id: &str, limits: RateOverride, now: Instant) {
        let bucket = TokenBucket::new(limits.rate, limits.burst, now);
        self.buckets.lock().insert(device_id.to_string(), bucket);
    }

    /// Number of devices with a bucket.
    pub fn len(&self) -> usize {
        self.buckets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self, device_id: &str) -> Option<BucketSnapshot> {
        self.buckets.lock().get(device_id).map(|b| BucketSnapshot {
            rate: b.rate(),
            capacity: b.capacity(),
            tokens: b.tokens(),
        })
    }
}

/// Shared admission handle. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct AdmissionGate {
    store: Option<Arc<AdmissionStore>>,
}

impl AdmissionGate {
    pub fn enabled(store: Arc<AdmissionStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A gate that admits everything.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn store(&self) -> Option<&Arc<AdmissionStore>> {
        self.store.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Admit or deny one call of `operation` for `device_id`.
    ///
    /// Exempt operations and a disabled gate always admit without touching
    /// any bucket.
    pub fn admit(&self, operation: Operation, device_id: &str) -> Result<(), CoreError> {
        if !operation.is_rate_limited() {
            return Ok(());
        }
        let Some(store) = &self.store else {
            return Ok(());
        };
        if store.check(device_id) {
            Ok(())
        } else {
            tracing::debug!(
                category = log_categories::ADMISSION,
                device_id,
                operation = operation.name(),
                "Rate limit exceeded",
            );
            Err(CoreError::RateLimited {
                device_id: device_id.to_string(),
            })
        }
    }

    /// Install an override for `device_id`.
    pub fn set_override(&self, device_id: &str, limits: RateOverride) -> Result<(), CoreError> {
        let Some(store) = &self.store else {
            return Err(CoreError::AdmissionDisabled);
        };
        store.set_override(device_id, limits);
        tracing::info!(
            category = log_categories::ADMISSION,
            device_id,
            rate = limits.rate,
            burst = limits.burst,
            "Limiter override installed",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn only_set_limiter_is_exempt() {
        let exempt: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| !op.is_rate_limited())
            .collect();
        assert_eq!(exempt, vec![Operation::SetLimiter]);
    }

    #[test]
    fn first_contact_creates_full_default_bucket() {
        let store = AdmissionStore::new(1.0, 5);
        assert!(store.is_empty());

        let now = Instant::now();
        assert!(store.check_at("sensor-1", now));
        assert_eq!(store.len(), 1);

        let snapshot = store.snapshot("sensor-1").unwrap();
        assert_eq!(snapshot.capacity, 5.0);
        assert_eq!(snapshot.tokens, 4.0);
    }

    #[test]
    fn devices_do_not_share_buckets() {
        let store = AdmissionStore::new(0.0, 2);
        let now = Instant::now();
        assert!(store.check_at("a", now));
        assert!(store.check_at("a", now));
        assert!(!store.check_at("a", now));

        assert!(store.check_at("b", now));
        assert!(store.check_at("b", now));
        assert!(!store.check_at("b", now));
    }

    #[test]
    fn override_is_a_hard_reset() {
        let store = AdmissionStore::new(0.0, 1);
        let now = Instant::now();
        assert!(store.check_at("a", now));
        assert!(!store.check_at("a", now));

        store.set_override_at("a", RateOverride { rate: 0.0, burst: 3 }, now);
        let admitted = (0..10).filter(|_| store.check_at("a", now)).count();
        assert_eq!(admitted, 3);
    }

    #[test]
    fn override_on_unknown_device_creates_bucket() {
        let store = AdmissionStore::new(10.0, 10);
        store.set_override("fresh", RateOverride { rate: 0.5, burst: 1 });
        assert_eq!(store.snapshot("fresh").unwrap().rate, 0.5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn tokens_refill_with_time() {
        let store = AdmissionStore::new(2.0, 1);
        let start = Instant::now();
        assert!(store.check_at("a", start));
        assert!(!store.check_at("a", start));
        assert!(store.check_at("a", start + Duration::from_millis(500)));
    }

    #[test]
    fn concurrent_checks_never_over_admit() {
        let store = AdmissionStore::new(0.0, 50);
        let now = Instant::now();
        let admitted = std::sync::atomic::AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        if store.check_at("shared", now) {
                            admitted.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(admitted.into_inner(), 50);
    }

    #[test]
    fn disabled_gate_admits_and_refuses_overrides() {
        let gate = AdmissionGate::disabled();
        for _ in 0..100 {
            assert!(gate.admit(Operation::PostMetrics, "a").is_ok());
        }
        assert_matches!(
            gate.set_override("a", RateOverride { rate: 1.0, burst: 1 }),
            Err(CoreError::AdmissionDisabled)
        );
    }

    #[test]
    fn exempt_operation_does_not_consume_tokens() {
        let store = Arc::new(AdmissionStore::new(0.0, 1));
        let gate = AdmissionGate::enabled(Arc::clone(&store));

        for _ in 0..5 {
            assert!(gate.admit(Operation::SetLimiter, "a").is_ok());
        }
        assert!(store.is_empty());

        assert!(gate.admit(Operation::GetAlerts, "a").is_ok());
        assert_matches!(
            gate.admit(Operation::UpdateConfig, "a"),
            Err(CoreError::RateLimited { device_id }) if device_id == "a"
        );
    }

    #[test]
    fn gate_override_lifts_throttle() {
        let gate = AdmissionGate::enabled(Arc::new(AdmissionStore::new(0.0, 1)));
        assert!(gate.admit(Operation::PostMetrics, "a").is_ok());
        assert!(gate.admit(Operation::PostMetrics, "a").is_err());

        gate.set_override("a", RateOverride { rate: 0.0, burst: 2 })
            .unwrap();
        assert!(gate.admit(Operation::PostMetrics, "a").is_ok());
        assert!(gate.admit(Operation::PostMetrics, "a").is_ok());
        assert!(gate.admit(Operation::PostMetrics, "a").is_err());
    }
}
