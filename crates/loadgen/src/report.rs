use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// How the service answered a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Envelope came back with `success: true`.
    Accepted,
    /// HTTP 429 or RPC `resource_exhausted`.
    RateLimited,
    /// The service answered but refused the request.
    Rejected,
    /// Transport failure or a server-side error.
    Failed,
}

impl Outcome {
    /// Classify an HTTP status plus the `success` flag of its envelope.
    pub fn from_http(status: u16, success: Option<bool>) -> Self {
        match status {
            429 => Self::RateLimited,
            500..=599 => Self::Failed,
            200..=299 if success == Some(true) => Self::Accepted,
            _ => Self::Rejected,
        }
    }

    /// Classify a decoded RPC reply frame.
    pub fn from_rpc(frame: &serde_json::Value) -> Self {
        if let Some(code) = frame.pointer("/error/code").and_then(|c| c.as_str()) {
            return match code {
                "resource_exhausted" => Self::RateLimited,
                "internal" => Self::Failed,
                _ => Self::Rejected,
            };
        }
        match frame.pointer("/result/success").and_then(|s| s.as_bool()) {
            Some(true) => Self::Accepted,
            Some(false) => Self::Rejected,
            None => Self::Failed,
        }
    }
}

/// Shared tallies, updated from every device task.
#[derive(Debug, Default)]
pub struct Report {
    accepted: AtomicU64,
    rate_limited: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    alerts_seen: AtomicU64,
}

impl Report {
    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Accepted => &self.accepted,
            Outcome::RateLimited => &self.rate_limited,
            Outcome::Rejected => &self.rejected,
            Outcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alerts(&self, count: u64) {
        self.alerts_seen.fetch_add(count, Ordering::Relaxed);
    }

    pub fn summary(&self, devices: usize, elapsed: Duration) -> Summary {
        Summary {
            devices,
            accepted: self.accepted.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            alerts_seen: self.alerts_seen.load(Ordering::Relaxed),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub devices: usize,
    pub accepted: u64,
    pub rate_limited: u64,
    pub rejected: u64,
    pub failed: u64,
    pub alerts_seen: u64,
    pub elapsed_ms: u64,
}

impl Summary {
    pub fn total_calls(&self) -> u64 {
        self.accepted + self.rate_limited + self.rejected + self.failed
    }

    /// Accepted calls per second over the whole run.
    pub fn throughput(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.accepted as f64 * 1000.0 / self.elapsed_ms as f64
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} devices, {} calls in {} ms: {} accepted, {} rate limited, {} rejected, \
             {} failed, {} alerts",
            self.devices,
            self.total_calls(),
            self.elapsed_ms,
            self.accepted,
            self.rate_limited,
            self.rejected,
            self.failed,
            self.alerts_seen,
        )
    }
}
