//! Metric ingestion: persist the reading, then evaluate it.

use std::sync::Arc;

use serde::Serialize;

use crate::alert::Alert;
use crate::error::CoreError;
use crate::evaluator::AlertEvaluator;
use crate::log_categories;
use crate::repository::MetricRepository;
use crate::telemetry::{Metric, NewMetric};

/// Result of a fully successful ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct Ingested {
    pub metric: Metric,
    pub alerts: Vec<Alert>,
}

/// Stores readings and hands them to the evaluator.
///
/// The metric write always happens first and is never rolled back: an
/// evaluation failure after a successful write still leaves the reading
/// stored.
#[derive(Clone)]
pub struct IngestionPipeline {
    metrics: Arc<dyn MetricRepository>,
    evaluator: Option<AlertEvaluator>,
}

impl IngestionPipeline {
    pub fn new(metrics: Arc<dyn MetricRepository>, evaluator: Option<AlertEvaluator>) -> Self {
        Self { metrics, evaluator }
    }

    /// Store `metric` and evaluate it.
    ///
    /// Errors:
    /// - `ReferentialIntegrity` or `Persistence` from the metric write; nothing was stored.
    /// - `AlertingUnavailable` when no evaluator is wired; the metric was stored.
    /// - Any evaluator error; the metric and earlier alerts were stored.
    pub async fn ingest(&self, metric: &NewMetric) -> Result<Ingested, CoreError> {
        tracing::info!(
            category = log_categories::METRIC,
            device_id = %metric.device_id,
            "Received metric for device",
        );

        let stored = self.metrics.put_metric(metric).await?;

        let Some(evaluator) = &self.evaluator else {
            tracing::warn!(
                category = log_categories::METRIC,
                device_id = %metric.device_id,
                metric_id = stored.id,
                "Metric stored but no alert evaluator is configured",
            );
            return Err(CoreError::AlertingUnavailable);
        };

        let alerts = evaluator.evaluate(&metric.device_id, metric).await?;
        Ok(Ingested {
            metric: stored,
            alerts,
        })
    }
}
