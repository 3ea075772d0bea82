use std::sync::Arc;

use iotm_core::admission::AdmissionGate;
use iotm_core::service::DeviceService;
use iotm_db::DbStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Both front-ends hold clones of the same value, so they share one
/// admission store and one storage backend.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: iotm_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Device operations (config, ingestion, alert listing).
    pub devices: Arc<DeviceService>,
    /// Admission gate shared by HTTP and RPC.
    pub admission: AdmissionGate,
}

impl AppState {
    /// Wire the storage backend and admission gate implied by `config`.
    pub fn new(pool: iotm_db::DbPool, config: ServerConfig) -> Self {
        let admission = match config.admission_store() {
            Some(store) => AdmissionGate::enabled(Arc::new(store)),
            None => AdmissionGate::disabled(),
        };
        let devices = DeviceService::from_store(Arc::new(DbStore::new(pool.clone())));

        Self {
            pool,
            config: Arc::new(config),
            devices: Arc::new(devices),
            admission,
        }
    }
}
