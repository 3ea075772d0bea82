pub mod alert_repo;
pub mod device_config_repo;
pub mod metric_repo;

pub use alert_repo::AlertRepo;
pub use device_config_repo::DeviceConfigRepo;
pub use metric_repo::MetricRepo;
