pub mod alert;
pub mod device_config;
pub mod metric;
