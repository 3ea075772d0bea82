pub mod admission;
pub mod alert;
pub mod error;
pub mod evaluator;
pub mod log_categories;
pub mod pipeline;
pub mod repository;
pub mod service;
pub mod telemetry;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
