//! Request-parts extractors that run before any body is read.
//!
//! - [`admission::Admitted`] -- Extracts the device id and passes it through the admission gate.

pub mod admission;
