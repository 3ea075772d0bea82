//! Load generator for the IoT metrics service.
//!
//! Simulates a fleet of devices that configure themselves over HTTP, then
//! push readings alternately over HTTP and the RPC WebSocket, and finally
//! read back their alerts.

pub mod config;
pub mod error;
pub mod http_client;
pub mod report;
pub mod rpc_client;
pub mod run;
