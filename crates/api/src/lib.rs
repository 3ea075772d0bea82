//! IoT metrics service library.
//!
//! Exposes config, state, error handling, the HTTP routes and the RPC
//! dispatcher so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod rpc;
pub mod state;
