//! RPC front-end: JSON request/response frames over a WebSocket.
//!
//! Each text frame carries one [`protocol::RpcRequest`]; each reply echoes
//! its `id`. Methods mirror the HTTP routes and share the same admission
//! gate, validation and device service.

pub mod dispatch;
pub mod protocol;
pub mod socket;

pub use dispatch::dispatch_frame;
pub use socket::rpc_handler;
