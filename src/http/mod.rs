//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Remote probe
//!     → TcpListener (bound on check.port)
//!     → Axum router, any method, any path
//!     → echo handler returns the request body
//! ```

pub mod server;

pub use server::EchoServer;
