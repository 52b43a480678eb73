//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig (network + address)
//!     → listener.rs (resolve, bind TCP or Unix socket)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - No TLS: the daemon sits next to the proxy on loopback or a Unix socket
//! - Bind failures are fatal at startup

pub mod listener;

pub use listener::{BoundListener, ListenAddr, ListenerError};
