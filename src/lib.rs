//! Concurrent SSH password auditing
//!
//! ## Engine
//!
//! - Features:
//!     - One burst per target, all targets in parallel
//!     - Per-target cap on attempts in flight
//!     - Stop scheduling a target on its first working credential
//!     - Direct dialing or SOCKS5 (RFC 1928) with optional
//!       username/password proxy auth (RFC 1929)
//!     - SSH password login through libssh2, host keys not verified
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use sshburst::{Detail, Dialer, Endpoint, SshLogin, Wordlists, fleet};
//!
//! #[tokio::main]
//! async fn main() {
//!     let login = Arc::new(SshLogin::new(Arc::new(Dialer::Direct), Detail::Quiet));
//!     let wordlists = Wordlists::new(vec!["root".into()], vec!["toor".into()]);
//!     let targets = vec![Endpoint::new("192.0.2.10", 22)];
//!
//!     fleet::run(targets, wordlists, login, 50, None).await;
//! }
//! ```

pub mod address;
pub mod attempt;
pub mod auth;
pub mod burst;
pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod dialer;
pub mod endpoint;
pub mod error;
pub mod fleet;
pub mod protocol;

// Re-export main types at crate root for convenience
pub use attempt::{Attempt, Detail, SshLogin};
pub use auth::UserPass;
pub use burst::{BurstSummary, burst};
pub use config::Config;
pub use credentials::{Credential, Wordlists};
pub use dialer::{Dialer, Socks5Dialer};
pub use endpoint::Endpoint;
pub use error::{AttemptError, DialError, EndpointError};
pub use fleet::FleetSummary;
