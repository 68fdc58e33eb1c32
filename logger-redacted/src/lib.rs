//! Logging for a service that handles patient data
//!
//! Two concerns live here:
//!
//! - **Subscriber setup**: one `init_tracing` call shared by the proxy server
//!   and the intake CLI, pretty in development and JSON in production, with
//!   `RUST_LOG` always able to override the default filter.
//! - **PHI redaction**: patient payloads and encrypted dataset handles are
//!   reduced to correlation hashes before they reach a log line, and free
//!   text echoed back by the backend is scrubbed of emails, IPs and file
//!   paths.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{PhiRedactor, RedactionConfig};
//!
//! let redactor = PhiRedactor::new(RedactionConfig::default());
//! let handle = redactor.redact_dataset_handle("/srv/uploads/enc/2f1c9a.bin");
//! assert!(handle.starts_with("FILE["));
//! ```

pub mod config;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use redactor::*;
pub use subscriber::*;
