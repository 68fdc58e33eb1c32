//! Common error handling utilities for CuraTB
//!
//! This crate holds the error enum shared by the proxy server binary and the
//! intake client, plus the stable error codes attached to log events so an
//! operator can grep for one failure class across both sides.
//!
//! # Error Categories
//!
//! - **Validation**: a required field or parameter is missing or out of range
//! - **Transport**: the client could not reach the proxy
//! - **Config / Server / Network**: process-level failures at startup
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, CuraError};
//!
//! fn require_dataset(path: &str) -> Result<(), CuraError> {
//!     if path.is_empty() {
//!         tracing::warn!(error_code = codes::validation::MISSING_REQUIRED_FIELD, "dataset missing");
//!         return Err(CuraError::Validation("encryptedFilePath é obrigatório".into()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_dataset("").is_err());
//! ```

pub mod codes;
pub mod types;

pub use types::*;
