//! Shared data shapes for the CuraTB intake and training flows
//!
//! Everything that crosses a wire lives here: the patient record collected by
//! the intake wizard, the prediction result rendered back to the user, the
//! training command and its response, the model status record and the
//! envelopes the backend RNA service answers with.
//!
//! Field names on the wire are the backend's Portuguese camelCase names
//! (`idade`, `tipoEntrada`, `tempoCura`, ...). Rust-side names follow the
//! same words in snake_case.

pub mod backend;
pub mod codes;
pub mod patient;
pub mod prediction;
pub mod status;
pub mod training;
pub mod upload;

pub use backend::*;
pub use codes::*;
pub use patient::*;
pub use prediction::*;
pub use status::*;
pub use training::*;
pub use upload::*;

/// Current UTC time formatted the way browsers print `toISOString()`
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
