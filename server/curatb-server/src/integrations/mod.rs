//! Outbound integrations

pub mod rna_backend;

pub use rna_backend::{BackendError, BackendReply, RnaBackendClient, UploadedFile};
