//! Crate-wide error kinds.
//!
//! The synchronization engine distinguishes failures that abort a whole run
//! (store unavailable, catalog fetch/parse, session transport) from failures
//! that are recoverable at the batch level (one module's fetch or write).
//! Per-module variants carry the identifier so report lines can name the
//! module without extra plumbing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The store directory could not be created or is not a directory.
    /// Fatal to every operation that touches the store.
    #[error("schema store unavailable at {path}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },

    /// Writing a payload or sentinel into the store failed. The module's
    /// prior state is left intact so a later run can retry.
    #[error("store write for '{identifier}' failed: {source}")]
    StoreWrite {
        identifier: String,
        #[source]
        source: io::Error,
    },

    /// The catalog request could not be completed over the session.
    #[error("catalog fetch failed: {0}")]
    CatalogFetch(String),

    /// The catalog reply did not decode into the expected structure.
    #[error("catalog reply malformed: {0}")]
    CatalogParse(String),

    /// Transport or authentication failure in the session layer.
    #[error("session error: {0}")]
    Session(String),

    /// One module's schema fetch failed; the batch continues without it.
    #[error("fetch for module '{identifier}' failed: {detail}")]
    ModuleFetch { identifier: String, detail: String },
}
