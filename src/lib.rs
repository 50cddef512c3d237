//! NETCONF schema synchronization.
//!
//! `yangsync` keeps a local directory of YANG modules in step with the schema
//! catalog a network element advertises. Reconciliation marks never-seen
//! modules with zero-byte sentinel files; the download pass then fetches each
//! marked module over a single session and replaces its sentinel with the
//! payload. Both passes are idempotent, and the download pass resumes cleanly
//! after partial failure.

pub mod catalog;
pub mod config;
pub mod error;
pub mod rpc;
pub mod session;
pub mod store;
pub mod sync;

pub use catalog::{SchemaInfo, fetch_catalog, parse_catalog};
pub use error::SyncError;
pub use session::{CommandSession, Session, SessionConfig, schema_fetcher};
pub use store::{ModuleState, SchemaStore, StoreSnapshot};
pub use sync::{ReconcileOutcome, SyncReport, download_marked, reconcile};
