//! Remote schema catalog retrieval.
//!
//! One request against the monitoring subtree returns every schema the peer
//! advertises. The decode is strict: a missing field on any entry, or two
//! entries claiming the same identifier, fails the whole catalog rather than
//! silently dropping entries. Retries are the caller's concern.

use crate::error::SyncError;
use crate::rpc;
use crate::session::Session;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// One entry in the peer's schema catalog. Constructed fresh per fetch; only
/// the identifier outlives the catalog pass.
#[derive(Clone, Debug, Deserialize)]
pub struct SchemaInfo {
    /// Module name; unique within a catalog snapshot.
    pub identifier: String,
    /// Opaque revision label, compared only for equality.
    pub version: String,
    /// Payload encoding, e.g. `yang`.
    pub format: String,
    /// Module namespace URI.
    pub namespace: String,
    /// Where the peer serves the schema from; informational only.
    pub location: String,
}

/// Fetch and decode the peer's full schema catalog over one request.
pub fn fetch_catalog(session: &mut dyn Session) -> Result<Vec<SchemaInfo>, SyncError> {
    let reply = session
        .rpc(rpc::SCHEMA_LIST_FILTER)
        .map_err(|err| SyncError::CatalogFetch(err.to_string()))?;
    parse_catalog(&reply)
}

/// Decode a catalog reply into descriptors, strictly.
pub fn parse_catalog(reply: &Value) -> Result<Vec<SchemaInfo>, SyncError> {
    let entries = rpc::schema_entries(reply)?;
    let mut catalog = Vec::with_capacity(entries.len());
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let info: SchemaInfo = serde_json::from_value(entry.clone())
            .map_err(|err| SyncError::CatalogParse(format!("schema entry {index}: {err}")))?;
        if !seen.insert(info.identifier.clone()) {
            return Err(SyncError::CatalogParse(format!(
                "duplicate schema identifier '{}'",
                info.identifier
            )));
        }
        catalog.push(info);
    }
    debug!("catalog decoded: {} schemas", catalog.len());
    Ok(catalog)
}
