#![allow(dead_code)]

// Shared fixtures: canned connector replies and a scripted fake session.

use serde_json::{Value, json};
use std::collections::VecDeque;
use yangsync::{Session, SyncError};

/// A catalog reply covering the given `(identifier, version)` pairs, shaped
/// the way the connector contract delivers the monitoring subtree.
pub fn catalog_reply(entries: &[(&str, &str)]) -> Value {
    let schemas: Vec<Value> = entries
        .iter()
        .map(|(identifier, version)| {
            json!({
                "identifier": identifier,
                "version": version,
                "format": "yang",
                "namespace": format!("urn:example:{identifier}"),
                "location": "NETCONF",
            })
        })
        .collect();
    json!({"data": {"netconf-state": {"schemas": {"schema": schemas}}}})
}

/// A `<get-schema>` reply carrying the given schema text.
pub fn schema_reply(text: &str) -> Value {
    json!({"data": text})
}

/// Session returning queued replies in order and recording every request.
pub struct FakeSession {
    replies: VecDeque<Result<Value, SyncError>>,
    pub requests: Vec<String>,
}

impl FakeSession {
    pub fn new(replies: Vec<Result<Value, SyncError>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            requests: Vec::new(),
        }
    }
}

impl Session for FakeSession {
    fn rpc(&mut self, payload: &str) -> Result<Value, SyncError> {
        self.requests.push(payload.to_string());
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::Session("no scripted reply left".to_string())))
    }
}
