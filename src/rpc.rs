//! Wire payloads for the ietf-netconf-monitoring schema operations.
//!
//! Requests are the protocol-defined XML fragments written through the
//! session; replies come back from the connector as structured JSON. Both
//! directions of the wire format live here so the rest of the crate never
//! handles raw payload shapes.

use crate::error::SyncError;
use serde_json::Value;

pub const BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
pub const MONITORING_NS: &str = "urn:ietf:params:xml:ns:yang:ietf-netconf-monitoring";

/// Fixed subtree filter selecting the peer's full schema catalog.
pub const SCHEMA_LIST_FILTER: &str = r#"<filter xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <netconf-state xmlns="urn:ietf:params:xml:ns:yang:ietf-netconf-monitoring">
    <schemas/>
  </netconf-state>
</filter>
"#;

/// Path of the repeated schema entries inside a catalog reply.
const SCHEMA_LIST_POINTER: &str = "/data/netconf-state/schemas/schema";

/// Build a `<get-schema>` request for one module. The version element is
/// omitted when no version is given; the peer then returns its only revision.
pub fn get_schema_request(identifier: &str, version: Option<&str>) -> String {
    let version_element = match version {
        Some(version) => format!("\n        <version>{version}</version>"),
        None => String::new(),
    };
    format!(
        r#"<rpc xmlns="{BASE_NS}" message-id="1">
    <get-schema xmlns="{MONITORING_NS}">
        <identifier>{identifier}</identifier>{version_element}
    </get-schema>
</rpc>
"#
    )
}

/// Extract the repeated schema entries from a catalog reply.
pub fn schema_entries(reply: &Value) -> Result<&[Value], SyncError> {
    reply
        .pointer(SCHEMA_LIST_POINTER)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| {
            SyncError::CatalogParse(format!(
                "reply carries no schema list at {SCHEMA_LIST_POINTER}"
            ))
        })
}

/// Extract the schema payload text from a `<get-schema>` reply.
pub fn schema_text(reply: &Value) -> Option<&str> {
    reply.pointer("/data").and_then(Value::as_str)
}
