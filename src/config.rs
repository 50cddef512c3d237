//! Defaults and override resolution for operator-configurable settings.
//!
//! Resolution order is CLI flag, then environment, then the built-in default.
//! Resolved values are injected at construction time; nothing in the crate
//! mutates configuration after startup.

use std::env;
use std::path::PathBuf;

/// Default directory for downloaded schemas and their sentinels.
pub const DEFAULT_STORE_DIR: &str = "/tmp/yang";

/// Default external connector command implementing the session capability.
pub const DEFAULT_SESSION_COMMAND: &str = "netconf-rpc";

const ENV_STORE_DIR: &str = "YANGSYNC_DIR";
const ENV_SESSION_COMMAND: &str = "YANGSYNC_SESSION_CMD";

/// Resolve the schema store directory from a flag, `YANGSYNC_DIR`, or the
/// default.
pub fn resolve_store_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    match env::var(ENV_STORE_DIR) {
        Ok(raw) if !raw.is_empty() => PathBuf::from(raw),
        _ => PathBuf::from(DEFAULT_STORE_DIR),
    }
}

/// Resolve the connector command from a flag, `YANGSYNC_SESSION_CMD`, or the
/// default.
pub fn resolve_session_command(flag: Option<String>) -> String {
    if let Some(command) = flag {
        return command;
    }
    match env::var(ENV_SESSION_COMMAND) {
        Ok(raw) if !raw.is_empty() => raw,
        _ => DEFAULT_SESSION_COMMAND.to_string(),
    }
}
