//! Session capability and the external-connector reference implementation.
//!
//! The crate never owns the NETCONF transport. A [`Session`] is one blocking
//! request/reply round-trip; [`CommandSession`] fulfils it by driving an
//! operator-configured external client: the RPC payload goes to the child's
//! stdin and the reply comes back as JSON on its stdout. Authentication,
//! encryption, and protocol version negotiation all live behind that command.

use crate::error::SyncError;
use crate::rpc;
use serde_json::Value;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// One blocking RPC round-trip against the remote peer.
pub trait Session {
    fn rpc(&mut self, payload: &str) -> Result<Value, SyncError>;
}

/// Connection parameters plus the connector command; fixed at construction.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// External client executable implementing the connector contract.
    pub command: String,
}

/// [`Session`] backed by the external connector command. Each call spawns the
/// connector with the connection flags and one request on stdin; the
/// connector owns the transport session and its teardown.
pub struct CommandSession {
    config: SessionConfig,
}

impl CommandSession {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl Session for CommandSession {
    fn rpc(&mut self, payload: &str) -> Result<Value, SyncError> {
        debug!(
            "issuing rpc via '{}' to {}:{}",
            self.config.command, self.config.host, self.config.port
        );
        let mut child = Command::new(&self.config.command)
            .arg("--host")
            .arg(&self.config.host)
            .arg("--port")
            .arg(self.config.port.to_string())
            .arg("--username")
            .arg(&self.config.username)
            .arg("--password")
            .arg(&self.config.password)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                SyncError::Session(format!(
                    "spawning connector '{}': {err}",
                    self.config.command
                ))
            })?;

        // The handle is dropped right after the write so the child sees EOF.
        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| SyncError::Session("connector stdin unavailable".to_string()))?;
            stdin.write_all(payload.as_bytes()).map_err(|err| {
                SyncError::Session(format!("writing request to connector: {err}"))
            })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|err| SyncError::Session(format!("waiting for connector: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SyncError::Session(format!(
                "connector exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        serde_json::from_slice(&output.stdout).map_err(|err| {
            SyncError::Session(format!("connector reply was not valid JSON: {err}"))
        })
    }
}

/// Adapt a session into the per-module fetch capability the download
/// orchestrator consumes.
pub fn schema_fetcher<'a>(
    session: &'a mut dyn Session,
) -> impl FnMut(&str) -> Result<String, SyncError> + 'a {
    move |identifier: &str| {
        let request = rpc::get_schema_request(identifier, None);
        let reply = session
            .rpc(&request)
            .map_err(|err| SyncError::ModuleFetch {
                identifier: identifier.to_string(),
                detail: err.to_string(),
            })?;
        let text = rpc::schema_text(&reply).ok_or_else(|| SyncError::ModuleFetch {
            identifier: identifier.to_string(),
            detail: "reply carries no schema payload".to_string(),
        })?;
        Ok(text.to_string())
    }
}
