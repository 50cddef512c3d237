//! Local schema store.
//!
//! One directory holds every module's state, encoded purely in filenames:
//! `<id>.yang` is a downloaded payload, `<id>.yang.yes` is a zero-byte
//! "queued for download" sentinel, and `<id>.yang.no` is an operator-placed
//! "never download" sentinel. The payload file is authoritative: a stale
//! `.yes` sentinel next to a payload reads as enabled.

use crate::error::SyncError;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PAYLOAD_SUFFIX: &str = ".yang";
pub const MARKED_SUFFIX: &str = ".yang.yes";
pub const DISABLED_SUFFIX: &str = ".yang.no";

/// Per-module download state, derived from which files exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleState {
    /// Never seen: no file for the identifier.
    Absent,
    /// Queued for download, not yet fetched.
    Marked,
    /// Downloaded and available for use.
    Enabled,
    /// Intentionally excluded from automatic download.
    Disabled,
}

/// Handle on the store directory. The path is fixed at construction.
#[derive(Clone, Debug)]
pub struct SchemaStore {
    dir: PathBuf,
}

impl SchemaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if needed and validate it. Idempotent;
    /// every state-mutating operation calls this first.
    pub fn ensure_ready(&self) -> Result<(), SyncError> {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            return Err(SyncError::StoreUnavailable {
                path: self.dir.clone(),
                reason: err.to_string(),
            });
        }
        if !self.dir.is_dir() {
            return Err(SyncError::StoreUnavailable {
                path: self.dir.clone(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(())
    }

    pub fn payload_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}{PAYLOAD_SUFFIX}"))
    }

    fn marked_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}{MARKED_SUFFIX}"))
    }

    fn disabled_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}{DISABLED_SUFFIX}"))
    }

    /// Direct per-module probe. Unlike [`snapshot`](Self::snapshot) this sees
    /// mutations made after a listing was taken, so the download loop uses it
    /// to re-check each module just before fetching.
    pub fn state_of(&self, identifier: &str) -> ModuleState {
        if self.payload_path(identifier).is_file() {
            return ModuleState::Enabled;
        }
        if self.disabled_path(identifier).is_file() {
            return ModuleState::Disabled;
        }
        if self.marked_path(identifier).is_file() {
            return ModuleState::Marked;
        }
        ModuleState::Absent
    }

    /// Decode one directory listing into a per-identifier state map, so bulk
    /// passes never re-scan the directory per module.
    pub fn snapshot(&self) -> Result<StoreSnapshot, SyncError> {
        let entries = fs::read_dir(&self.dir).map_err(|err| SyncError::StoreUnavailable {
            path: self.dir.clone(),
            reason: err.to_string(),
        })?;

        let mut states: BTreeMap<String, ModuleState> = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|err| SyncError::StoreUnavailable {
                path: self.dir.clone(),
                reason: err.to_string(),
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some((identifier, state)) = classify(name) else {
                continue;
            };
            merge_state(&mut states, identifier.to_string(), state);
        }
        Ok(StoreSnapshot { states })
    }

    /// Queue a module for download by creating its empty sentinel. Marking
    /// never overwrites an existing decision: any state other than absent is
    /// left untouched.
    pub fn mark(&self, identifier: &str) -> Result<(), SyncError> {
        if self.state_of(identifier) != ModuleState::Absent {
            debug!("not marking {identifier}: already decided");
            return Ok(());
        }
        fs::write(self.marked_path(identifier), b"").map_err(|source| SyncError::StoreWrite {
            identifier: identifier.to_string(),
            source,
        })
    }

    pub fn list_marked(&self) -> Result<BTreeSet<String>, SyncError> {
        Ok(self.snapshot()?.in_state(ModuleState::Marked))
    }

    pub fn list_enabled(&self) -> Result<BTreeSet<String>, SyncError> {
        Ok(self.snapshot()?.in_state(ModuleState::Enabled))
    }

    pub fn list_disabled(&self) -> Result<BTreeSet<String>, SyncError> {
        Ok(self.snapshot()?.in_state(ModuleState::Disabled))
    }

    /// Write a downloaded payload and clear the module's marked sentinel.
    ///
    /// A payload write failure leaves prior state intact. A sentinel removal
    /// failure after a successful write is not an error: the payload file is
    /// the authoritative signal and the stray sentinel is ignored by state
    /// lookups.
    pub fn persist_payload(&self, identifier: &str, payload: &[u8]) -> Result<(), SyncError> {
        let path = self.payload_path(identifier);
        fs::write(&path, payload).map_err(|source| SyncError::StoreWrite {
            identifier: identifier.to_string(),
            source,
        })?;
        debug!("wrote {} ({} bytes)", path.display(), payload.len());

        let sentinel = self.marked_path(identifier);
        if sentinel.exists() {
            if let Err(err) = fs::remove_file(&sentinel) {
                warn!("could not remove sentinel {}: {err}", sentinel.display());
            }
        }
        Ok(())
    }
}

/// One directory listing, decoded. Lookup is O(log n) and iteration order is
/// the sorted identifier order.
#[derive(Debug, Default)]
pub struct StoreSnapshot {
    states: BTreeMap<String, ModuleState>,
}

impl StoreSnapshot {
    pub fn state(&self, identifier: &str) -> ModuleState {
        self.states
            .get(identifier)
            .copied()
            .unwrap_or(ModuleState::Absent)
    }

    pub fn in_state(&self, state: ModuleState) -> BTreeSet<String> {
        self.states
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(identifier, _)| identifier.clone())
            .collect()
    }
}

fn classify(name: &str) -> Option<(&str, ModuleState)> {
    let (identifier, state) = if let Some(identifier) = name.strip_suffix(MARKED_SUFFIX) {
        (identifier, ModuleState::Marked)
    } else if let Some(identifier) = name.strip_suffix(DISABLED_SUFFIX) {
        (identifier, ModuleState::Disabled)
    } else if let Some(identifier) = name.strip_suffix(PAYLOAD_SUFFIX) {
        (identifier, ModuleState::Enabled)
    } else {
        return None;
    };
    if identifier.is_empty() {
        return None;
    }
    Some((identifier, state))
}

// Stale files can overlap; the payload always wins, and an operator's `.no`
// outranks a leftover `.yes`.
fn merge_state(states: &mut BTreeMap<String, ModuleState>, identifier: String, state: ModuleState) {
    use std::collections::btree_map::Entry;
    match states.entry(identifier) {
        Entry::Vacant(slot) => {
            slot.insert(state);
        }
        Entry::Occupied(mut slot) => {
            if precedence(state) > precedence(*slot.get()) {
                slot.insert(state);
            }
        }
    }
}

fn precedence(state: ModuleState) -> u8 {
    match state {
        ModuleState::Absent => 0,
        ModuleState::Marked => 1,
        ModuleState::Disabled => 2,
        ModuleState::Enabled => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SchemaStore {
        SchemaStore::new(dir.path())
    }

    #[test]
    fn ensure_ready_creates_the_directory() {
        let temp = TempDir::new().unwrap();
        let store = SchemaStore::new(temp.path().join("yang"));
        store.ensure_ready().unwrap();
        assert!(store.dir().is_dir());
        store.ensure_ready().unwrap();
    }

    #[test]
    fn ensure_ready_rejects_a_file_in_the_way() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("yang");
        fs::write(&blocker, b"not a directory").unwrap();
        let store = SchemaStore::new(&blocker);
        let err = store.ensure_ready().unwrap_err();
        assert!(matches!(err, SyncError::StoreUnavailable { .. }));
    }

    #[test]
    fn mark_creates_sentinel_and_lists_it() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.mark("ietf-interfaces").unwrap();
        assert_eq!(store.state_of("ietf-interfaces"), ModuleState::Marked);
        assert!(temp.path().join("ietf-interfaces.yang.yes").is_file());
        assert!(store.list_marked().unwrap().contains("ietf-interfaces"));
    }

    #[test]
    fn mark_never_overwrites_a_decision() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.persist_payload("a", b"module a { }").unwrap();
        fs::write(temp.path().join("b.yang.no"), b"").unwrap();

        store.mark("a").unwrap();
        store.mark("b").unwrap();

        assert_eq!(store.state_of("a"), ModuleState::Enabled);
        assert_eq!(store.state_of("b"), ModuleState::Disabled);
        assert!(!temp.path().join("a.yang.yes").exists());
        assert!(!temp.path().join("b.yang.yes").exists());
    }

    #[test]
    fn persist_payload_clears_the_sentinel() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.mark("ietf-interfaces").unwrap();
        store
            .persist_payload("ietf-interfaces", b"module ietf-interfaces { }")
            .unwrap();
        assert_eq!(store.state_of("ietf-interfaces"), ModuleState::Enabled);
        assert!(!temp.path().join("ietf-interfaces.yang.yes").exists());
        let written = fs::read_to_string(temp.path().join("ietf-interfaces.yang")).unwrap();
        assert_eq!(written, "module ietf-interfaces { }");
    }

    #[test]
    fn payload_outranks_a_stale_sentinel() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(temp.path().join("a.yang"), b"module a { }").unwrap();
        fs::write(temp.path().join("a.yang.yes"), b"").unwrap();

        assert_eq!(store.state_of("a"), ModuleState::Enabled);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.state("a"), ModuleState::Enabled);
        assert!(!snapshot.in_state(ModuleState::Marked).contains("a"));
    }

    #[test]
    fn disabled_outranks_a_stale_sentinel() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(temp.path().join("a.yang.no"), b"").unwrap();
        fs::write(temp.path().join("a.yang.yes"), b"").unwrap();

        assert_eq!(store.state_of("a"), ModuleState::Disabled);
        assert_eq!(store.snapshot().unwrap().state("a"), ModuleState::Disabled);
    }

    #[test]
    fn lists_are_split_by_suffix_and_sorted() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(temp.path().join("zebra.yang"), b"z").unwrap();
        fs::write(temp.path().join("alpha.yang"), b"a").unwrap();
        fs::write(temp.path().join("queued.yang.yes"), b"").unwrap();
        fs::write(temp.path().join("never.yang.no"), b"").unwrap();
        fs::write(temp.path().join("README.txt"), b"ignored").unwrap();

        let enabled: Vec<String> = store.list_enabled().unwrap().into_iter().collect();
        assert_eq!(enabled, vec!["alpha".to_string(), "zebra".to_string()]);
        assert_eq!(store.list_marked().unwrap().len(), 1);
        assert_eq!(store.list_disabled().unwrap().len(), 1);
    }

    #[test]
    fn unknown_module_is_absent() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert_eq!(store.state_of("nope"), ModuleState::Absent);
        assert_eq!(store.snapshot().unwrap().state("nope"), ModuleState::Absent);
    }
}
