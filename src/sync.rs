//! The synchronization engine: catalog reconciliation and marked-module
//! download orchestration.
//!
//! Reconciliation only decides *what* to fetch; the download pass fetches
//! whatever is marked. Keeping the two apart makes the download side
//! resumable: a re-run continues from the surviving sentinels without
//! re-fetching anything already enabled.

use crate::catalog::SchemaInfo;
use crate::error::SyncError;
use crate::store::{ModuleState, SchemaStore};
use tracing::{debug, info, warn};

/// Outcome of one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Modules newly queued for download.
    pub marked: usize,
    /// Modules already marked, enabled, or disabled.
    pub skipped: usize,
}

/// Aggregated outcome of one download pass. Built incrementally during the
/// run and returned to the caller; never persisted.
#[derive(Clone, Debug, Default)]
pub struct SyncReport {
    pub downloaded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// One line per module (and per batch-level note), in processing order.
    pub messages: Vec<String>,
}

impl SyncReport {
    pub fn summary(&self) -> String {
        format!(
            "downloaded {} modules, failed {}, skipped {}",
            self.downloaded, self.failed, self.skipped
        )
    }
}

/// Mark every catalog module the store has never seen; skip the rest.
///
/// Modules that are already marked, enabled, or disabled are never re-marked,
/// so repeated reconciliation against an unchanged catalog is idempotent.
pub fn reconcile(store: &SchemaStore, catalog: &[SchemaInfo]) -> Result<ReconcileOutcome, SyncError> {
    store.ensure_ready()?;
    let snapshot = store.snapshot()?;
    let mut outcome = ReconcileOutcome::default();
    for entry in catalog {
        match snapshot.state(&entry.identifier) {
            ModuleState::Absent => {
                store.mark(&entry.identifier)?;
                debug!("marked {} for download", entry.identifier);
                outcome.marked += 1;
            }
            _ => outcome.skipped += 1,
        }
    }
    info!(
        "reconciliation done: marked {}, skipped {}",
        outcome.marked, outcome.skipped
    );
    Ok(outcome)
}

/// Download every marked module through `fetch_one`, continuing past
/// per-module failures. Safe to re-run after a partial failure: modules that
/// became enabled or disabled since the listing are skipped without a fetch,
/// and failed modules stay marked for the next run.
pub fn download_marked<F>(store: &SchemaStore, mut fetch_one: F) -> Result<SyncReport, SyncError>
where
    F: FnMut(&str) -> Result<String, SyncError>,
{
    store.ensure_ready()?;
    let marked = store.list_marked()?;
    let mut report = SyncReport::default();

    if marked.is_empty() {
        info!("nothing marked for download");
        report
            .messages
            .push("no modules marked for download; run --list first".to_string());
        return Ok(report);
    }

    let total = marked.len();
    for (index, identifier) in marked.iter().enumerate() {
        // A previous iteration, a previous run, or an operator may have
        // settled this module since the listing was taken.
        match store.state_of(identifier) {
            ModuleState::Enabled => {
                debug!("skipping {identifier}: already downloaded");
                report.messages.push(format!("skipped {identifier}: already downloaded"));
                report.skipped += 1;
                continue;
            }
            ModuleState::Disabled => {
                debug!("skipping {identifier}: disabled");
                report.messages.push(format!("skipped {identifier}: disabled"));
                report.skipped += 1;
                continue;
            }
            ModuleState::Marked | ModuleState::Absent => {}
        }

        info!("downloading module {identifier}, {}/{total}", index + 1);
        let payload = match fetch_one(identifier) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("fetch failed for {identifier}: {err}");
                report.messages.push(format!("failed {identifier}: {err}"));
                report.failed += 1;
                continue;
            }
        };

        match store.persist_payload(identifier, payload.as_bytes()) {
            Ok(()) => {
                report.messages.push(format!("downloaded {identifier}"));
                report.downloaded += 1;
            }
            Err(err) => {
                // Still marked; the next run retries it.
                warn!("persisting {identifier} failed: {err}");
                report.messages.push(format!("failed {identifier}: {err}"));
                report.failed += 1;
            }
        }
    }

    info!("download pass done: {}", report.summary());
    Ok(report)
}
