//! Latest-analysis snapshot shared between one background writer and any
//! number of readers, plus the poller that refreshes it.

#![allow(missing_docs)]

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::core::config::AnalysisConfig;
use crate::core::errors::{Result, WsError};
use crate::workspace::stats::{WorkspaceAnalysis, analyze};

/// Holds the most recent analysis. Readers get a cheap `Arc` clone and never
/// observe a half-written value.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    slot: RwLock<Slot>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    latest: Option<Arc<WorkspaceAnalysis>>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, analysis: WorkspaceAnalysis) {
        let next = Arc::new(analysis);
        let mut slot = self.slot.write();
        slot.latest = Some(next);
        slot.generation += 1;
    }

    /// Most recent snapshot, if any analysis has completed.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<WorkspaceAnalysis>> {
        self.slot.read().latest.clone()
    }

    /// Number of snapshots published so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }
}

/// Handle to a running [`AnalysisPoller`] thread.
#[derive(Debug)]
pub struct PollerHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Signal the poller to exit and wait for it.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        // A full or disconnected channel both mean the poller is already leaving.
        let _ = self.stop_tx.try_send(());
        if let Some(thread) = self.thread.take() {
            thread.join().map_err(|_| WsError::Runtime {
                details: "analysis poller panicked".to_string(),
            })?;
        }
        Ok(())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

/// Periodically re-analyzes a root and publishes into a [`SnapshotStore`].
#[derive(Debug, Clone)]
pub struct AnalysisPoller {
    root: PathBuf,
    config: AnalysisConfig,
    interval: Duration,
}

impl AnalysisPoller {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: AnalysisConfig, interval: Duration) -> Self {
        Self {
            root: root.into(),
            config,
            interval,
        }
    }

    /// Run one analysis and publish it. A failed analysis keeps the previous
    /// snapshot.
    pub fn refresh(&self, store: &SnapshotStore) -> Result<()> {
        let analysis = analyze(&self.root, &self.config)?;
        store.publish(analysis);
        Ok(())
    }

    /// Start the background loop. The first analysis runs immediately.
    pub fn spawn(self, store: Arc<SnapshotStore>) -> Result<PollerHandle> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let thread = thread::Builder::new()
            .name("wsw-poller".to_string())
            .spawn(move || self.run(&store, &stop_rx))
            .map_err(|err| WsError::Runtime {
                details: format!("failed to spawn poller thread: {err}"),
            })?;
        Ok(PollerHandle {
            stop_tx,
            thread: Some(thread),
        })
    }

    fn run(&self, store: &SnapshotStore, stop_rx: &Receiver<()>) {
        info!(root = %self.root.display(), interval_secs = self.interval.as_secs(), "poller started");
        loop {
            if let Err(err) = self.refresh(store) {
                warn!(error = %err, code = err.code(), "analysis refresh failed");
            }
            match stop_rx.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        info!("poller stopped");
    }
}
