//! Background monitoring: latest-snapshot store and periodic analysis poller.

pub mod snapshot;

pub use snapshot::{AnalysisPoller, PollerHandle, SnapshotStore};
