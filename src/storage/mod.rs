//! Snapshot persistence.
//!
//! One file holds the whole serialized snapshot and is replaced atomically
//! every run. Loading is total: a missing or unreadable file degrades to an
//! empty prior state, so both the first run and a corrupt file mean "nothing
//! known yet, rebuild from live data".

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStore;

/// Persistence seam for the snapshot mapping.
#[async_trait]
pub trait SnapshotStore {
    /// Load the prior snapshot. Absence or corruption yields an empty
    /// mapping, never an error.
    async fn load(&self) -> Snapshot;

    /// Persist the new snapshot, replacing the previous one whole.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
