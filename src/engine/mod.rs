pub mod conflict;
mod directory;
mod error;
pub mod guard;
mod import;
mod mutations;
mod queries;
mod reconcile;

pub use conflict::{Conflict, Occupied, ResourceKind, first_conflict, occupied};
pub use directory::{Directory, normalize_name};
pub use error::EngineError;
pub use guard::{RefKind, can_delete, referencing_events};
pub use import::{ImportBatch, assemble};
pub use queries::{EventSummary, event_summary};
pub use reconcile::{Reconciler, Resolved};

use std::sync::Arc;

use crate::model::Snapshot;
use crate::store::DataStore;

/// Core service over an injected store handle. The embedder constructs the
/// store once at startup and passes it in; the engine keeps no global
/// connection state.
pub struct Engine {
    store: Arc<dyn DataStore>,
}

impl Engine {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Fresh fetch-all. Every validating operation starts from one of these
    /// rather than a cached dataset.
    pub(crate) async fn snapshot(&self) -> Result<Snapshot, EngineError> {
        Ok(self.store.fetch_all().await?)
    }
}
