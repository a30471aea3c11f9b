use ulid::Ulid;

use crate::store::StoreError;

use super::conflict::ResourceKind;

/// Every failure here is local, synchronous, and recoverable — nothing in
/// this crate is fatal.
#[derive(Debug)]
pub enum EngineError {
    /// A raw import record is missing or malformed; the whole batch is
    /// discarded. `record` is the zero-based index in the extracted sequence.
    Validation { record: usize, reason: String },
    /// The member/vehicle is already committed to `event_id` on that date.
    Conflict {
        kind: ResourceKind,
        resource_id: Ulid,
        event_id: Ulid,
    },
    /// Championship/city delete blocked by events still pointing at it.
    ReferencedByEvents { id: Ulid, event_ids: Vec<Ulid> },
    /// Mutation aimed at an id absent from the current snapshot.
    NotFound(Ulid),
    Store(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation { record, reason } => {
                write!(f, "invalid import record {record}: {reason}")
            }
            EngineError::Conflict {
                kind,
                resource_id,
                event_id,
            } => {
                write!(
                    f,
                    "{kind} {resource_id} is already assigned to event {event_id} on that date"
                )
            }
            EngineError::ReferencedByEvents { id, event_ids } => {
                write!(
                    f,
                    "cannot delete {id}: referenced by {} event(s): {event_ids:?}",
                    event_ids.len()
                )
            }
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Store(e.0)
    }
}
