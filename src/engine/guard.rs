use ulid::Ulid;

use crate::model::Event;

/// Entity kinds whose deletion is gated on event references. Members,
/// vehicles, and equipment models delete freely; their dangling ids in
/// historical events render as "N/A" downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Championship,
    City,
}

/// Ids of events still pointing at the entity.
pub fn referencing_events(kind: RefKind, id: Ulid, events: &[Event]) -> Vec<Ulid> {
    events
        .iter()
        .filter(|e| match kind {
            RefKind::Championship => e.championship_id == id,
            RefKind::City => e.city_id == id,
        })
        .map(|e| e.id)
        .collect()
}

pub fn can_delete(kind: RefKind, id: Ulid, events: &[Event]) -> bool {
    referencing_events(kind, id, events).is_empty()
}
