use std::collections::HashSet;

use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Member,
    Vehicle,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Member => write!(f, "member"),
            ResourceKind::Vehicle => write!(f, "vehicle"),
        }
    }
}

/// Member and vehicle ids already committed on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupied {
    pub member_ids: HashSet<Ulid>,
    pub vehicle_ids: HashSet<Ulid>,
}

impl Occupied {
    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty() && self.vehicle_ids.is_empty()
    }
}

/// Union of member/vehicle assignments across all events on `date`, skipping
/// `exclude_event_id` so an event under edit never conflicts with itself.
/// Pure: recompute whenever the target date changes.
pub fn occupied(events: &[Event], date: NaiveDate, exclude_event_id: Option<Ulid>) -> Occupied {
    let mut occ = Occupied::default();
    for event in events {
        if event.date != date || Some(event.id) == exclude_event_id {
            continue;
        }
        occ.member_ids.extend(event.member_ids.iter().copied());
        occ.vehicle_ids.extend(event.vehicle_ids.iter().copied());
    }
    occ
}

/// One double-booking: which resource, and which competing event holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ResourceKind,
    pub resource_id: Ulid,
    pub event_id: Ulid,
}

/// Scan for a member or vehicle of `candidate` already taken by another event
/// on the same date. Used at the write boundary against a fresh snapshot —
/// the interactive check alone is not enough, two authors can race past it.
pub fn first_conflict(events: &[Event], candidate: &Event) -> Option<Conflict> {
    for event in events {
        if event.date != candidate.date || event.id == candidate.id {
            continue;
        }
        if let Some(&id) = candidate
            .member_ids
            .iter()
            .find(|m| event.member_ids.contains(m))
        {
            return Some(Conflict {
                kind: ResourceKind::Member,
                resource_id: id,
                event_id: event.id,
            });
        }
        if let Some(&id) = candidate
            .vehicle_ids
            .iter()
            .find(|v| event.vehicle_ids.contains(v))
        {
            return Some(Conflict {
                kind: ResourceKind::Vehicle,
                resource_id: id,
                event_id: event.id,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn event_on(d: u32, members: &[Ulid], vehicles: &[Ulid]) -> Event {
        Event {
            id: Ulid::new(),
            championship_id: Ulid::new(),
            city_id: Ulid::new(),
            date: date(d),
            stage: String::new(),
            member_ids: members.iter().copied().collect(),
            vehicle_ids: vehicles.iter().copied().collect(),
            model_forecast: Vec::new(),
            confirmed: true,
        }
    }

    #[test]
    fn unions_same_date_events() {
        let (m1, m2, v1) = (Ulid::new(), Ulid::new(), Ulid::new());
        let events = vec![
            event_on(15, &[m1], &[v1]),
            event_on(15, &[m2], &[]),
            event_on(16, &[Ulid::new()], &[Ulid::new()]),
        ];

        let occ = occupied(&events, date(15), None);
        assert_eq!(occ.member_ids, [m1, m2].into_iter().collect());
        assert_eq!(occ.vehicle_ids, [v1].into_iter().collect());
    }

    #[test]
    fn excluded_event_does_not_conflict_with_itself() {
        let m = Ulid::new();
        let e = event_on(15, &[m], &[]);
        let id = e.id;
        let events = vec![e];

        assert!(occupied(&events, date(15), Some(id)).is_empty());
        assert!(!occupied(&events, date(15), None).is_empty());
    }

    #[test]
    fn empty_on_free_date() {
        let events = vec![event_on(15, &[Ulid::new()], &[])];
        assert!(occupied(&events, date(20), None).is_empty());
    }

    #[test]
    fn first_conflict_names_resource_and_event() {
        let m = Ulid::new();
        let existing = event_on(15, &[m], &[]);
        let existing_id = existing.id;
        let events = vec![existing];

        let candidate = event_on(15, &[m, Ulid::new()], &[]);
        let c = first_conflict(&events, &candidate).unwrap();
        assert_eq!(c.kind, ResourceKind::Member);
        assert_eq!(c.resource_id, m);
        assert_eq!(c.event_id, existing_id);
    }

    #[test]
    fn first_conflict_sees_vehicles() {
        let v = Ulid::new();
        let events = vec![event_on(15, &[], &[v])];
        let candidate = event_on(15, &[], &[v]);
        let c = first_conflict(&events, &candidate).unwrap();
        assert_eq!(c.kind, ResourceKind::Vehicle);
        assert_eq!(c.resource_id, v);
    }

    #[test]
    fn first_conflict_ignores_other_dates_and_self() {
        let m = Ulid::new();
        let mut candidate = event_on(15, &[m], &[]);
        // Same resource, different date
        let events = vec![event_on(16, &[m], &[]), candidate.clone()];
        assert_eq!(first_conflict(&events, &candidate), None);

        // Disjoint resources on the same date
        candidate.member_ids = [Ulid::new()].into_iter().collect();
        let events = vec![event_on(15, &[m], &[])];
        assert_eq!(first_conflict(&events, &candidate), None);
    }
}
