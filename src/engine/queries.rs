use chrono::NaiveDate;

use crate::model::{Event, Id, Member, Snapshot, Vehicle};

use super::conflict::{self, Occupied};
use super::{Engine, EngineError};

const UNKNOWN: &str = "N/A";

impl Engine {
    /// Resources already committed on `date`. The authoring UI re-runs this
    /// whenever the target date changes.
    pub async fn occupied_on(
        &self,
        date: NaiveDate,
        exclude_event_id: Option<Id>,
    ) -> Result<Occupied, EngineError> {
        let snapshot = self.snapshot().await?;
        Ok(conflict::occupied(&snapshot.events, date, exclude_event_id))
    }

    /// Members selectable for an event on `date`: active and not booked
    /// elsewhere that day.
    pub async fn available_members(
        &self,
        date: NaiveDate,
        exclude_event_id: Option<Id>,
    ) -> Result<Vec<Member>, EngineError> {
        let snapshot = self.snapshot().await?;
        let occ = conflict::occupied(&snapshot.events, date, exclude_event_id);
        Ok(snapshot
            .members
            .into_iter()
            .filter(|m| m.active && !occ.member_ids.contains(&m.id))
            .collect())
    }

    /// Vehicles selectable for an event on `date`: in service and not booked
    /// elsewhere that day.
    pub async fn available_vehicles(
        &self,
        date: NaiveDate,
        exclude_event_id: Option<Id>,
    ) -> Result<Vec<Vehicle>, EngineError> {
        let snapshot = self.snapshot().await?;
        let occ = conflict::occupied(&snapshot.events, date, exclude_event_id);
        Ok(snapshot
            .vehicles
            .into_iter()
            .filter(|v| v.status && !occ.vehicle_ids.contains(&v.id))
            .collect())
    }
}

/// An event rendered with names instead of ids. Dangling references come out
/// as "N/A" — historical events may outlive the rows they point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub id: Id,
    pub championship: String,
    pub city: String,
    pub date: NaiveDate,
    pub stage: String,
    pub members: Vec<String>,
    pub vehicles: Vec<String>,
    pub confirmed: bool,
}

pub fn event_summary(snapshot: &Snapshot, event: &Event) -> EventSummary {
    let mut members: Vec<String> = event
        .member_ids
        .iter()
        .map(|&id| {
            snapshot
                .member(id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| UNKNOWN.into())
        })
        .collect();
    members.sort();

    let mut vehicles: Vec<String> = event
        .vehicle_ids
        .iter()
        .map(|&id| {
            snapshot
                .vehicle(id)
                .map(|v| v.plate.clone())
                .unwrap_or_else(|| UNKNOWN.into())
        })
        .collect();
    vehicles.sort();

    EventSummary {
        id: event.id,
        championship: snapshot
            .championship(event.championship_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN.into()),
        city: snapshot
            .city(event.city_id)
            .map(|c| format!("{}/{}", c.name, c.state))
            .unwrap_or_else(|| UNKNOWN.into()),
        date: event.date,
        stage: event.stage.clone(),
        members,
        vehicles,
        confirmed: event.confirmed,
    }
}
