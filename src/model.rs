use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Opaque entity id — one type for every table, never reused.
pub type Id = Ulid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: Id,
    pub name: String,
    /// Two-letter region code. `"XX"` when the source text gave none.
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Championship {
    pub id: Id,
    /// Natural key for reconciliation.
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    Master,
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Id,
    /// Natural key for reconciliation.
    pub name: String,
    pub role: String,
    /// Inactive members are excluded from scheduling pools.
    pub active: bool,
    pub email: Option<String>,
    pub access_level: Option<AccessLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Id,
    pub kind: String,
    pub plate: String,
    pub brand: String,
    pub model: String,
    /// Out-of-service vehicles are excluded from scheduling pools.
    pub status: bool,
}

/// Inventory catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentModel {
    pub id: Id,
    pub kind: String,
    pub brand: String,
    pub model: String,
}

/// Planned quantity of one equipment model for one event. Quantity is always
/// positive: a zero is pruned, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub model_id: Id,
    pub quantity: u32,
}

/// The central scheduling unit: one race stage on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Id,
    pub championship_id: Id,
    pub city_id: Id,
    /// Calendar date, no time component.
    pub date: NaiveDate,
    pub stage: String,
    pub member_ids: HashSet<Id>,
    pub vehicle_ids: HashSet<Id>,
    pub model_forecast: Vec<ForecastEntry>,
    pub confirmed: bool,
}

impl Event {
    /// Upsert the forecast quantity for a model. Zero removes the entry.
    pub fn set_forecast(&mut self, model_id: Id, quantity: u32) {
        self.model_forecast.retain(|f| f.model_id != model_id);
        if quantity > 0 {
            self.model_forecast.push(ForecastEntry { model_id, quantity });
        }
    }

    pub fn forecast_for(&self, model_id: Id) -> Option<u32> {
        self.model_forecast
            .iter()
            .find(|f| f.model_id == model_id)
            .map(|f| f.quantity)
    }
}

/// Fetch-all result: the full dataset as of one store read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cities: Vec<City>,
    pub championships: Vec<Championship>,
    pub members: Vec<Member>,
    pub vehicles: Vec<Vehicle>,
    pub models: Vec<EquipmentModel>,
    pub events: Vec<Event>,
}

impl Snapshot {
    pub fn city(&self, id: Id) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    pub fn championship(&self, id: Id) -> Option<&Championship> {
        self.championships.iter().find(|c| c.id == id)
    }

    pub fn member(&self, id: Id) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn vehicle(&self, id: Id) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn model(&self, id: Id) -> Option<&EquipmentModel> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn event(&self, id: Id) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_event() -> Event {
        Event {
            id: Ulid::new(),
            championship_id: Ulid::new(),
            city_id: Ulid::new(),
            date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            stage: "Etapa 1".into(),
            member_ids: HashSet::new(),
            vehicle_ids: HashSet::new(),
            model_forecast: Vec::new(),
            confirmed: true,
        }
    }

    #[test]
    fn forecast_upsert_replaces() {
        let mut e = blank_event();
        let md = Ulid::new();
        e.set_forecast(md, 3);
        e.set_forecast(md, 5);
        assert_eq!(e.forecast_for(md), Some(5));
        assert_eq!(e.model_forecast.len(), 1);
    }

    #[test]
    fn forecast_zero_prunes_entry() {
        let mut e = blank_event();
        let md = Ulid::new();
        e.set_forecast(md, 3);
        e.set_forecast(md, 0);
        assert_eq!(e.forecast_for(md), None);
        assert!(e.model_forecast.is_empty());
    }

    #[test]
    fn forecast_zero_on_absent_model_is_noop() {
        let mut e = blank_event();
        e.set_forecast(Ulid::new(), 0);
        assert!(e.model_forecast.is_empty());
    }

    #[test]
    fn event_serialization_roundtrip() {
        let mut e = blank_event();
        e.member_ids.insert(Ulid::new());
        e.set_forecast(Ulid::new(), 2);
        let json = serde_json::to_string(&e).unwrap();
        let decoded: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(e, decoded);
    }

    #[test]
    fn snapshot_lookup_by_id() {
        let c = Championship {
            id: Ulid::new(),
            name: "Copa Truck".into(),
        };
        let snapshot = Snapshot {
            championships: vec![c.clone()],
            ..Default::default()
        };
        assert_eq!(snapshot.championship(c.id), Some(&c));
        assert_eq!(snapshot.championship(Ulid::new()), None);
    }
}
