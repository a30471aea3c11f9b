use std::collections::HashSet;

use chrono::NaiveDate;
use ulid::Ulid;

use crate::extract::RawEventRecord;
use crate::model::{Championship, City, Event, Member, Snapshot};

use super::reconcile::Reconciler;
use super::EngineError;

/// Everything one import run produced, ready to persist together. A batch is
/// single-use: its minted ids only make sense against the snapshot it was
/// assembled from.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub new_cities: Vec<City>,
    pub new_championships: Vec<Championship>,
    pub new_members: Vec<Member>,
    pub new_events: Vec<Event>,
}

impl ImportBatch {
    /// Cities + championships + members minted by this run.
    pub fn minted_entities(&self) -> usize {
        self.new_cities.len() + self.new_championships.len() + self.new_members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new_events.is_empty() && self.minted_entities() == 0
    }
}

/// Fold raw records, strictly in order, into one batch. Order matters: the
/// first occurrence of a name becomes the canonical entity for the run.
/// Any malformed record fails the whole run — a failed batch must never be
/// partially persisted.
pub fn assemble(records: &[RawEventRecord], snapshot: &Snapshot) -> Result<ImportBatch, EngineError> {
    let mut reconciler = Reconciler::new(snapshot);
    let mut new_events = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let date = parse_date(index, &record.date)?;
        require(index, "championship name", &record.championship_name)?;
        require(index, "city name", &record.city_name)?;

        let championship = reconciler.resolve_championship(&record.championship_name);
        let city = reconciler.resolve_city(&record.city_name, record.state_code.as_deref());

        let mut member_ids = HashSet::new();
        for name in &record.member_names {
            if name.trim().is_empty() {
                continue;
            }
            member_ids.insert(reconciler.resolve_member(name).id);
        }

        new_events.push(Event {
            id: Ulid::new(),
            championship_id: championship.id,
            city_id: city.id,
            date,
            stage: record.stage_name.trim().to_string(),
            member_ids,
            vehicle_ids: HashSet::new(),
            model_forecast: Vec::new(),
            confirmed: true,
        });
    }

    Ok(ImportBatch {
        new_cities: reconciler.new_cities,
        new_championships: reconciler.new_championships,
        new_members: reconciler.new_members,
        new_events,
    })
}

fn parse_date(index: usize, raw: &str) -> Result<NaiveDate, EngineError> {
    raw.trim()
        .parse::<NaiveDate>()
        .map_err(|e| EngineError::Validation {
            record: index,
            reason: format!("bad date {raw:?}: {e}"),
        })
}

fn require(index: usize, field: &str, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::Validation {
            record: index,
            reason: format!("{field} is empty"),
        });
    }
    Ok(())
}
