use tracing::{info, warn};

use crate::extract::RawEventRecord;
use crate::model::{Event, Id, Snapshot};
use crate::observability;
use crate::store::{Record, Table};

use super::guard::{self, RefKind};
use super::import::{self, ImportBatch};
use super::{Engine, EngineError, conflict};

impl Engine {
    /// Validate and insert a new event. The conflict check runs against a
    /// fresh snapshot, not whatever the authoring form was built from — two
    /// authors racing on the same date must not both get their save in.
    pub async fn create_event(&self, mut event: Event) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        check_event_refs(&snapshot, &event)?;
        self.check_conflicts(&snapshot, &event)?;
        event.model_forecast.retain(|f| f.quantity > 0);
        self.store.insert(Record::Event(event.clone())).await?;
        metrics::counter!(observability::EVENTS_SAVED_TOTAL).increment(1);
        info!(event = %event.id, date = %event.date, "event created");
        Ok(())
    }

    /// Replace an existing event. Same validation as create; the event never
    /// conflicts with its own previous version.
    pub async fn update_event(&self, mut event: Event) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        if snapshot.event(event.id).is_none() {
            return Err(EngineError::NotFound(event.id));
        }
        check_event_refs(&snapshot, &event)?;
        self.check_conflicts(&snapshot, &event)?;
        event.model_forecast.retain(|f| f.quantity > 0);
        self.store.update(Record::Event(event.clone())).await?;
        metrics::counter!(observability::EVENTS_SAVED_TOTAL).increment(1);
        info!(event = %event.id, "event updated");
        Ok(())
    }

    pub async fn delete_event(&self, id: Id) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        if snapshot.event(id).is_none() {
            return Err(EngineError::NotFound(id));
        }
        self.store.delete(Table::Events, id).await?;
        Ok(())
    }

    pub async fn delete_championship(&self, id: Id) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        if snapshot.championship(id).is_none() {
            return Err(EngineError::NotFound(id));
        }
        self.guarded_delete(RefKind::Championship, Table::Championships, id, &snapshot)
            .await
    }

    pub async fn delete_city(&self, id: Id) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        if snapshot.city(id).is_none() {
            return Err(EngineError::NotFound(id));
        }
        self.guarded_delete(RefKind::City, Table::Cities, id, &snapshot)
            .await
    }

    /// Ungated: historical events keep the dangling id and render it "N/A".
    pub async fn delete_member(&self, id: Id) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        if snapshot.member(id).is_none() {
            return Err(EngineError::NotFound(id));
        }
        Ok(self.store.delete(Table::Members, id).await?)
    }

    /// Ungated, like member deletion.
    pub async fn delete_vehicle(&self, id: Id) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        if snapshot.vehicle(id).is_none() {
            return Err(EngineError::NotFound(id));
        }
        Ok(self.store.delete(Table::Vehicles, id).await?)
    }

    /// Ungated, like member deletion.
    pub async fn delete_model(&self, id: Id) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        if snapshot.model(id).is_none() {
            return Err(EngineError::NotFound(id));
        }
        Ok(self.store.delete(Table::Models, id).await?)
    }

    /// Set the forecast quantity of one model on one event. Zero removes the
    /// pair instead of storing a zero entry.
    pub async fn set_model_forecast(
        &self,
        event_id: Id,
        model_id: Id,
        quantity: u32,
    ) -> Result<(), EngineError> {
        let snapshot = self.snapshot().await?;
        let mut event = snapshot
            .event(event_id)
            .cloned()
            .ok_or(EngineError::NotFound(event_id))?;
        event.set_forecast(model_id, quantity);
        Ok(self.store.update(Record::Event(event)).await?)
    }

    /// Preview step: pure assembly over a fresh snapshot. Discardable and
    /// re-runnable; nothing is written.
    pub async fn preview_import(
        &self,
        records: &[RawEventRecord],
    ) -> Result<ImportBatch, EngineError> {
        let snapshot = self.snapshot().await?;
        import::assemble(records, &snapshot)
    }

    /// Commit step: persist one batch, inserting referenced entities before
    /// the events that point at them. The store is per-row, so a failure
    /// mid-batch leaves earlier rows in place — the error is surfaced and
    /// the user retries the whole import from the source text.
    pub async fn commit_import(&self, batch: ImportBatch) -> Result<(), EngineError> {
        let minted = batch.minted_entities();
        let events = batch.new_events.len();

        for city in batch.new_cities {
            self.store.insert(Record::City(city)).await?;
        }
        for championship in batch.new_championships {
            self.store.insert(Record::Championship(championship)).await?;
        }
        for member in batch.new_members {
            self.store.insert(Record::Member(member)).await?;
        }
        for event in batch.new_events {
            self.store.insert(Record::Event(event)).await?;
        }

        metrics::counter!(observability::IMPORTS_TOTAL).increment(1);
        metrics::counter!(observability::IMPORT_EVENTS_TOTAL).increment(events as u64);
        metrics::counter!(observability::IMPORT_ENTITIES_MINTED_TOTAL).increment(minted as u64);
        info!(events, minted, "import committed");
        Ok(())
    }

    fn check_conflicts(&self, snapshot: &Snapshot, event: &Event) -> Result<(), EngineError> {
        if let Some(c) = conflict::first_conflict(&snapshot.events, event) {
            metrics::counter!(observability::CONFLICTS_REJECTED_TOTAL).increment(1);
            warn!(
                event = %event.id,
                resource = %c.resource_id,
                competing = %c.event_id,
                "save rejected: {} already booked", c.kind
            );
            return Err(EngineError::Conflict {
                kind: c.kind,
                resource_id: c.resource_id,
                event_id: c.event_id,
            });
        }
        Ok(())
    }

    async fn guarded_delete(
        &self,
        kind: RefKind,
        table: Table,
        id: Id,
        snapshot: &Snapshot,
    ) -> Result<(), EngineError> {
        let refs = guard::referencing_events(kind, id, &snapshot.events);
        if !refs.is_empty() {
            metrics::counter!(observability::DELETES_BLOCKED_TOTAL).increment(1);
            warn!(entity = %id, referencing = refs.len(), "delete blocked");
            return Err(EngineError::ReferencedByEvents {
                id,
                event_ids: refs,
            });
        }
        Ok(self.store.delete(table, id).await?)
    }
}

/// Required many-to-one references must exist. Member/vehicle ids are not
/// checked here: dangling ones are tolerated by design.
fn check_event_refs(snapshot: &Snapshot, event: &Event) -> Result<(), EngineError> {
    if snapshot.championship(event.championship_id).is_none() {
        return Err(EngineError::NotFound(event.championship_id));
    }
    if snapshot.city(event.city_id).is_none() {
        return Err(EngineError::NotFound(event.city_id));
    }
    Ok(())
}
