use async_trait::async_trait;
use dashmap::DashMap;

use crate::model::*;

/// The six persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Cities,
    Championships,
    Members,
    Vehicles,
    Models,
    Events,
}

/// A row for insert/update. The table is implied by the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    City(City),
    Championship(Championship),
    Member(Member),
    Vehicle(Vehicle),
    Model(EquipmentModel),
    Event(Event),
}

impl Record {
    pub fn table(&self) -> Table {
        match self {
            Record::City(_) => Table::Cities,
            Record::Championship(_) => Table::Championships,
            Record::Member(_) => Table::Members,
            Record::Vehicle(_) => Table::Vehicles,
            Record::Model(_) => Table::Models,
            Record::Event(_) => Table::Events,
        }
    }

    pub fn id(&self) -> Id {
        match self {
            Record::City(c) => c.id,
            Record::Championship(c) => c.id,
            Record::Member(m) => m.id,
            Record::Vehicle(v) => v.id,
            Record::Model(m) => m.id,
            Record::Event(e) => e.id,
        }
    }
}

#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Persistence collaborator: one fetch-all read plus per-row writes.
/// No multi-row transactions — batch callers order their inserts so that
/// referenced rows land first.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Snapshot, StoreError>;
    async fn insert(&self, record: Record) -> Result<(), StoreError>;
    async fn update(&self, record: Record) -> Result<(), StoreError>;
    async fn delete(&self, table: Table, id: Id) -> Result<(), StoreError>;
}

/// Reference store: one concurrent map per table. Snapshots are sorted by id
/// so collection order is stable across reads (ids are time-ordered ULIDs).
#[derive(Default)]
pub struct InMemoryStore {
    cities: DashMap<Id, City>,
    championships: DashMap<Id, Championship>,
    members: DashMap<Id, Member>,
    vehicles: DashMap<Id, Vehicle>,
    models: DashMap<Id, EquipmentModel>,
    events: DashMap<Id, Event>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table_for(&self, table: Table) -> &dyn RowMap {
        match table {
            Table::Cities => &self.cities,
            Table::Championships => &self.championships,
            Table::Members => &self.members,
            Table::Vehicles => &self.vehicles,
            Table::Models => &self.models,
            Table::Events => &self.events,
        }
    }

    fn put(&self, record: Record) {
        match record {
            Record::City(c) => {
                self.cities.insert(c.id, c);
            }
            Record::Championship(c) => {
                self.championships.insert(c.id, c);
            }
            Record::Member(m) => {
                self.members.insert(m.id, m);
            }
            Record::Vehicle(v) => {
                self.vehicles.insert(v.id, v);
            }
            Record::Model(m) => {
                self.models.insert(m.id, m);
            }
            Record::Event(e) => {
                self.events.insert(e.id, e);
            }
        }
    }
}

/// Untyped view of one table, enough for existence checks and deletes.
trait RowMap {
    fn contains(&self, id: &Id) -> bool;
    fn remove(&self, id: &Id) -> bool;
}

impl<V: Send + Sync + 'static> RowMap for DashMap<Id, V> {
    fn contains(&self, id: &Id) -> bool {
        self.contains_key(id)
    }

    fn remove(&self, id: &Id) -> bool {
        DashMap::remove(self, id).is_some()
    }
}

fn sorted_rows<V: Clone>(map: &DashMap<Id, V>) -> Vec<V> {
    let mut rows: Vec<(Id, V)> = map
        .iter()
        .map(|e| (*e.key(), e.value().clone()))
        .collect();
    rows.sort_by_key(|(id, _)| *id);
    rows.into_iter().map(|(_, v)| v).collect()
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn fetch_all(&self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot {
            cities: sorted_rows(&self.cities),
            championships: sorted_rows(&self.championships),
            members: sorted_rows(&self.members),
            vehicles: sorted_rows(&self.vehicles),
            models: sorted_rows(&self.models),
            events: sorted_rows(&self.events),
        })
    }

    async fn insert(&self, record: Record) -> Result<(), StoreError> {
        let id = record.id();
        if self.table_for(record.table()).contains(&id) {
            return Err(StoreError(format!("insert: duplicate id {id}")));
        }
        self.put(record);
        Ok(())
    }

    async fn update(&self, record: Record) -> Result<(), StoreError> {
        let id = record.id();
        if !self.table_for(record.table()).contains(&id) {
            return Err(StoreError(format!("update: no row {id}")));
        }
        self.put(record);
        Ok(())
    }

    async fn delete(&self, table: Table, id: Id) -> Result<(), StoreError> {
        if !self.table_for(table).remove(&id) {
            return Err(StoreError(format!("delete: no row {id}")));
        }
        Ok(())
    }
}
