use ulid::Ulid;

use crate::model::{Championship, City, Member, Snapshot};

use super::directory::{Directory, normalize_name};

/// Outcome of resolving one raw name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub id: Ulid,
    pub is_new: bool,
}

/// Resolves free-text names to canonical ids: first against the snapshot's
/// directories, then against entities minted earlier in the same batch, and
/// only then by minting a new entity. The batch-local lists are shared across
/// every record of one import run, so the first occurrence of a name becomes
/// the canonical instance and is never created twice.
pub struct Reconciler {
    championships: Directory,
    cities: Directory,
    members: Directory,
    pub new_championships: Vec<Championship>,
    pub new_cities: Vec<City>,
    pub new_members: Vec<Member>,
}

impl Reconciler {
    pub fn new(snapshot: &Snapshot) -> Self {
        Self {
            championships: Directory::build(
                snapshot
                    .championships
                    .iter()
                    .map(|c| (c.id, c.name.as_str())),
            ),
            cities: Directory::build(snapshot.cities.iter().map(|c| (c.id, c.name.as_str()))),
            members: Directory::build(snapshot.members.iter().map(|m| (m.id, m.name.as_str()))),
            new_championships: Vec::new(),
            new_cities: Vec::new(),
            new_members: Vec::new(),
        }
    }

    pub fn resolve_championship(&mut self, raw_name: &str) -> Resolved {
        if let Some(id) = self.championships.lookup(raw_name) {
            return Resolved { id, is_new: false };
        }
        let key = normalize_name(raw_name);
        if let Some(c) = self
            .new_championships
            .iter()
            .find(|c| normalize_name(&c.name) == key)
        {
            return Resolved {
                id: c.id,
                is_new: false,
            };
        }
        let id = Ulid::new();
        self.new_championships.push(Championship {
            id,
            name: raw_name.trim().to_string(),
        });
        Resolved { id, is_new: true }
    }

    /// `state_code` comes from the raw record when present; a minted city
    /// without one gets the `"XX"` sentinel.
    pub fn resolve_city(&mut self, raw_name: &str, state_code: Option<&str>) -> Resolved {
        if let Some(id) = self.cities.lookup(raw_name) {
            return Resolved { id, is_new: false };
        }
        let key = normalize_name(raw_name);
        if let Some(c) = self.new_cities.iter().find(|c| normalize_name(&c.name) == key) {
            return Resolved {
                id: c.id,
                is_new: false,
            };
        }
        let state = state_code
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "XX".to_string());
        let id = Ulid::new();
        self.new_cities.push(City {
            id,
            name: raw_name.trim().to_string(),
            state,
        });
        Resolved { id, is_new: true }
    }

    pub fn resolve_member(&mut self, raw_name: &str) -> Resolved {
        if let Some(id) = self.members.lookup(raw_name) {
            return Resolved { id, is_new: false };
        }
        let key = normalize_name(raw_name);
        if let Some(m) = self
            .new_members
            .iter()
            .find(|m| normalize_name(&m.name) == key)
        {
            return Resolved {
                id: m.id,
                is_new: false,
            };
        }
        let id = Ulid::new();
        self.new_members.push(Member {
            id,
            name: raw_name.trim().to_string(),
            role: "Novo".to_string(),
            active: true,
            email: None,
            access_level: None,
        });
        Resolved { id, is_new: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_championship(name: &str) -> (Snapshot, Ulid) {
        let id = Ulid::new();
        let snapshot = Snapshot {
            championships: vec![Championship {
                id,
                name: name.into(),
            }],
            ..Default::default()
        };
        (snapshot, id)
    }

    #[test]
    fn existing_name_resolves_case_insensitively() {
        let (snapshot, id) = snapshot_with_championship("Copa Truck");
        let mut r = Reconciler::new(&snapshot);

        let a = r.resolve_championship("copa TRUCK");
        let b = r.resolve_championship("COPA truck");
        assert_eq!(a, Resolved { id, is_new: false });
        assert_eq!(b, Resolved { id, is_new: false });
        assert!(r.new_championships.is_empty());
    }

    #[test]
    fn second_mention_reuses_batch_local_mint() {
        let mut r = Reconciler::new(&Snapshot::default());

        let first = r.resolve_city("Cascavel", Some("PR"));
        let second = r.resolve_city("CASCAVEL", Some("PR"));
        assert!(first.is_new);
        assert!(!second.is_new);
        assert_eq!(first.id, second.id);
        assert_eq!(r.new_cities.len(), 1);
        assert_eq!(r.new_cities[0].state, "PR");
    }

    #[test]
    fn minted_city_without_state_gets_sentinel() {
        let mut r = Reconciler::new(&Snapshot::default());
        r.resolve_city("Toledo", None);
        assert_eq!(r.new_cities[0].state, "XX");
    }

    #[test]
    fn minted_member_gets_defaults() {
        let mut r = Reconciler::new(&Snapshot::default());
        let resolved = r.resolve_member("  Ana Souza ");
        assert!(resolved.is_new);

        let m = &r.new_members[0];
        assert_eq!(m.name, "Ana Souza");
        assert_eq!(m.role, "Novo");
        assert!(m.active);
        assert_eq!(m.email, None);
        assert_eq!(m.access_level, None);
    }

    #[test]
    fn resolution_is_idempotent_within_a_batch() {
        let mut r = Reconciler::new(&Snapshot::default());
        let a = r.resolve_member("Bruno Lima");
        let b = r.resolve_member("bruno lima");
        let c = r.resolve_member("BRUNO LIMA");
        assert_eq!(a.id, b.id);
        assert_eq!(b.id, c.id);
        assert_eq!(r.new_members.len(), 1);
    }

    #[test]
    fn accented_mention_matches_existing_unaccented() {
        let id = Ulid::new();
        let snapshot = Snapshot {
            cities: vec![City {
                id,
                name: "Goiania".into(),
                state: "GO".into(),
            }],
            ..Default::default()
        };
        let mut r = Reconciler::new(&snapshot);
        assert_eq!(
            r.resolve_city("Goiânia", Some("GO")),
            Resolved { id, is_new: false }
        );
    }
}
