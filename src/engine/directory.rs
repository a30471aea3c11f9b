use std::collections::HashMap;

use ulid::Ulid;

/// Fold a raw name to its comparison key: trim, Unicode lowercase, and strip
/// the Latin accents that show up in pt-BR names. Matching is exact after the
/// fold — no typo tolerance, so "Cascavel" ≡ "CASCAVEL" ≡ "cascável" but
/// "Cascavell" is a different name.
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

/// Case- and accent-insensitive name index over one entity collection.
/// Rebuilt per operation from the current snapshot; no side effects.
pub struct Directory {
    by_name: HashMap<String, Ulid>,
}

impl Directory {
    /// Build from (id, name) pairs. If two stored names fold to the same key
    /// (should not happen, reconciliation never creates such pairs) the first
    /// in collection order wins, deterministically.
    pub fn build<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Ulid, &'a str)>,
    {
        let mut by_name = HashMap::new();
        for (id, name) in entries {
            by_name.entry(normalize_name(name)).or_insert(id);
        }
        Self { by_name }
    }

    /// Exact-after-normalization lookup.
    pub fn lookup(&self, raw_name: &str) -> Option<Ulid> {
        self.by_name.get(&normalize_name(raw_name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
