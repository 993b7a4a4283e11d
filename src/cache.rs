use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

/// Per-tenant cache of unfiltered entity listings.
///
/// Keyed by `(table, company_id)`. Entries expire after the configured TTL and
/// are dropped whenever a mutation touches the same table for the same tenant.
pub struct ListCache {
    ttl: Duration,
    /// (table, company_id) -> (stored_at, rows)
    entries: DashMap<(&'static str, Uuid), (Instant, Value)>,
    /// Bumped by every invalidation. A listing read under an older
    /// generation is never stored.
    generations: DashMap<(&'static str, Uuid), u64>,
}

impl ListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    /// Current generation of a key. Read it before querying and hand it to `put`.
    pub fn generation(&self, table: &'static str, company_id: Uuid) -> u64 {
        self.generations
            .get(&(table, company_id))
            .map_or(0, |generation| *generation)
    }

    pub fn get(&self, table: &'static str, company_id: Uuid) -> Option<Value> {
        let entry = self.entries.get(&(table, company_id))?;
        let (stored_at, rows) = entry.value();
        if stored_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(&(table, company_id));
            return None;
        }
        Some(rows.clone())
    }

    /// Store rows read at `generation`. Dropped if the key was invalidated since.
    pub fn put(&self, table: &'static str, company_id: Uuid, generation: u64, rows: Value) {
        if self.ttl.is_zero() {
            return;
        }
        let key = (table, company_id);
        // The guard blocks `invalidate` until the insert is done.
        let current = self.generations.entry(key).or_insert(0);
        if *current != generation {
            return;
        }
        self.entries.insert(key, (Instant::now(), rows));
    }

    pub fn invalidate(&self, table: &'static str, company_id: Uuid) {
        *self.generations.entry((table, company_id)).or_insert(0) += 1;
        if self.entries.remove(&(table, company_id)).is_some() {
            tracing::debug!("Invalidated {table} cache for company {company_id}");
        }
    }

    /// Remove expired entries.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, (stored_at, _)| stored_at.elapsed() <= ttl);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hit_after_put() {
        let cache = ListCache::new(Duration::from_secs(60));
        let company = Uuid::now_v7();
        cache.put("assets", company, 0, json!([{ "name": "Laptop" }]));

        assert_eq!(cache.get("assets", company), Some(json!([{ "name": "Laptop" }])));
    }

    #[test]
    fn tenants_do_not_share_entries() {
        let cache = ListCache::new(Duration::from_secs(60));
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        cache.put("assets", a, 0, json!([1]));

        assert!(cache.get("assets", b).is_none());
        assert!(cache.get("licenses", a).is_none());
    }

    #[test]
    fn invalidate_drops_entry() {
        let cache = ListCache::new(Duration::from_secs(60));
        let company = Uuid::now_v7();
        cache.put("assets", company, 0, json!([]));
        cache.invalidate("assets", company);

        assert!(cache.get("assets", company).is_none());
    }

    #[test]
    fn rows_read_before_invalidation_are_not_stored() {
        let cache = ListCache::new(Duration::from_secs(60));
        let company = Uuid::now_v7();
        let before = cache.generation("assets", company);

        cache.invalidate("assets", company);
        cache.put("assets", company, before, json!([{ "name": "Stale" }]));
        assert!(cache.get("assets", company).is_none());

        let after = cache.generation("assets", company);
        assert_ne!(before, after);
        cache.put("assets", company, after, json!([{ "name": "Fresh" }]));
        assert_eq!(cache.get("assets", company), Some(json!([{ "name": "Fresh" }])));
    }

    #[test]
    fn expired_entries_are_purged() {
        let cache = ListCache::new(Duration::from_millis(1));
        let company = Uuid::now_v7();
        cache.put("assets", company, 0, json!([]));
        std::thread::sleep(Duration::from_millis(5));

        cache.purge_expired();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = ListCache::new(Duration::ZERO);
        let company = Uuid::now_v7();
        cache.put("assets", company, 0, json!([]));

        assert!(cache.get("assets", company).is_none());
    }
}
