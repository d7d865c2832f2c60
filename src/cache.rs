//! Time-boxed schema cache for discovered table metadata.
//!
//! Wraps schema discovery so repeated reads within a TTL window reuse the
//! already-resolved descriptors instead of re-querying the server. One
//! entry covers the whole table set; it is replaced wholesale on refresh
//! and dropped on [`SchemaCache::clear`].
//!
//! The cache deliberately carries no rediscovery lock: concurrent forced
//! refreshes may race and the later write wins. Staleness is bounded by
//! the TTL and a stale read is only suboptimal, never unsafe. The inner
//! `RwLock` guards nothing but the entry swap itself.

use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::models::table::TableDescriptor;

/// Millisecond clock, injected so tests can assert expiry without
/// sleeping.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Schema discovery collaborator.
///
/// The cache never performs I/O itself; listing table names and fetching
/// a single table's resolved schema are delegated here.
#[async_trait]
pub trait SchemaDiscovery: Send + Sync {
    /// All table names currently known to the server.
    async fn list_table_names(&self) -> Result<Vec<String>>;

    /// One table's resolved descriptor.
    async fn table_schema(&self, table: &str) -> Result<TableDescriptor>;
}

/// Snapshot of cache validity. Pure read, no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    /// Whether a valid (non-expired) entry exists right now.
    pub cached: bool,

    /// Age of the current entry, if any (expired entries still report
    /// their age).
    pub age: Option<Duration>,

    /// Configured time-to-live.
    pub ttl: Duration,
}

struct CacheEntry {
    /// Descriptors keyed by table name.
    tables: BTreeMap<String, Arc<TableDescriptor>>,
    cached_at_millis: u64,
}

/// Time-boxed cache over [`SchemaDiscovery`].
///
/// One instance per process, shared by handle. Construct with an
/// injected [`Clock`] to make expiry deterministic in tests.
pub struct SchemaCache {
    discovery: Arc<dyn SchemaDiscovery>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl SchemaCache {
    /// Create a cache over `discovery` with the given TTL and the system
    /// clock.
    pub fn new(discovery: Arc<dyn SchemaDiscovery>, ttl: Duration) -> Self {
        Self::with_clock(discovery, ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock (tests inject a manual one).
    pub fn with_clock(
        discovery: Arc<dyn SchemaDiscovery>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            discovery,
            clock,
            ttl,
            entry: RwLock::new(None),
        }
    }

    fn entry_age(&self, entry: &CacheEntry) -> Duration {
        Duration::from_millis(self.clock.now_millis().saturating_sub(entry.cached_at_millis))
    }

    fn entry_valid(&self, entry: &CacheEntry) -> bool {
        self.entry_age(entry) < self.ttl
    }

    /// All tables, served from a valid entry unless `force_refresh`.
    ///
    /// A refresh lists table names and fetches each table's schema; a
    /// table whose discovery fails is skipped with a warning so one
    /// broken table cannot hide the rest. A failed *listing* propagates
    /// and leaves any previous entry untouched (stale-but-available to
    /// later reads within the TTL).
    pub async fn get_all_tables(&self, force_refresh: bool) -> Result<Vec<Arc<TableDescriptor>>> {
        if !force_refresh {
            let guard = self.entry.read();
            if let Some(entry) = guard.as_ref() {
                if self.entry_valid(entry) {
                    debug!("[SCHEMA_CACHE] serving {} tables from cache", entry.tables.len());
                    return Ok(entry.tables.values().cloned().collect());
                }
            }
        }

        let names = self.discovery.list_table_names().await?;
        debug!("[SCHEMA_CACHE] rediscovering {} tables", names.len());

        let mut tables = BTreeMap::new();
        for name in names {
            match self.discovery.table_schema(&name).await {
                Ok(descriptor) => {
                    tables.insert(name, Arc::new(descriptor));
                }
                Err(err) => warn!("[SCHEMA_CACHE] skipping table '{}': {}", name, err),
            }
        }

        let descriptors: Vec<Arc<TableDescriptor>> = tables.values().cloned().collect();
        *self.entry.write() = Some(CacheEntry {
            tables,
            cached_at_millis: self.clock.now_millis(),
        });
        Ok(descriptors)
    }

    /// One table, served from a valid entry when present.
    ///
    /// On a miss (or `force_refresh`) this performs single-table
    /// discovery rather than a full-set rediscovery. The fetched
    /// descriptor is merged into an existing valid entry so later reads
    /// can serve it, but it never creates a bulk entry: the bulk table
    /// membership is only trusted after a full discovery, and may stay
    /// incoherent with single-table refreshes until then.
    pub async fn get_table(&self, name: &str, force_refresh: bool) -> Result<Arc<TableDescriptor>> {
        if !force_refresh {
            let guard = self.entry.read();
            if let Some(entry) = guard.as_ref() {
                if self.entry_valid(entry) {
                    if let Some(descriptor) = entry.tables.get(name) {
                        debug!("[SCHEMA_CACHE] serving table '{}' from cache", name);
                        return Ok(Arc::clone(descriptor));
                    }
                }
            }
        }

        let descriptor = Arc::new(self.discovery.table_schema(name).await?);

        let mut guard = self.entry.write();
        if let Some(entry) = guard.as_mut() {
            if self.entry_valid(entry) {
                entry
                    .tables
                    .insert(name.to_string(), Arc::clone(&descriptor));
            }
        }
        Ok(descriptor)
    }

    /// Drop the entry; the next read forces full rediscovery.
    pub fn clear(&self) {
        debug!("[SCHEMA_CACHE] cleared");
        *self.entry.write() = None;
    }

    /// Current validity snapshot.
    pub fn status(&self) -> CacheStatus {
        let guard = self.entry.read();
        match guard.as_ref() {
            Some(entry) => {
                let age = self.entry_age(entry);
                CacheStatus {
                    cached: age < self.ttl,
                    age: Some(age),
                    ttl: self.ttl,
                }
            }
            None => CacheStatus {
                cached: false,
                age: None,
                ttl: self.ttl,
            },
        }
    }
}
