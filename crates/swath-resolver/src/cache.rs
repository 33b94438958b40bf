//! Identity-keyed cache of adjusted geolocation fields.
//!
//! Distinct data fields whose resolution produces the identical
//! (base field, map combination) share one descriptor, so the expansion
//! kernel runs at most once per identity while a buffer stays resident.

use std::collections::HashMap;

use lru::LruCache;
use swath_core::{SwathError, SwathResult};

use crate::adjusted::AdjustedField;

/// Opaque handle of a cached adjusted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdjustedId(pub(crate) usize);

/// Statistics about the adjusted-field cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Resolutions that found an existing descriptor.
    pub hits: u64,
    /// Resolutions that created a new descriptor.
    pub misses: u64,
    /// Buffer computations performed (at most one per identity while the
    /// buffer stays resident).
    pub materializations: u64,
    /// Buffers released under memory pressure.
    pub evictions: u64,
    /// Number of descriptors.
    pub entries: usize,
    /// Bytes held by resident buffers.
    pub memory_bytes: u64,
}

/// Arena of adjusted-field descriptors with identity deduplication and a
/// memory-bounded buffer residency ledger.
pub struct AdjustedFieldCache {
    entries: Vec<AdjustedField>,
    by_identity: HashMap<String, AdjustedId>,
    /// Recency order of resident buffers; value is the buffer size so the
    /// eviction loop can account without touching the entry.
    recency: LruCache<AdjustedId, usize>,
    memory_limit: usize,
    current_memory: usize,
    hits: u64,
    misses: u64,
    materializations: u64,
    evictions: u64,
}

impl AdjustedFieldCache {
    /// Create a cache with the given resident-buffer memory limit in bytes.
    pub fn new(memory_limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            by_identity: HashMap::new(),
            recency: LruCache::unbounded(),
            memory_limit,
            current_memory: 0,
            hits: 0,
            misses: 0,
            materializations: 0,
            evictions: 0,
        }
    }

    /// Look up a descriptor by identity.
    pub fn lookup(&self, identity: &str) -> Option<AdjustedId> {
        self.by_identity.get(identity).copied()
    }

    /// Return the existing descriptor for `identity` or build and store a
    /// new one. Two resolutions yielding equal identities return the same
    /// handle.
    pub fn get_or_create<F>(&mut self, identity: &str, factory: F) -> SwathResult<AdjustedId>
    where
        F: FnOnce() -> SwathResult<AdjustedField>,
    {
        if let Some(id) = self.by_identity.get(identity) {
            self.hits += 1;
            return Ok(*id);
        }

        let field = factory()?;
        if field.identity != identity {
            return Err(SwathError::config(format!(
                "descriptor identity '{}' does not match requested '{}'",
                field.identity, identity
            )));
        }
        let id = AdjustedId(self.entries.len());
        self.by_identity.insert(identity.to_string(), id);
        self.entries.push(field);
        self.misses += 1;
        Ok(id)
    }

    /// Borrow a descriptor.
    pub fn get(&self, id: AdjustedId) -> &AdjustedField {
        &self.entries[id.0]
    }

    /// Mutably borrow a descriptor.
    pub(crate) fn get_mut(&mut self, id: AdjustedId) -> &mut AdjustedField {
        &mut self.entries[id.0]
    }

    /// Mark a descriptor as computing. The transient state keeps a failed
    /// expansion from ever looking `Ready`.
    pub(crate) fn begin_compute(&mut self, id: AdjustedId) {
        self.entries[id.0].mark_computing();
    }

    /// Install a freshly computed buffer, evicting least-recently-used
    /// buffers if the memory limit would be exceeded.
    pub(crate) fn install_buffer(&mut self, id: AdjustedId, buffer: Vec<f64>) {
        let size = buffer.len() * std::mem::size_of::<f64>();

        while self.current_memory + size > self.memory_limit && !self.recency.is_empty() {
            if let Some((victim, victim_size)) = self.recency.pop_lru() {
                self.entries[victim.0].release();
                self.current_memory = self.current_memory.saturating_sub(victim_size);
                self.evictions += 1;
                tracing::warn!(
                    identity = %self.entries[victim.0].identity,
                    bytes = victim_size,
                    "released adjusted buffer under memory pressure"
                );
            }
        }

        self.entries[id.0].install(buffer);
        self.recency.put(id, size);
        self.current_memory += size;
        self.materializations += 1;
    }

    /// Mark a failed computation, returning the descriptor to the
    /// uninitialized state.
    pub(crate) fn abort_compute(&mut self, id: AdjustedId) {
        self.entries[id.0].release();
    }

    /// Borrow a resident buffer, refreshing its recency.
    pub(crate) fn touch_buffer(&mut self, id: AdjustedId) -> Option<&[f64]> {
        if self.entries[id.0].is_ready() {
            self.recency.promote(&id);
        }
        self.entries[id.0].buffer()
    }

    /// Release one descriptor's buffer explicitly.
    pub fn release(&mut self, id: AdjustedId) {
        if let Some(size) = self.recency.pop(&id) {
            self.current_memory = self.current_memory.saturating_sub(size);
        }
        self.entries[id.0].release();
    }

    /// Release least-recently-used buffers until resident memory drops to
    /// the target. Returns the number of buffers released.
    pub fn release_to(&mut self, target_bytes: usize) -> usize {
        let mut released = 0;
        while self.current_memory > target_bytes && !self.recency.is_empty() {
            if let Some((victim, size)) = self.recency.pop_lru() {
                self.entries[victim.0].release();
                self.current_memory = self.current_memory.saturating_sub(size);
                self.evictions += 1;
                released += 1;
            }
        }
        released
    }

    /// Release every resident buffer.
    pub fn clear_buffers(&mut self) {
        self.release_to(0);
    }

    /// Iterate over all descriptor handles.
    pub fn ids(&self) -> impl Iterator<Item = AdjustedId> + '_ {
        (0..self.entries.len()).map(AdjustedId)
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            materializations: self.materializations,
            evictions: self.evictions,
            entries: self.entries.len(),
            memory_bytes: self.current_memory as u64,
        }
    }
}
