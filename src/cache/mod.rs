// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encryption result cache
//!
//! Records are keyed by `(data kind, canonical value string)` and are not
//! time-bounded: a cached handle stays valid until [`EncryptionCache::clear`]
//! or the owning client is reset. Concurrent writers for the same key are
//! last-writer-wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::codec::{DataKind, PlaintextValue};
use crate::session::EncryptionRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: DataKind,
    value: String,
}

impl CacheKey {
    fn new(kind: DataKind, value: &PlaintextValue) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Records currently held
    pub entries: usize,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that fell through to the engine
    pub misses: u64,
}

/// In-process store of encryption records
#[derive(Default)]
pub struct EncryptionCache {
    entries: RwLock<HashMap<CacheKey, EncryptionRecord>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EncryptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previous encryption of `value` as `kind`
    ///
    /// A hit is only returned when the stored record carries the same kind
    /// and the same canonical value.
    pub fn get(&self, kind: DataKind, value: &PlaintextValue) -> Option<EncryptionRecord> {
        let key = CacheKey::new(kind, value);
        let found = self.entries.read().ok().and_then(|entries| {
            entries
                .get(&key)
                .filter(|r| r.data_kind == key.kind && r.original_value == key.value)
                .cloned()
        });

        match found {
            Some(record) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(record)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a record under its own kind and original value
    pub fn insert(&self, record: EncryptionRecord) {
        let key = CacheKey {
            kind: record.data_kind,
            value: record.original_value.clone(),
        };
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, record);
        }
    }

    /// Drop every record; counters are kept
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
