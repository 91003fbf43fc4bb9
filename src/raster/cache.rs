use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::effect::fingerprint::Hash64;
use crate::foundation::core::{RenderScale, SequenceTime, ViewIndex};
use crate::raster::buffer::Image;
use crate::region::rect::RectI;

/// Identity of a cached render, independent of the region covered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageKey {
    /// Fingerprint of the effect that produced the image.
    pub hash: Hash64,
    /// Frame.
    pub time: SequenceTime,
    /// View.
    pub view: ViewIndex,
    scale_bits: (u64, u64),
}

impl ImageKey {
    /// Build a key for a render at `scale`.
    pub fn new(hash: Hash64, time: SequenceTime, view: ViewIndex, scale: RenderScale) -> Self {
        Self {
            hash,
            time,
            view,
            scale_bits: scale.bits(),
        }
    }
}

/// How long a stored image is expected to be worth keeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Persistence {
    /// Cheap to recompute; may be evicted first.
    Transient,
    /// Expensive; the effect asked for its data to be kept.
    Persistent,
}

/// Image cache consulted by the orchestrator.
///
/// Implementations must tolerate concurrent redundant stores of the same key and must never
/// hand out a partially written image.
pub trait ImageCache: Send + Sync {
    /// Return an image for `key` whose bounds cover `region`.
    fn lookup(&self, key: &ImageKey, region: RectI) -> Option<Arc<Image>>;

    /// Offer a completed image.
    fn store(&self, key: ImageKey, image: Arc<Image>, persistence: Persistence);
}

/// Cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct MemoryCacheOpts {
    /// Maximum number of images retained per key; the oldest is dropped first.
    pub max_images_per_key: usize,
    /// Maximum number of images retained across all keys. The oldest transient image is
    /// evicted first, persistent images only once no transient one is left.
    pub max_images: usize,
}

impl Default for MemoryCacheOpts {
    fn default() -> Self {
        Self {
            max_images_per_key: 4,
            max_images: 256,
        }
    }
}

/// Counters exposed for diagnostics and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing covering the region.
    pub misses: u64,
    /// Images retained by `store`.
    pub stored: u64,
    /// Stores ignored because an existing image already covered the same region.
    pub redundant: u64,
    /// Images dropped to stay under [`MemoryCacheOpts::max_images`].
    pub evicted: u64,
}

struct Entry {
    image: Arc<Image>,
    persistence: Persistence,
    seq: u64,
}

/// In-process cache keyed by [`ImageKey`], first writer wins for a covered region.
pub struct MemoryImageCache {
    opts: MemoryCacheOpts,
    entries: Mutex<HashMap<ImageKey, Vec<Entry>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    stored: AtomicU64,
    redundant: AtomicU64,
    evicted: AtomicU64,
    next_seq: AtomicU64,
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::new(MemoryCacheOpts::default())
    }
}

impl MemoryImageCache {
    /// Create an empty cache.
    pub fn new(opts: MemoryCacheOpts) -> Self {
        Self {
            opts,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stored: AtomicU64::new(0),
            redundant: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stored: self.stored.load(Ordering::Relaxed),
            redundant: self.redundant.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }

    /// Number of images currently retained, and how many of them are persistent.
    pub fn len(&self) -> (usize, usize) {
        let Ok(map) = self.entries.lock() else {
            return (0, 0);
        };
        let total = map.values().map(Vec::len).sum();
        let persistent = map
            .values()
            .flatten()
            .filter(|e| e.persistence == Persistence::Persistent)
            .count();
        (total, persistent)
    }

    /// Return `true` when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.len().0 == 0
    }

    /// Drop everything.
    pub fn clear(&self) {
        if let Ok(mut map) = self.entries.lock() {
            map.clear();
        }
    }
}

impl ImageCache for MemoryImageCache {
    fn lookup(&self, key: &ImageKey, region: RectI) -> Option<Arc<Image>> {
        let found = self.entries.lock().ok().and_then(|map| {
            map.get(key)?
                .iter()
                .find(|e| e.image.bounds().contains(region))
                .map(|e| Arc::clone(&e.image))
        });
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn store(&self, key: ImageKey, image: Arc<Image>, persistence: Persistence) {
        if image.is_empty() || self.opts.max_images_per_key == 0 || self.opts.max_images == 0
        {
            return;
        }
        let Ok(mut map) = self.entries.lock() else {
            return;
        };
        let slot = map.entry(key).or_default();
        if slot
            .iter()
            .any(|e| e.image.bounds().contains(image.bounds()))
        {
            self.redundant.fetch_add(1, Ordering::Relaxed);
            return;
        }
        if slot.len() >= self.opts.max_images_per_key {
            slot.remove(0);
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        slot.push(Entry {
            image,
            persistence,
            seq,
        });
        self.stored.fetch_add(1, Ordering::Relaxed);

        let mut total: usize = map.values().map(Vec::len).sum();
        while total > self.opts.max_images && evict_oldest(&mut map) {
            self.evicted.fetch_add(1, Ordering::Relaxed);
            total -= 1;
        }
    }
}

// Transient before persistent, then oldest store first.
fn evict_oldest(map: &mut HashMap<ImageKey, Vec<Entry>>) -> bool {
    let victim = map
        .iter()
        .flat_map(|(k, entries)| entries.iter().enumerate().map(move |(i, e)| (k, i, e)))
        .min_by_key(|(_, _, e)| (e.persistence == Persistence::Persistent, e.seq))
        .map(|(k, i, _)| (*k, i));
    let Some((key, idx)) = victim else {
        return false;
    };
    if let Some(entries) = map.get_mut(&key) {
        entries.remove(idx);
        if entries.is_empty() {
            map.remove(&key);
        }
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/raster/cache.rs"]
mod tests;
