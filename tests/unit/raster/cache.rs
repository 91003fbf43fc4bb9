use super::*;

fn key(h: u64) -> ImageKey {
    ImageKey::new(Hash64(h), SequenceTime(1), ViewIndex(0), RenderScale::FULL)
}

fn image(bounds: RectI) -> Arc<Image> {
    Arc::new(Image::new_transparent(bounds).unwrap())
}

#[test]
fn lookup_requires_covering_bounds() {
    let c = MemoryImageCache::default();
    c.store(key(1), image(RectI::new(0, 0, 10, 10)), Persistence::Transient);
    assert!(c.lookup(&key(1), RectI::new(2, 2, 8, 8)).is_some());
    assert!(c.lookup(&key(1), RectI::new(2, 2, 12, 8)).is_none());
    assert!(c.lookup(&key(2), RectI::new(2, 2, 8, 8)).is_none());
    let st = c.stats();
    assert_eq!((st.hits, st.misses, st.stored), (1, 2, 1));
}

#[test]
fn first_writer_wins_for_covered_regions() {
    let c = MemoryImageCache::default();
    let first = image(RectI::new(0, 0, 10, 10));
    c.store(key(1), Arc::clone(&first), Persistence::Transient);
    c.store(key(1), image(RectI::new(0, 0, 10, 10)), Persistence::Transient);
    c.store(key(1), image(RectI::new(0, 0, 5, 5)), Persistence::Transient);
    let got = c.lookup(&key(1), RectI::new(0, 0, 10, 10)).unwrap();
    assert!(Arc::ptr_eq(&got, &first));
    assert_eq!(c.stats().redundant, 2);
    assert_eq!(c.len(), (1, 0));
}

#[test]
fn key_includes_scale_and_view() {
    let a = ImageKey::new(Hash64(1), SequenceTime(0), ViewIndex(0), RenderScale::FULL);
    let b = ImageKey::new(
        Hash64(1),
        SequenceTime(0),
        ViewIndex(0),
        RenderScale::uniform(0.5).unwrap(),
    );
    let c = ImageKey::new(Hash64(1), SequenceTime(0), ViewIndex(1), RenderScale::FULL);
    assert_ne!(a, b);
    assert_ne!(a, c);
}

#[test]
fn per_key_cap_drops_oldest_and_tracks_persistence() {
    let c = MemoryImageCache::new(MemoryCacheOpts {
        max_images_per_key: 1,
        ..MemoryCacheOpts::default()
    });
    c.store(key(1), image(RectI::new(0, 0, 2, 2)), Persistence::Transient);
    c.store(key(1), image(RectI::new(5, 5, 7, 7)), Persistence::Persistent);
    assert_eq!(c.len(), (1, 1));
    assert!(c.lookup(&key(1), RectI::new(0, 0, 2, 2)).is_none());
    c.clear();
    assert!(c.is_empty());
}

#[test]
fn total_cap_bounds_retained_images_across_keys() {
    let c = MemoryImageCache::new(MemoryCacheOpts {
        max_images: 8,
        ..MemoryCacheOpts::default()
    });
    for h in 0..400 {
        c.store(key(h), image(RectI::new(0, 0, 4, 4)), Persistence::Transient);
        assert!(c.len().0 <= 8);
    }
    assert_eq!(c.len(), (8, 0));
    assert_eq!(c.stats().evicted, 392);
    assert!(c.lookup(&key(0), RectI::new(0, 0, 4, 4)).is_none());
    assert!(c.lookup(&key(399), RectI::new(0, 0, 4, 4)).is_some());
}

#[test]
fn eviction_prefers_transient_images() {
    let c = MemoryImageCache::new(MemoryCacheOpts {
        max_images: 2,
        ..MemoryCacheOpts::default()
    });
    let r = RectI::new(0, 0, 2, 2);
    c.store(key(1), image(r), Persistence::Persistent);
    c.store(key(2), image(r), Persistence::Transient);
    c.store(key(3), image(r), Persistence::Transient);
    assert_eq!(c.len(), (2, 1));
    assert!(c.lookup(&key(1), r).is_some());
    assert!(c.lookup(&key(2), r).is_none());

    c.store(key(4), image(r), Persistence::Persistent);
    c.store(key(5), image(r), Persistence::Persistent);
    assert_eq!(c.len(), (2, 2));
    assert!(c.lookup(&key(1), r).is_none());
    assert!(c.lookup(&key(5), r).is_some());
}
