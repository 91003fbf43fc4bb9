use super::*;

#[test]
fn union_treats_empty_as_neutral() {
    let a = RectI::new(0, 0, 10, 10);
    assert_eq!(a.union(RectI::EMPTY), a);
    assert_eq!(RectI::EMPTY.union(a), a);
    assert_eq!(
        a.union(RectI::new(20, 5, 30, 8)),
        RectI::new(0, 0, 30, 10)
    );
}

#[test]
fn intersect_of_disjoint_is_none() {
    let a = RectI::new(0, 0, 100, 100);
    let b = RectI::new(100, 0, 200, 100);
    assert_eq!(a.intersect(b), None);
    assert_eq!(
        a.intersect(RectI::new(50, 50, 150, 150)),
        Some(RectI::new(50, 50, 100, 100))
    );
}

#[test]
fn empty_and_size_queries() {
    assert!(RectI::new(5, 5, 5, 10).is_empty());
    assert!(RectI::new(5, 5, 4, 10).is_empty());
    let r = RectI::new(-3, 2, 7, 4);
    assert_eq!((r.width(), r.height(), r.area()), (10, 2, 20));
    assert_eq!(RectI::new(5, 5, 4, 10).width(), 0);
}

#[test]
fn contains_and_dilate() {
    let r = RectI::new(10, 10, 20, 20);
    assert!(r.dilate(2).contains(r));
    assert!(!r.contains(r.dilate(1)));
    assert!(r.contains(RectI::EMPTY));
    assert!(r.contains_point(10, 19));
    assert!(!r.contains_point(20, 10));
    assert_eq!(r.translate(-10, 5), RectI::new(0, 15, 10, 25));
}

#[test]
fn row_bands_cover_without_overlap() {
    let r = RectI::new(0, 3, 4, 13);
    let bands: Vec<_> = r.row_bands(4).collect();
    assert_eq!(
        bands,
        vec![
            RectI::new(0, 3, 4, 7),
            RectI::new(0, 7, 4, 11),
            RectI::new(0, 11, 4, 13),
        ]
    );
    assert_eq!(RectI::EMPTY.row_bands(4).count(), 0);
}

#[test]
fn infinite_edges_clip_individually() {
    let format = RectI::new(0, 0, 1920, 1080);
    assert!(RectI::INFINITE.is_infinite());
    assert_eq!(RectI::INFINITE.clip_infinite_to(format), format);

    let half = RectI::new(-50, i32::MIN, i32::MAX, 40);
    assert!(half.is_infinite());
    assert_eq!(half.clip_infinite_to(format), RectI::new(-50, 0, 1920, 40));

    let finite = RectI::new(-10, -10, 5000, 5000);
    assert!(!finite.is_infinite());
    assert_eq!(finite.clip_infinite_to(format), finite);
}
