use super::*;

#[test]
fn same_class_shares_one_lock() {
    let a = plugin_lock("test.Shared");
    let b = plugin_lock("test.Shared");
    let c = plugin_lock("test.Other");
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn rows_split_height_across_workers() {
    let opts = RenderOpts {
        min_tile_rows: 1,
        ..RenderOpts::default()
    };
    assert_eq!(tile_rows(RectI::new(0, 0, 10, 100), &opts, 4), 25);
    assert_eq!(tile_rows(RectI::new(0, 0, 10, 101), &opts, 4), 26);
}

#[test]
fn rows_respect_minimum_and_max_tiles() {
    let opts = RenderOpts::default();
    assert_eq!(tile_rows(RectI::new(0, 0, 10, 40), &opts, 8), 16);

    let opts = RenderOpts {
        min_tile_rows: 0,
        max_tiles: Some(2),
        ..RenderOpts::default()
    };
    assert_eq!(tile_rows(RectI::new(0, 0, 10, 40), &opts, 8), 20);
    assert_eq!(tile_rows(RectI::EMPTY, &opts, 8), 1);
}
