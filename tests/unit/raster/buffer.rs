use super::*;

#[test]
fn pixel_addressing_is_absolute() {
    let mut img = Image::new_transparent(RectI::new(10, 20, 13, 22)).unwrap();
    let red = Rgba8Premul::from_straight_rgba(255, 0, 0, 255);
    img.as_tile_mut().put(12, 21, red);
    assert_eq!(img.pixel(12, 21), Some(red));
    assert_eq!(img.pixel(13, 21), None);
    assert_eq!(img.sample(0, 0), Rgba8Premul::transparent());
    assert_eq!(img.data().len(), 3 * 2 * 4);
}

#[test]
fn from_raw_checks_length() {
    assert!(Image::from_raw(RectI::new(0, 0, 2, 2), vec![0; 15]).is_err());
    assert!(Image::from_raw(RectI::new(0, 0, 2, 2), vec![0; 16]).is_ok());
}

#[test]
fn row_tiles_are_disjoint_and_cover_the_image() {
    let mut img = Image::new_transparent(RectI::new(0, 0, 3, 5)).unwrap();
    {
        let tiles = img.row_tiles_mut(2);
        let bounds: Vec<_> = tiles.iter().map(TileMut::bounds).collect();
        assert_eq!(
            bounds,
            vec![
                RectI::new(0, 0, 3, 2),
                RectI::new(0, 2, 3, 4),
                RectI::new(0, 4, 3, 5),
            ]
        );
        for (i, mut t) in tiles.into_iter().enumerate() {
            t.fill(Rgba8Premul::from_straight_rgba(i as u8, 0, 0, 255));
        }
    }
    assert_eq!(img.pixel(1, 1).unwrap().r, 0);
    assert_eq!(img.pixel(1, 3).unwrap().r, 1);
    assert_eq!(img.pixel(2, 4).unwrap().r, 2);
}

#[test]
fn tile_writes_outside_bounds_are_ignored() {
    let mut img = Image::new_transparent(RectI::new(0, 0, 2, 2)).unwrap();
    let mut tiles = img.row_tiles_mut(1);
    tiles[0].put(0, 1, Rgba8Premul::from_straight_rgba(9, 9, 9, 255));
    drop(tiles);
    assert_eq!(img.pixel(0, 1), Some(Rgba8Premul::transparent()));
}

#[test]
fn crop_requires_coverage() {
    let mut img = Image::new_transparent(RectI::new(0, 0, 4, 4)).unwrap();
    img.as_tile_mut()
        .put(2, 3, Rgba8Premul::from_straight_rgba(0, 255, 0, 255));
    let c = img.crop(RectI::new(2, 2, 4, 4)).unwrap();
    assert_eq!(c.bounds(), RectI::new(2, 2, 4, 4));
    assert_eq!(c.pixel(2, 3).unwrap().g, 255);
    assert!(img.crop(RectI::new(2, 2, 5, 4)).is_none());
}

#[test]
fn input_images_sample_transparent_when_missing() {
    let mut inputs = InputImages::with_slots(2);
    let mut img = Image::new_transparent(RectI::new(0, 0, 1, 1)).unwrap();
    img.as_tile_mut().fill(Rgba8Premul::from_straight_rgba(1, 2, 3, 255));
    inputs.set(1, Arc::new(img));
    assert!(inputs.get(0).is_none());
    assert_eq!(inputs.sample(1, 0, 0).to_array(), [1, 2, 3, 255]);
    assert_eq!(inputs.sample(0, 0, 0), Rgba8Premul::transparent());
    assert_eq!(inputs.sample(5, 0, 0), Rgba8Premul::transparent());
}
