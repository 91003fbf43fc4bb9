use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(2, 5).unwrap();
    assert!(!r.contains(SequenceTime(1)));
    assert!(r.contains(SequenceTime(2)));
    assert!(r.contains(SequenceTime(5)));
    assert!(!r.contains(SequenceTime(6)));
    assert_eq!(r.len_frames(), Some(4));
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(3, 2).is_err());
}

#[test]
fn frame_range_merge_takes_min_first_and_max_last() {
    let a = FrameRange::new(1, 10).unwrap();
    let b = FrameRange::new(-4, 6).unwrap();
    assert_eq!(a.merge(b), FrameRange::new(-4, 10).unwrap());
    assert!(FrameRange::UNBOUNDED.is_unbounded());
    assert_eq!(FrameRange::UNBOUNDED.len_frames(), None);
}

#[test]
fn render_scale_rejects_non_positive() {
    assert!(RenderScale::uniform(0.0).is_err());
    assert!(RenderScale::uniform(f64::NAN).is_err());
    assert_eq!(RenderScale::uniform(1.0).unwrap(), RenderScale::FULL);
}

#[test]
fn premultiply_rounds_half_up() {
    let px = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(px.to_array(), [128, 64, 0, 128]);
    assert_eq!(
        Rgba8Premul::from_unit_rgba([1.0, 1.0, 1.0, 1.0]).to_array(),
        [255, 255, 255, 255]
    );
}
