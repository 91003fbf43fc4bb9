use super::*;

use crate::effect::params::ParamValue;

fn px(r: u8, g: u8, b: u8, a: u8) -> Rgba8Premul {
    Rgba8Premul::from_array([r, g, b, a])
}

#[test]
fn over_opacity_0_is_noop() {
    let dst = px(10, 20, 30, 40);
    assert_eq!(over(dst, px(200, 0, 0, 200), 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = px(10, 20, 30, 40);
    assert_eq!(over(dst, px(0, 0, 0, 0), 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let src = px(1, 2, 3, 255);
    assert_eq!(over(px(9, 9, 9, 255), src, 1.0), src);
}

#[test]
fn over_half_alpha_blends() {
    let out = over(px(0, 0, 255, 255), px(128, 0, 0, 128), 1.0);
    assert_eq!(out.a, 255);
    assert_eq!(out.r, 128);
    assert_eq!(out.b, 127);
}

#[test]
fn lerp_endpoints() {
    let a = px(10, 20, 30, 255);
    let b = px(250, 240, 230, 255);
    assert_eq!(lerp(a, b, 0.0), a);
    assert_eq!(lerp(a, b, 1.0), b);
}

#[test]
fn generator_range_from_params() {
    let params = ParamSet::new()
        .with("first_frame", ParamValue::Int(2))
        .with("last_frame", ParamValue::Int(5));
    assert_eq!(generator_frame_range(&params), FrameRange::new(2, 5).unwrap());

    let backwards = ParamSet::new()
        .with("first_frame", ParamValue::Int(5))
        .with("last_frame", ParamValue::Int(2));
    assert!(generator_frame_range(&backwards).is_unbounded());
    assert!(generator_frame_range(&ParamSet::new()).is_unbounded());
}
