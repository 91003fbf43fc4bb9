use crate::foundation::core::{FrameRange, Rgba8Premul};
use crate::effect::params::ParamSet;

/// `src` over `dst`, premultiplied, with `src` scaled by `opacity`.
pub(crate) fn over(dst: Rgba8Premul, src: Rgba8Premul, opacity: f64) -> Rgba8Premul {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src.a == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src.a), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let d = dst.to_array();
    let s = src.to_array();
    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(d[3]), inv));
    for i in 0..3 {
        out[i] = mul_div255(u16::from(s[i]), op).saturating_add(mul_div255(u16::from(d[i]), inv));
    }
    Rgba8Premul::from_array(out)
}

/// Linear mix from `a` (`t = 0`) to `b` (`t = 1`).
pub(crate) fn lerp(a: Rgba8Premul, b: Rgba8Premul, t: f64) -> Rgba8Premul {
    let t = ((t.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - t;
    let a = a.to_array();
    let b = b.to_array();
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = mul_div255(u16::from(a[i]), it).saturating_add(mul_div255(u16::from(b[i]), t));
    }
    Rgba8Premul::from_array(out)
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Frame range from the `first_frame`/`last_frame` parameters of a generator.
pub(crate) fn generator_frame_range(params: &ParamSet) -> FrameRange {
    match (params.int("first_frame"), params.int("last_frame")) {
        (Ok(first), Ok(last)) => FrameRange::new(first, last).unwrap_or(FrameRange::UNBOUNDED),
        _ => FrameRange::UNBOUNDED,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pixel.rs"]
mod tests;
