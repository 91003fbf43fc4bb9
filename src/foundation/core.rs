use crate::foundation::error::{FxError, FxResult};
use crate::region::rect::RectI;

/// Frame number on the project timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SequenceTime(pub i64);

/// Index of a view (e.g. left/right eye) in a multi-view project.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ViewIndex(pub u32);

/// Proxy scale a render is requested at. `1.0` is full resolution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderScale {
    /// Horizontal scale factor.
    pub x: f64,
    /// Vertical scale factor.
    pub y: f64,
}

impl RenderScale {
    /// Full resolution.
    pub const FULL: Self = Self { x: 1.0, y: 1.0 };

    /// Create a validated uniform scale.
    pub fn uniform(s: f64) -> FxResult<Self> {
        if !s.is_finite() || s <= 0.0 {
            return Err(FxError::validation("render scale must be finite and > 0"));
        }
        Ok(Self { x: s, y: s })
    }

    pub(crate) fn bits(self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl Default for RenderScale {
    fn default() -> Self {
        Self::FULL
    }
}

/// Inclusive frame range `[first, last]` an effect can produce frames for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame (inclusive).
    pub first: SequenceTime,
    /// Last frame (inclusive).
    pub last: SequenceTime,
}

impl FrameRange {
    /// Range with no bounds. Reported when nothing constrains the timeline.
    pub const UNBOUNDED: Self = Self {
        first: SequenceTime(i64::MIN),
        last: SequenceTime(i64::MAX),
    };

    /// Create a validated range with `first <= last`.
    pub fn new(first: i64, last: i64) -> FxResult<Self> {
        if first > last {
            return Err(FxError::validation("FrameRange first must be <= last"));
        }
        Ok(Self {
            first: SequenceTime(first),
            last: SequenceTime(last),
        })
    }

    /// Smallest range covering both `self` and `other`.
    pub fn merge(self, other: Self) -> Self {
        Self {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        }
    }

    /// Return `true` when `t` is inside `[first, last]`.
    pub fn contains(self, t: SequenceTime) -> bool {
        self.first <= t && t <= self.last
    }

    /// Return `true` when either bound is open.
    pub fn is_unbounded(self) -> bool {
        self.first.0 == i64::MIN || self.last.0 == i64::MAX
    }

    /// Number of frames, or `None` for unbounded ranges.
    pub fn len_frames(self) -> Option<u64> {
        if self.is_unbounded() {
            return None;
        }
        Some(self.last.0.abs_diff(self.first.0) + 1)
    }
}

/// Project output format in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Format {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Format {
    /// The format as a rectangle anchored at the origin.
    pub fn to_rect(self) -> RectI {
        RectI::from_size(self.width, self.height)
    }
}

impl Default for Format {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Convert a straight-alpha `[0, 1]` float colour, clamping out of range channels.
    pub fn from_unit_rgba(c: [f64; 4]) -> Self {
        fn q(v: f64) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::from_straight_rgba(q(c[0]), q(c[1]), q(c[2]), q(c[3]))
    }

    /// Channels in memory order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from channels in memory order.
    pub fn from_array(px: [u8; 4]) -> Self {
        Self {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
