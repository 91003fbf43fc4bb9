/// Axis-aligned integer rectangle, half-open: `[x1, x2) x [y1, y2)`.
///
/// Any rectangle with `x2 <= x1` or `y2 <= y1` is empty; all empty rectangles compare
/// equal through [`RectI::is_empty`] but are not normalised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RectI {
    /// Left edge (inclusive).
    pub x1: i32,
    /// Bottom edge (inclusive). Image rows are stored starting at `y1`.
    pub y1: i32,
    /// Right edge (exclusive).
    pub x2: i32,
    /// Top edge (exclusive).
    pub y2: i32,
}

impl RectI {
    /// The canonical empty rectangle.
    pub const EMPTY: Self = Self {
        x1: 0,
        y1: 0,
        x2: 0,
        y2: 0,
    };

    /// Unbounded extent, used by generators that can produce any pixel.
    pub const INFINITE: Self = Self {
        x1: i32::MIN,
        y1: i32::MIN,
        x2: i32::MAX,
        y2: i32::MAX,
    };

    /// Create a rectangle from its edges.
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle of `width x height` anchored at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        )
    }

    /// Width in pixels, zero when empty.
    pub fn width(self) -> u32 {
        if self.x2 <= self.x1 {
            0
        } else {
            self.x1.abs_diff(self.x2)
        }
    }

    /// Height in pixels, zero when empty.
    pub fn height(self) -> u32 {
        if self.y2 <= self.y1 {
            0
        } else {
            self.y1.abs_diff(self.y2)
        }
    }

    /// Pixel count.
    pub fn area(self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Return `true` when the rectangle covers no pixel.
    pub fn is_empty(self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    /// Smallest rectangle covering both. Empty operands are neutral.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Overlap of both rectangles, or `None` when they do not share a pixel.
    pub fn intersect(self, other: Self) -> Option<Self> {
        let r = Self {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        };
        (!r.is_empty()).then_some(r)
    }

    /// Return `true` when `other` lies entirely inside `self`. Empty `other` is always contained.
    pub fn contains(self, other: Self) -> bool {
        other.is_empty()
            || (self.x1 <= other.x1
                && self.y1 <= other.y1
                && other.x2 <= self.x2
                && other.y2 <= self.y2)
    }

    /// Return `true` when pixel `(x, y)` lies inside.
    pub fn contains_point(self, x: i32, y: i32) -> bool {
        self.x1 <= x && x < self.x2 && self.y1 <= y && y < self.y2
    }

    /// Grow every edge outwards by `by` pixels (saturating).
    pub fn dilate(self, by: i32) -> Self {
        Self {
            x1: self.x1.saturating_sub(by),
            y1: self.y1.saturating_sub(by),
            x2: self.x2.saturating_add(by),
            y2: self.y2.saturating_add(by),
        }
    }

    /// Shift by `(dx, dy)` (saturating).
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x1: self.x1.saturating_add(dx),
            y1: self.y1.saturating_add(dy),
            x2: self.x2.saturating_add(dx),
            y2: self.y2.saturating_add(dy),
        }
    }

    /// Return `true` when any edge is unbounded.
    pub fn is_infinite(self) -> bool {
        self.x1 == i32::MIN || self.y1 == i32::MIN || self.x2 == i32::MAX || self.y2 == i32::MAX
    }

    /// Replace every unbounded edge with the matching edge of `bounds`.
    pub fn clip_infinite_to(self, bounds: Self) -> Self {
        Self {
            x1: if self.x1 == i32::MIN { bounds.x1 } else { self.x1 },
            y1: if self.y1 == i32::MIN { bounds.y1 } else { self.y1 },
            x2: if self.x2 == i32::MAX { bounds.x2 } else { self.x2 },
            y2: if self.y2 == i32::MAX { bounds.y2 } else { self.y2 },
        }
    }

    /// Split into horizontal bands of at most `rows` rows each, bottom to top.
    pub fn row_bands(self, rows: u32) -> impl Iterator<Item = RectI> {
        let rows = i32::try_from(rows.max(1)).unwrap_or(i32::MAX);
        let r = self;
        let mut y = r.y1;
        std::iter::from_fn(move || {
            if r.is_empty() || y >= r.y2 {
                return None;
            }
            let y_end = y.saturating_add(rows).min(r.y2);
            let band = RectI::new(r.x1, y, r.x2, y_end);
            y = y_end;
            Some(band)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/rect.rs"]
mod tests;
