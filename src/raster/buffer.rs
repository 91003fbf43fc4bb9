use std::sync::Arc;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{FxError, FxResult};
use crate::region::rect::RectI;

/// Rendered pixels of one region, premultiplied RGBA8, row-major starting at `bounds.y1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    bounds: RectI,
    data: Vec<u8>,
}

impl Image {
    /// Allocate a fully transparent image covering `bounds`.
    pub fn new_transparent(bounds: RectI) -> FxResult<Self> {
        let len = byte_len(bounds)?;
        Ok(Self {
            bounds,
            data: vec![0u8; len],
        })
    }

    /// Wrap existing bytes. `data` must hold exactly `width * height * 4` bytes.
    pub fn from_raw(bounds: RectI, data: Vec<u8>) -> FxResult<Self> {
        if data.len() != byte_len(bounds)? {
            return Err(FxError::validation(
                "image data length must match bounds width*height*4",
            ));
        }
        Ok(Self { bounds, data })
    }

    /// Absolute pixel region covered by this image.
    pub fn bounds(&self) -> RectI {
        self.bounds
    }

    /// Raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Return `true` when the image covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.bounds.width() as usize * 4
    }

    /// Pixel at absolute `(x, y)`, `None` outside the bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8Premul> {
        let off = pixel_offset(self.bounds, x, y)?;
        let px: [u8; 4] = self.data[off..off + 4].try_into().ok()?;
        Some(Rgba8Premul::from_array(px))
    }

    /// Pixel at absolute `(x, y)`, transparent outside the bounds.
    pub fn sample(&self, x: i32, y: i32) -> Rgba8Premul {
        self.pixel(x, y).unwrap_or_else(Rgba8Premul::transparent)
    }

    /// Copy of the pixels inside `region`, or `None` when `region` is not covered.
    pub fn crop(&self, region: RectI) -> Option<Image> {
        if region.is_empty() || !self.bounds.contains(region) {
            return None;
        }
        let mut out = Image::new_transparent(region).ok()?;
        let row_bytes = out.stride();
        for (i, y) in (region.y1..region.y2).enumerate() {
            let src = pixel_offset(self.bounds, region.x1, y)?;
            let dst = i * row_bytes;
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        Some(out)
    }

    /// The whole image as a single writable tile.
    pub fn as_tile_mut(&mut self) -> TileMut<'_> {
        TileMut {
            bounds: self.bounds,
            data: &mut self.data,
        }
    }

    /// Split into disjoint writable row bands of at most `rows` rows.
    pub fn row_tiles_mut(&mut self, rows: u32) -> Vec<TileMut<'_>> {
        let bounds = self.bounds;
        let chunk = (rows.max(1) as usize).saturating_mul(self.stride()).max(1);
        bounds
            .row_bands(rows)
            .zip(self.data.chunks_mut(chunk))
            .map(|(bounds, data)| TileMut { bounds, data })
            .collect()
    }
}

/// Writable view of a band of rows of an output [`Image`].
///
/// Tiles handed out for one production call never overlap.
#[derive(Debug)]
pub struct TileMut<'a> {
    bounds: RectI,
    data: &'a mut [u8],
}

impl TileMut<'_> {
    /// Absolute pixel region this tile may write.
    pub fn bounds(&self) -> RectI {
        self.bounds
    }

    /// Write pixel at absolute `(x, y)`. Writes outside the tile are ignored.
    pub fn put(&mut self, x: i32, y: i32, px: Rgba8Premul) {
        if let Some(off) = pixel_offset(self.bounds, x, y) {
            self.data[off..off + 4].copy_from_slice(&px.to_array());
        }
    }

    /// Fill the whole tile with one pixel value.
    pub fn fill(&mut self, px: Rgba8Premul) {
        let px = px.to_array();
        for dst in self.data.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    /// Mutable bytes of absolute row `y`, `None` outside the tile.
    pub fn row_mut(&mut self, y: i32) -> Option<&mut [u8]> {
        let off = pixel_offset(self.bounds, self.bounds.x1, y)?;
        let len = self.bounds.width() as usize * 4;
        Some(&mut self.data[off..off + len])
    }
}

/// Upstream images available to a production call, indexed by input slot.
#[derive(Clone, Debug, Default)]
pub struct InputImages {
    slots: Vec<Option<Arc<Image>>>,
}

impl InputImages {
    pub(crate) fn with_slots(n: usize) -> Self {
        Self {
            slots: vec![None; n],
        }
    }

    pub(crate) fn set(&mut self, slot: usize, image: Arc<Image>) {
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(image);
    }

    /// Image rendered for `slot`; `None` when the slot is disconnected, not needed, or empty.
    pub fn get(&self, slot: usize) -> Option<&Image> {
        self.slots.get(slot).and_then(|s| s.as_deref())
    }

    /// Pixel of input `slot` at absolute `(x, y)`, transparent when unavailable.
    pub fn sample(&self, slot: usize, x: i32, y: i32) -> Rgba8Premul {
        self.get(slot)
            .map_or_else(Rgba8Premul::transparent, |img| img.sample(x, y))
    }
}

fn byte_len(bounds: RectI) -> FxResult<usize> {
    usize::try_from(bounds.area())
        .ok()
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| FxError::validation("image buffer size overflow"))
}

fn pixel_offset(bounds: RectI, x: i32, y: i32) -> Option<usize> {
    if !bounds.contains_point(x, y) {
        return None;
    }
    let col = x.abs_diff(bounds.x1) as usize;
    let row = y.abs_diff(bounds.y1) as usize;
    Some((row * bounds.width() as usize + col) * 4)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
