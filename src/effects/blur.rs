use crate::effect::context::RenderCall;
use crate::effect::params::{ParamSet, ParamValue};
use crate::effect::{Effect, MessageKind, RenderSafety, Status};
use crate::foundation::core::{RenderScale, Rgba8Premul, SequenceTime};
use crate::foundation::error::{FxError, FxResult};
use crate::raster::buffer::{Image, TileMut};
use crate::region::algebra::{RoiMap, Upstream, default_region_of_definition};
use crate::region::rect::RectI;

/// Largest accepted `radius`, in pixels at full scale.
pub const MAX_BLUR_RADIUS: i64 = 1 << 16;

/// Separable box blur. Pixels outside the input are transparent.
#[derive(Clone, Debug)]
pub struct BoxBlur {
    params: ParamSet,
}

impl BoxBlur {
    /// Plugin identity.
    pub const CLASS_NAME: &'static str = "fx.BoxBlur";

    /// Instance with default parameters.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new().with("radius", ParamValue::Int(2)),
        }
    }

    // Out-of-range values count as 0 here; `pre_process_frame` rejects them.
    fn radius(&self) -> i32 {
        self.params
            .int("radius")
            .ok()
            .filter(|r| (0..=MAX_BLUR_RADIUS).contains(r))
            .and_then(|r| i32::try_from(r).ok())
            .unwrap_or(0)
    }

    fn scaled_radius(&self, scale: RenderScale) -> (i32, i32) {
        let r = f64::from(self.radius());
        let max = MAX_BLUR_RADIUS as f64;
        let scaled = |s: f64| (r * s).round().clamp(0.0, max) as i32;
        (scaled(scale.x), scaled(scale.y))
    }
}

impl Default for BoxBlur {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for BoxBlur {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }

    fn description(&self) -> &str {
        "Averages each pixel with its neighbours within a square radius."
    }

    fn maximum_inputs(&self) -> usize {
        1
    }

    fn params(&self) -> &ParamSet {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }

    fn clone_effect(&self) -> Box<dyn Effect> {
        Box::new(self.clone())
    }

    fn render_safety(&self) -> RenderSafety {
        RenderSafety::FullySafe
    }

    fn region_of_definition(&self, time: SequenceTime, upstream: &dyn Upstream) -> FxResult<RectI> {
        let rod = default_region_of_definition(time, upstream)?;
        if rod.is_infinite() {
            return Ok(rod);
        }
        Ok(rod.dilate(self.radius()))
    }

    fn region_of_interest(
        &self,
        _time: SequenceTime,
        scale: RenderScale,
        window: RectI,
        upstream: &dyn Upstream,
    ) -> RoiMap {
        let mut map = RoiMap::new();
        if upstream.is_connected(0) {
            let (rx, ry) = self.scaled_radius(scale);
            map.insert(0, dilate_xy(window, rx, ry));
        }
        map
    }

    fn pre_process_frame(&self, call: &RenderCall<'_>) -> FxResult<Status> {
        let radius = self.params.int("radius")?;
        if !(0..=MAX_BLUR_RADIUS).contains(&radius) {
            let msg = format!("radius must be in 0..={MAX_BLUR_RADIUS}, got {radius}");
            call.set_persistent_message(MessageKind::Error, &msg);
            return Err(FxError::failed(call.name(), msg));
        }
        Ok(Status::Ok)
    }

    fn render(&self, call: &RenderCall<'_>, tile: &mut TileMut<'_>) -> FxResult<Status> {
        let Some(src) = call.inputs().get(0) else {
            return Ok(Status::Ok);
        };
        let (rx, ry) = self.scaled_radius(call.args().scale);
        let bounds = tile.bounds();

        // Horizontal sums over the tile rows grown by `ry`, then vertical sums of those.
        let w = bounds.width() as usize;
        let rows = dilate_xy(bounds, 0, ry);
        let mut hsum = vec![[0u32; 4]; w * rows.height() as usize];
        for (i, y) in (rows.y1..rows.y2).enumerate() {
            horizontal_sums(src, y, bounds.x1, bounds.x2, rx, &mut hsum[i * w..(i + 1) * w]);
        }

        let (Some(tx), Some(ty)) = (tap_count(rx), tap_count(ry)) else {
            return Err(FxError::failed(call.name(), "blur radius overflows the tap count"));
        };
        let n = tx as u64 * ty as u64;
        let taps = ty;
        for (j, y) in (bounds.y1..bounds.y2).enumerate() {
            for col in 0..w {
                let mut acc = [0u64; 4];
                for k in 0..taps {
                    let s = hsum[(j + k) * w + col];
                    for c in 0..4 {
                        acc[c] += u64::from(s[c]);
                    }
                }
                let px = acc.map(|v| ((v + n / 2) / n).min(255) as u8);
                tile.put(bounds.x1 + col as i32, y, Rgba8Premul::from_array(px));
            }
        }
        Ok(Status::Ok)
    }
}

fn dilate_xy(r: RectI, dx: i32, dy: i32) -> RectI {
    RectI::new(
        r.x1.saturating_sub(dx),
        r.y1.saturating_sub(dy),
        r.x2.saturating_add(dx),
        r.y2.saturating_add(dy),
    )
}

fn tap_count(r: i32) -> Option<usize> {
    let taps = r.checked_mul(2)?.checked_add(1)?;
    usize::try_from(taps).ok()
}

fn horizontal_sums(src: &Image, y: i32, x1: i32, x2: i32, r: i32, out: &mut [[u32; 4]]) {
    let mut acc = [0u32; 4];
    for x in x1.saturating_sub(r)..=x1.saturating_add(r) {
        let px = src.sample(x, y).to_array();
        for c in 0..4 {
            acc[c] += u32::from(px[c]);
        }
    }
    for (i, x) in (x1..x2).enumerate() {
        out[i] = acc;
        let add = src.sample(x.saturating_add(r).saturating_add(1), y).to_array();
        let sub = src.sample(x.saturating_sub(r), y).to_array();
        for c in 0..4 {
            acc[c] = acc[c] + u32::from(add[c]) - u32::from(sub[c]);
        }
    }
}
