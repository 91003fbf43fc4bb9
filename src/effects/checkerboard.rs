use crate::effect::context::RenderCall;
use crate::effect::params::{ParamSet, ParamValue};
use crate::effect::{Effect, RenderSafety, Status};
use crate::effects::pixel::generator_frame_range;
use crate::foundation::core::{FrameRange, Rgba8Premul, SequenceTime};
use crate::foundation::error::FxResult;
use crate::raster::buffer::TileMut;
use crate::region::algebra::Upstream;
use crate::region::rect::RectI;

/// Infinite two-colour checkerboard, optionally scrolling horizontally over time.
#[derive(Clone, Debug)]
pub struct Checkerboard {
    params: ParamSet,
}

impl Checkerboard {
    /// Plugin identity.
    pub const CLASS_NAME: &'static str = "fx.Checkerboard";

    /// Instance with default parameters.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new()
                .with("cell_size", ParamValue::Int(32))
                .with("color_a", ParamValue::Color([0.1, 0.1, 0.1, 1.0]))
                .with("color_b", ParamValue::Color([0.5, 0.5, 0.5, 1.0]))
                .with("scroll", ParamValue::Int(0))
                .with("first_frame", ParamValue::Int(0))
                .with("last_frame", ParamValue::Int(0)),
        }
    }
}

impl Default for Checkerboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Checkerboard {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }

    fn description(&self) -> &str {
        "Infinite checkerboard pattern."
    }

    fn maximum_inputs(&self) -> usize {
        0
    }

    fn make_preview_by_default(&self) -> bool {
        true
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

    fn region_of_definition(
        &self,
        _time: SequenceTime,
        _upstream: &dyn Upstream,
    ) -> FxResult<RectI> {
        Ok(RectI::INFINITE)
    }

    fn frame_range(&self, _upstream: &dyn Upstream) -> FxResult<FrameRange> {
        Ok(generator_frame_range(&self.params))
    }

    fn render(&self, call: &RenderCall<'_>, tile: &mut TileMut<'_>) -> FxResult<Status> {
        let args = call.args();
        let cell = (self.params.int("cell_size")? as f64 * args.scale.x)
            .round()
            .clamp(1.0, f64::from(i32::MAX)) as i64;
        let offset = self.params.int("scroll")?.saturating_mul(args.time.0);
        let a = Rgba8Premul::from_unit_rgba(self.params.color("color_a")?);
        let b = Rgba8Premul::from_unit_rgba(self.params.color("color_b")?);

        let bounds = tile.bounds();
        for y in bounds.y1..bounds.y2 {
            let row = i64::from(y).div_euclid(cell);
            for x in bounds.x1..bounds.x2 {
                let col = (i64::from(x) + offset).div_euclid(cell);
                let px = if (row + col).rem_euclid(2) == 0 { a } else { b };
                tile.put(x, y, px);
            }
        }
        Ok(Status::Ok)
    }
}
