use crate::effect::context::RenderCall;
use crate::effect::params::{ParamSet, ParamValue};
use crate::effect::{Effect, RenderSafety, Status};
use crate::effects::pixel::generator_frame_range;
use crate::foundation::core::{FrameRange, Rgba8Premul, SequenceTime};
use crate::foundation::error::{FxError, FxResult};
use crate::raster::buffer::TileMut;
use crate::region::algebra::Upstream;
use crate::region::rect::RectI;

/// Solid colour over a rectangle, or everywhere when `infinite` is set.
#[derive(Clone, Debug)]
pub struct Constant {
    params: ParamSet,
}

impl Constant {
    /// Plugin identity.
    pub const CLASS_NAME: &'static str = "fx.Constant";

    /// Instance with default parameters.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new()
                .with("color", ParamValue::Color([0.0, 0.0, 0.0, 1.0]))
                .with("x", ParamValue::Int(0))
                .with("y", ParamValue::Int(0))
                .with("width", ParamValue::Int(100))
                .with("height", ParamValue::Int(100))
                .with("infinite", ParamValue::Bool(false))
                .with("first_frame", ParamValue::Int(0))
                .with("last_frame", ParamValue::Int(0)),
        }
    }

    fn rect(&self) -> FxResult<RectI> {
        if self.params.bool("infinite")? {
            return Ok(RectI::INFINITE);
        }
        let coord = |name: &str| -> FxResult<i32> {
            i32::try_from(self.params.int(name)?)
                .map_err(|_| FxError::validation(format!("constant '{name}' out of range")))
        };
        let (x, y) = (coord("x")?, coord("y")?);
        let (w, h) = (coord("width")?.max(0), coord("height")?.max(0));
        Ok(RectI::new(x, y, x.saturating_add(w), y.saturating_add(h)))
    }
}

impl Default for Constant {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Constant {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }

    fn description(&self) -> &str {
        "Fills a rectangle with a solid colour."
    }

    fn maximum_inputs(&self) -> usize {
        0
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
        self.rect()
    }

    fn frame_range(&self, _upstream: &dyn Upstream) -> FxResult<FrameRange> {
        Ok(generator_frame_range(&self.params))
    }

    fn render(&self, _call: &RenderCall<'_>, tile: &mut TileMut<'_>) -> FxResult<Status> {
        tile.fill(Rgba8Premul::from_unit_rgba(self.params.color("color")?));
        Ok(Status::Ok)
    }
}
