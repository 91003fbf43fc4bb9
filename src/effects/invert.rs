use crate::effect::context::RenderCall;
use crate::effect::params::{ParamSet, ParamValue};
use crate::effect::{Effect, RenderSafety, Status};
use crate::effects::pixel::lerp;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::FxResult;
use crate::raster::buffer::TileMut;

/// Inverts colour channels, keeping alpha.
///
/// Declared instance-safe: an instance renders one call at a time, distinct instances run
/// concurrently.
#[derive(Clone, Debug)]
pub struct Invert {
    params: ParamSet,
}

impl Invert {
    /// Plugin identity.
    pub const CLASS_NAME: &'static str = "fx.Invert";

    /// Instance with default parameters.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new().with("mix", ParamValue::Double(1.0)),
        }
    }
}

impl Default for Invert {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Invert {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }

    fn description(&self) -> &str {
        "Inverts the colour channels of its input."
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
        RenderSafety::InstanceSafe
    }

    fn render(&self, call: &RenderCall<'_>, tile: &mut TileMut<'_>) -> FxResult<Status> {
        let mix = self.params.double("mix")?;
        let bounds = tile.bounds();
        for y in bounds.y1..bounds.y2 {
            for x in bounds.x1..bounds.x2 {
                let src = call.inputs().sample(0, x, y);
                // Premultiplied: a - c inverts the straight colour.
                let inv = Rgba8Premul {
                    r: src.a - src.r.min(src.a),
                    g: src.a - src.g.min(src.a),
                    b: src.a - src.b.min(src.a),
                    a: src.a,
                };
                tile.put(x, y, lerp(src, inv, mix));
            }
        }
        Ok(Status::Ok)
    }
}
