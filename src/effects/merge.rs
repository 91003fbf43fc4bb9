use crate::effect::context::RenderCall;
use crate::effect::params::{ParamSet, ParamValue};
use crate::effect::{Effect, RenderSafety, Status};
use crate::effects::pixel::over;
use crate::foundation::error::FxResult;
use crate::raster::buffer::TileMut;

/// `A` over `B`. Either input may be left disconnected.
#[derive(Clone, Debug)]
pub struct Merge {
    params: ParamSet,
}

impl Merge {
    /// Plugin identity.
    pub const CLASS_NAME: &'static str = "fx.Merge";

    /// Instance with default parameters.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new().with("mix", ParamValue::Double(1.0)),
        }
    }
}

impl Default for Merge {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Merge {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }

    fn description(&self) -> &str {
        "Composites input A over input B."
    }

    fn maximum_inputs(&self) -> usize {
        2
    }

    fn is_input_optional(&self, _slot: usize) -> bool {
        true
    }

    fn input_label(&self, slot: usize) -> String {
        match slot {
            0 => "A".to_string(),
            1 => "B".to_string(),
            n => format!("Input {}", n + 1),
        }
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

    fn render(&self, call: &RenderCall<'_>, tile: &mut TileMut<'_>) -> FxResult<Status> {
        let mix = self.params.double("mix")?;
        let inputs = call.inputs();
        let bounds = tile.bounds();
        for y in bounds.y1..bounds.y2 {
            for x in bounds.x1..bounds.x2 {
                tile.put(x, y, over(inputs.sample(1, x, y), inputs.sample(0, x, y), mix));
            }
        }
        Ok(Status::Ok)
    }
}
