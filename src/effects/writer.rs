use crate::effect::context::RenderCall;
use crate::effect::params::{ParamSet, ParamValue};
use crate::effect::{Effect, RenderSafety, Status};
use crate::foundation::error::{FxError, FxResult};
use crate::raster::buffer::TileMut;

/// Output node: passes its input through; a frame sink writes the result.
///
/// Unsafe like most file writers: one production call at a time, process-wide.
#[derive(Clone, Debug)]
pub struct Writer {
    params: ParamSet,
}

impl Writer {
    /// Plugin identity.
    pub const CLASS_NAME: &'static str = "fx.Writer";

    /// Instance with default parameters.
    pub fn new() -> Self {
        Self {
            params: ParamSet::new().with("file", ParamValue::Text("frame_####.png".to_string())),
        }
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand the `#` run of `pattern` into `frame`, zero-padded to the run's length.
pub fn file_name_for(pattern: &str, frame: i64) -> FxResult<String> {
    if pattern.is_empty() {
        return Err(FxError::validation("writer file pattern must be non-empty"));
    }
    let Some(start) = pattern.find('#') else {
        return Ok(pattern.to_string());
    };
    let width = pattern[start..].chars().take_while(|c| *c == '#').count();
    Ok(format!(
        "{}{frame:0width$}{}",
        &pattern[..start],
        &pattern[start + width..]
    ))
}

impl Effect for Writer {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }

    fn description(&self) -> &str {
        "Writes its input to image files."
    }

    fn maximum_inputs(&self) -> usize {
        1
    }

    fn is_output(&self) -> bool {
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
        RenderSafety::Unsafe
    }

    fn render(&self, call: &RenderCall<'_>, tile: &mut TileMut<'_>) -> FxResult<Status> {
        let Some(src) = call.inputs().get(0) else {
            return Ok(Status::Ok);
        };
        let bounds = tile.bounds();
        for y in bounds.y1..bounds.y2 {
            for x in bounds.x1..bounds.x2 {
                tile.put(x, y, src.sample(x, y));
            }
        }
        Ok(Status::Ok)
    }
}
