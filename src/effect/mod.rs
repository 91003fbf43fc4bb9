//! The contract an effect implementation satisfies, and the live/clone objects that carry it
//! through the graph.

pub(crate) mod clone;
pub(crate) mod context;
pub(crate) mod fingerprint;
pub(crate) mod instance;
pub(crate) mod params;

use crate::effect::context::RenderCall;
use crate::effect::params::ParamSet;
use crate::foundation::core::{FrameRange, RenderScale, SequenceTime};
use crate::foundation::error::FxResult;
use crate::raster::buffer::TileMut;
use crate::region::algebra::{
    RoiMap, Upstream, default_frame_range, default_region_of_definition,
    default_region_of_interest,
};
use crate::region::rect::RectI;

/// How many production calls an effect tolerates at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderSafety {
    /// One production call at a time across every instance of the plugin, process-wide.
    Unsafe,
    /// One production call at a time per instance.
    InstanceSafe,
    /// Any number of concurrent production calls, including tiles of the same request.
    FullySafe,
}

/// Successful outcome of an effect hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The hook did its work.
    Ok,
    /// The hook declined to override the default behaviour.
    ReplyDefault,
}

/// Kind of a message posted to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Informational.
    Information,
    /// Something important happened.
    Warning,
    /// Something failed.
    Error,
    /// Yes/no question; only meaningful for transient messages.
    Question,
}

/// Capability set of one effect plugin.
///
/// An implementation owns its parameter values. The live copy is edited by the interface
/// thread; render clones are obtained through [`Effect::clone_effect`] and are only ever
/// accessed through `&self` afterwards, so every method here must be safe to call from any
/// thread.
///
/// Region algebra methods default to the named policies in [`crate::region::algebra`];
/// overrides may call those policies directly for the parts they do not change.
pub trait Effect: Send + Sync {
    /// Plugin identity. Also names the process-wide lock of [`RenderSafety::Unsafe`] plugins.
    fn class_name(&self) -> &str;

    /// Short description shown in help panels.
    fn description(&self) -> &str {
        ""
    }

    /// Number of input slots.
    fn maximum_inputs(&self) -> usize;

    /// Whether the effect can render with `slot` disconnected.
    fn is_input_optional(&self, slot: usize) -> bool {
        let _ = slot;
        false
    }

    /// Label of input `slot`.
    fn input_label(&self, slot: usize) -> String {
        if self.maximum_inputs() == 1 {
            "Source".to_string()
        } else {
            format!("Input {}", slot + 1)
        }
    }

    /// An effect without inputs that produces its own pixels.
    fn is_generator(&self) -> bool {
        self.maximum_inputs() == 0
    }

    /// An effect with no outputs (writers).
    fn is_output(&self) -> bool {
        false
    }

    /// An effect that generates pixels and can also filter its inputs.
    fn is_generator_and_filter(&self) -> bool {
        false
    }

    /// Whether the node shows a thumbnail preview by default.
    fn make_preview_by_default(&self) -> bool {
        false
    }

    /// Current parameter values in declaration order.
    fn params(&self) -> &ParamSet;

    /// Mutable parameter access. Only ever called on the live copy.
    fn params_mut(&mut self) -> &mut ParamSet;

    /// Deep copy of parameters and any extra per-render state.
    fn clone_effect(&self) -> Box<dyn Effect>;

    /// Concurrency contract. Must not change over the effect's lifetime.
    fn render_safety(&self) -> RenderSafety;

    /// Whether rendered data is expensive enough to be kept persistently.
    fn should_rendered_data_be_persistent(&self) -> bool {
        false
    }

    /// Full extent the effect can produce at `time`.
    fn region_of_definition(&self, time: SequenceTime, upstream: &dyn Upstream) -> FxResult<RectI> {
        default_region_of_definition(time, upstream)
    }

    /// Region needed from each input to produce `window`.
    fn region_of_interest(
        &self,
        time: SequenceTime,
        scale: RenderScale,
        window: RectI,
        upstream: &dyn Upstream,
    ) -> RoiMap {
        default_region_of_interest(time, scale, window, upstream)
    }

    /// Frames the effect can produce.
    fn frame_range(&self, upstream: &dyn Upstream) -> FxResult<FrameRange> {
        default_frame_range(upstream)
    }

    /// Per-frame initialisation, run once per request before any production call.
    ///
    /// An error aborts the request; post a message through `call` first.
    fn pre_process_frame(&self, call: &RenderCall<'_>) -> FxResult<Status> {
        let _ = call;
        Ok(Status::ReplyDefault)
    }

    /// Fill `tile` (absolute bounds, see [`TileMut::bounds`]).
    ///
    /// Inputs were rendered for their regions of interest before this is called. Depending on
    /// [`Effect::render_safety`] this may run concurrently for disjoint tiles of one output.
    fn render(&self, call: &RenderCall<'_>, tile: &mut TileMut<'_>) -> FxResult<Status>;
}
