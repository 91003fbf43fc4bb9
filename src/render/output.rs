use std::sync::{Arc, Mutex, PoisonError};

use crate::effect::instance::EffectInstance;
use crate::foundation::core::{RenderScale, SequenceTime, ViewIndex};
use crate::foundation::error::{FxError, FxResult};
use crate::raster::buffer::Image;

/// Receives the frames produced by an [`OutputDriver`].
pub trait FrameSink {
    /// Consume one rendered frame. `image` is `None` when the frame is empty.
    fn write_frame(
        &mut self,
        time: SequenceTime,
        view: ViewIndex,
        image: Option<&Image>,
    ) -> FxResult<()>;
}

/// Counters reported by [`OutputDriver::render_full_sequence`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceStats {
    /// Frames visited.
    pub frames_total: u64,
    /// Images handed to the sink.
    pub images_written: u64,
    /// Frame/view pairs that rendered to nothing.
    pub empty_images: u64,
}

/// Drives an output effect (a writer) across its frame range.
#[derive(Debug)]
pub struct OutputDriver {
    instance: Arc<EffectInstance>,
    current: Mutex<Option<SequenceTime>>,
}

impl OutputDriver {
    /// Wrap `instance`. It must be an output effect.
    pub fn new(instance: Arc<EffectInstance>) -> FxResult<Self> {
        if !instance.effect()?.is_output() {
            return Err(FxError::validation(format!(
                "'{}' is not an output effect",
                instance.name()
            )));
        }
        Ok(Self {
            instance,
            current: Mutex::new(None),
        })
    }

    /// The wrapped output instance.
    pub fn instance(&self) -> &Arc<EffectInstance> {
        &self.instance
    }

    /// Frame being rendered, or the last frame rendered once the sequence stops.
    pub fn current_frame(&self) -> Option<SequenceTime> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop the running sequence at the next frame or poll point.
    pub fn abort(&self) {
        self.instance.abort_rendering();
    }

    /// Render one frame of one view over the whole region of definition. Unbounded edges are
    /// clipped to the node's render format.
    pub fn render_frame(
        &self,
        time: SequenceTime,
        view: ViewIndex,
        scale: RenderScale,
    ) -> FxResult<Option<Arc<Image>>> {
        let rod = self.instance.region_of_definition(time)?;
        let window = rod.clip_infinite_to(self.instance.render_format().to_rect());
        self.instance.render_roi(time, scale, view, window, false)
    }

    /// Render every frame of the instance's frame range for every view, in order.
    ///
    /// Resets the abort flag first. Fails with [`FxError::Cancelled`] when aborted.
    #[tracing::instrument(skip(self, sink), fields(node = %self.instance.name()))]
    pub fn render_full_sequence(&self, sink: &mut dyn FrameSink) -> FxResult<SequenceStats> {
        self.instance.set_aborted(false);
        let range = self.instance.frame_range()?;
        if range.is_unbounded() {
            return Err(FxError::validation(format!(
                "'{}' has an unbounded frame range",
                self.instance.name()
            )));
        }
        let views = self.instance.render_views_count().max(1);
        tracing::info!(first = range.first.0, last = range.last.0, views, "rendering sequence");

        let mut stats = SequenceStats::default();
        for f in range.first.0..=range.last.0 {
            if self.instance.aborted() {
                return Err(FxError::Cancelled);
            }
            let time = SequenceTime(f);
            *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(time);
            for v in 0..views {
                let view = ViewIndex(v);
                let image = self.render_frame(time, view, RenderScale::FULL)?;
                sink.write_frame(time, view, image.as_deref())?;
                match image {
                    Some(_) => stats.images_written += 1,
                    None => stats.empty_images += 1,
                }
            }
            stats.frames_total += 1;
            tracing::debug!(frame = f, "frame done");
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/output.rs"]
mod tests;
