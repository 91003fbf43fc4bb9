use std::sync::{Arc, PoisonError};

use rayon::prelude::*;

use crate::effect::clone::RenderClone;
use crate::effect::context::{RenderArgs, RenderCall};
use crate::effect::instance::EffectInstance;
use crate::effect::{MessageKind, RenderSafety};
use crate::foundation::core::{RenderScale, SequenceTime, ViewIndex};
use crate::foundation::error::{FxError, FxResult};
use crate::raster::buffer::{Image, InputImages, TileMut};
use crate::raster::cache::{ImageKey, Persistence};
use crate::region::rect::RectI;
use crate::render::tiling;
use crate::session::project::Project;

/// Parameters shared by every recursive call of one top-level render.
pub(crate) struct Request<'a> {
    pub(crate) root: &'a Arc<EffectInstance>,
    pub(crate) project: &'a Arc<Project>,
    pub(crate) time: SequenceTime,
    pub(crate) scale: RenderScale,
    pub(crate) view: ViewIndex,
}

impl Request<'_> {
    fn check_abort(&self, clone: &RenderClone) -> FxResult<()> {
        if self.root.aborted() || clone.aborted() {
            return Err(FxError::Cancelled);
        }
        Ok(())
    }
}

/// Render `window` of `clone`, recursing into its inputs first.
///
/// `bypass_cache` only skips the lookup for this call; inputs always consult the cache and
/// the result is stored either way.
pub(crate) fn render_clone_roi(
    req: &Request<'_>,
    clone: &Arc<RenderClone>,
    window: RectI,
    bypass_cache: bool,
) -> FxResult<Option<Arc<Image>>> {
    req.check_abort(clone)?;

    let rod = clone.region_of_definition(req.time)?;
    let Some(roi) = window.intersect(rod) else {
        tracing::trace!(node = %clone.name(), "window outside region of definition");
        return Ok(None);
    };

    let key = ImageKey::new(clone.hash(), req.time, req.view, req.scale);
    let cache = req.project.cache();
    if !bypass_cache && let Some(hit) = cache.lookup(&key, roi) {
        tracing::debug!(node = %clone.name(), hash = clone.hash().0, "cache hit");
        return Ok(Some(fit_to(hit, roi)));
    }
    tracing::debug!(node = %clone.name(), hash = clone.hash().0, "cache miss");

    let mut inputs = InputImages::with_slots(clone.inputs().len());
    for (slot, region) in clone.region_of_interest(req.time, req.scale, roi).iter() {
        let Some(input) = clone.input(slot) else {
            continue;
        };
        if region.is_empty() {
            continue;
        }
        req.check_abort(clone)?;
        if let Some(img) = render_clone_roi(req, input, region, false)? {
            inputs.set(slot, img);
        }
    }

    let args = RenderArgs {
        roi,
        time: req.time,
        scale: req.scale,
        view: req.view,
    };
    let call = RenderCall::new(clone, req.root, args, &inputs);
    let image = match produce(req, clone, &call) {
        Ok(image) => image,
        Err(e) => return Err(explain_failure(clone, &call, e)),
    };

    req.check_abort(clone)?;
    let persistence = if clone.effect().should_rendered_data_be_persistent() {
        Persistence::Persistent
    } else {
        Persistence::Transient
    };
    let image = Arc::new(image);
    cache.store(key, Arc::clone(&image), persistence);
    Ok(Some(image))
}

fn produce(req: &Request<'_>, clone: &RenderClone, call: &RenderCall<'_>) -> FxResult<Image> {
    let effect = clone.effect();
    {
        let _active = clone.active().enter(call.args());
        effect.pre_process_frame(call)?;
    }

    let mut image = Image::new_transparent(call.args().roi)?;
    match effect.render_safety() {
        RenderSafety::Unsafe => {
            let lock = tiling::plugin_lock(effect.class_name());
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            render_tile(req, clone, call, &mut image.as_tile_mut())?;
        }
        RenderSafety::InstanceSafe => {
            let _guard = clone.source().instance_lock();
            render_tile(req, clone, call, &mut image.as_tile_mut())?;
        }
        RenderSafety::FullySafe => {
            let pool = req.project.pool();
            let rows = tiling::tile_rows(
                call.args().roi,
                &req.project.opts().render,
                pool.current_num_threads(),
            );
            let tiles = image.row_tiles_mut(rows);
            tracing::debug!(node = %clone.name(), tiles = tiles.len(), rows, "dispatching tiles");
            pool.install(|| {
                tiles
                    .into_par_iter()
                    .try_for_each(|mut tile| render_tile(req, clone, call, &mut tile))
            })?;
        }
    }
    Ok(image)
}

fn render_tile(
    req: &Request<'_>,
    clone: &RenderClone,
    call: &RenderCall<'_>,
    tile: &mut TileMut<'_>,
) -> FxResult<()> {
    req.check_abort(clone)?;
    let _active = clone.active().enter(call.args());
    clone.effect().render(call, tile)?;
    Ok(())
}

// Every failure reaching the user carries a message on the node that caused it.
fn explain_failure(clone: &RenderClone, call: &RenderCall<'_>, err: FxError) -> FxError {
    if err.is_cancelled() || call.posted_message() {
        return err;
    }
    clone
        .source()
        .set_persistent_message(MessageKind::Error, &err.to_string());
    err
}

fn fit_to(image: Arc<Image>, roi: RectI) -> Arc<Image> {
    if image.bounds() == roi {
        return image;
    }
    image.crop(roi).map_or(image, Arc::new)
}

#[cfg(test)]
#[path = "../../tests/unit/render/orchestrator.rs"]
mod tests;
