use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::effect::Effect;
use crate::effect::context::{ActiveRenders, RenderArgs};
use crate::effect::fingerprint::{DISCONNECTED_INPUT_HASH, Hash64, compute_fingerprint};
use crate::effect::instance::{EffectInstance, InstanceId};
use crate::effect::params::ParamValue;
use crate::foundation::core::{FrameRange, RenderScale, SequenceTime};
use crate::foundation::error::{FxError, FxResult};
use crate::region::algebra::{RoiMap, Upstream};
use crate::region::rect::RectI;

/// Read-only snapshot of one effect instance, taken for a single top-level render.
///
/// Holds a frozen copy of the effect, the clones of its inputs and the fingerprint computed
/// from that state. Editing the live instance afterwards has no effect on the clone.
pub struct RenderClone {
    source: Arc<EffectInstance>,
    name: String,
    effect: Box<dyn Effect>,
    inputs: Vec<Option<Arc<RenderClone>>>,
    hash: Hash64,
    active: ActiveRenders,
    rod_memo: Mutex<HashMap<SequenceTime, RectI>>,
}

impl std::fmt::Debug for RenderClone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderClone")
            .field("name", &self.name)
            .field("hash", &self.hash)
            .field("inputs", &self.inputs.len())
            .finish_non_exhaustive()
    }
}

impl RenderClone {
    /// Node name at snapshot time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The live instance this clone was taken from.
    pub fn source(&self) -> &Arc<EffectInstance> {
        &self.source
    }

    /// Always `false`.
    pub fn is_live_instance(&self) -> bool {
        false
    }

    /// Abort flag of the live source.
    pub fn aborted(&self) -> bool {
        self.source.aborted()
    }

    /// Fingerprint computed at snapshot time.
    pub fn hash(&self) -> Hash64 {
        self.hash
    }

    /// Frozen effect copy.
    pub fn effect(&self) -> &dyn Effect {
        self.effect.as_ref()
    }

    /// Input clones in slot order.
    pub fn inputs(&self) -> &[Option<Arc<RenderClone>>] {
        &self.inputs
    }

    /// Input clone of `slot`.
    pub fn input(&self, slot: usize) -> Option<&Arc<RenderClone>> {
        self.inputs.get(slot)?.as_ref()
    }

    /// Parameter value frozen in this clone.
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.effect.params().get(name)
    }

    /// Clones are immutable. Debug builds report the attempt as an error, release builds
    /// ignore it.
    pub fn set_param(&self, name: &str, value: ParamValue) -> FxResult<()> {
        let _ = value;
        if cfg!(debug_assertions) {
            tracing::error!(node = %self.name, param = name, "attempt to edit a render clone");
            return Err(FxError::ReadOnlyClone {
                effect: self.name.clone(),
                param: name.to_string(),
            });
        }
        Ok(())
    }

    /// Region of definition; memoised per frame.
    pub fn region_of_definition(&self, time: SequenceTime) -> FxResult<RectI> {
        if let Some(r) = self
            .rod_memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&time)
        {
            return Ok(*r);
        }
        let rod = self.effect.region_of_definition(time, &CloneUpstream(self))?;
        self.rod_memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(time, rod);
        Ok(rod)
    }

    /// Per-input regions of interest for `window`.
    pub fn region_of_interest(
        &self,
        time: SequenceTime,
        scale: RenderScale,
        window: RectI,
    ) -> RoiMap {
        self.effect
            .region_of_interest(time, scale, window, &CloneUpstream(self))
    }

    /// Frames this clone can produce.
    pub fn frame_range(&self) -> FxResult<FrameRange> {
        self.effect.frame_range(&CloneUpstream(self))
    }

    /// Arguments of the render call the current thread is executing on this clone.
    ///
    /// Fails with [`FxError::NoActiveRender`] outside of a render call.
    pub fn args_for_last_render(&self) -> FxResult<RenderArgs> {
        self.active.current().ok_or_else(|| FxError::NoActiveRender {
            effect: self.name.clone(),
        })
    }

    pub(crate) fn active(&self) -> &ActiveRenders {
        &self.active
    }
}

struct CloneUpstream<'a>(&'a RenderClone);

impl Upstream for CloneUpstream<'_> {
    fn owner_name(&self) -> &str {
        &self.0.name
    }

    fn input_count(&self) -> usize {
        self.0.inputs.len()
    }

    fn is_connected(&self, slot: usize) -> bool {
        self.0.input(slot).is_some()
    }

    fn input_region_of_definition(
        &self,
        slot: usize,
        time: SequenceTime,
    ) -> Option<FxResult<RectI>> {
        Some(self.0.input(slot)?.region_of_definition(time))
    }

    fn input_frame_range(&self, slot: usize) -> Option<FxResult<FrameRange>> {
        Some(self.0.input(slot)?.frame_range())
    }
}

/// Render clones of every instance reachable from one requested output.
#[derive(Debug)]
pub struct RenderTree {
    root: Arc<RenderClone>,
    len: usize,
}

impl RenderTree {
    /// Snapshot `root` and everything upstream of it.
    ///
    /// An instance reachable through several paths is cloned once. Fingerprints are computed
    /// bottom-up from the frozen state and written back to the live instances, aged with the
    /// project generation read before the snapshot started so that an edit racing with the
    /// snapshot leaves them stale.
    pub fn snapshot(root: &Arc<EffectInstance>) -> FxResult<Self> {
        let age = root.project().generation();
        let mut memo = HashMap::new();
        let root = snapshot_instance(root, age, &mut memo)?;
        Ok(Self {
            root,
            len: memo.len(),
        })
    }

    /// Clone of the requested output.
    pub fn root(&self) -> &Arc<RenderClone> {
        &self.root
    }

    /// Number of distinct clones.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn snapshot_instance(
    instance: &Arc<EffectInstance>,
    age: u64,
    memo: &mut HashMap<InstanceId, Arc<RenderClone>>,
) -> FxResult<Arc<RenderClone>> {
    if let Some(c) = memo.get(&instance.id()) {
        return Ok(Arc::clone(c));
    }

    let mut inputs = Vec::new();
    for input in instance.inputs() {
        inputs.push(match input {
            Some(i) => Some(snapshot_instance(&i, age, memo)?),
            None => None,
        });
    }
    let input_hashes: Vec<Hash64> = inputs
        .iter()
        .map(|c| c.as_ref().map_or(DISCONNECTED_INPUT_HASH, |c| c.hash))
        .collect();

    let effect = instance.effect()?.clone_effect();
    let hash = compute_fingerprint(effect.class_name(), effect.params(), &input_hashes);
    instance.store_hash(hash, age);

    let clone = Arc::new(RenderClone {
        source: Arc::clone(instance),
        name: instance.name(),
        effect,
        inputs,
        hash,
        active: ActiveRenders::default(),
        rod_memo: Mutex::new(HashMap::new()),
    });
    memo.insert(instance.id(), Arc::clone(&clone));
    Ok(clone)
}

#[cfg(test)]
#[path = "../../tests/unit/effect/clone.rs"]
mod tests;
