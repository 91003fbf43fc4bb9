use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, Weak};

use crate::effect::clone::RenderTree;
use crate::effect::fingerprint::{DISCONNECTED_INPUT_HASH, Hash64, compute_fingerprint};
use crate::effect::params::ParamValue;
use crate::effect::{Effect, MessageKind, RenderSafety};
use crate::foundation::core::{Format, FrameRange, RenderScale, SequenceTime, ViewIndex};
use crate::foundation::error::{FxError, FxResult};
use crate::node::host::{NodeHost, PostedMessage, log_message};
use crate::raster::buffer::Image;
use crate::region::algebra::{RoiMap, Upstream};
use crate::region::rect::RectI;
use crate::render::orchestrator;
use crate::session::project::Project;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a live instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

#[derive(Clone, Copy, Debug, Default)]
struct HashState {
    value: Hash64,
    // 0 = never computed; project generations start at 1.
    age: u64,
}

/// The live, user-editable effect object bound to a graph node.
///
/// Exactly one exists per node. Renders never read it directly: each top-level
/// [`EffectInstance::render_roi`] snapshots it (and everything upstream) into render clones.
pub struct EffectInstance {
    id: InstanceId,
    project: Arc<Project>,
    node: Weak<dyn NodeHost>,
    class_name: String,
    effect: RwLock<Box<dyn Effect>>,
    inputs: RwLock<Vec<Option<Arc<EffectInstance>>>>,
    hash: Mutex<HashState>,
    aborted: AtomicBool,
    preview_enabled: AtomicBool,
    persistent_message: Mutex<Option<PostedMessage>>,
    instance_lock: Mutex<()>,
}

impl std::fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectInstance")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

impl EffectInstance {
    /// Create the live instance of `node`.
    pub fn new(
        project: &Arc<Project>,
        node: &Arc<dyn NodeHost>,
        effect: Box<dyn Effect>,
    ) -> Arc<Self> {
        let slots = effect.maximum_inputs();
        Arc::new(Self {
            id: InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)),
            project: Arc::clone(project),
            node: Arc::downgrade(node),
            class_name: effect.class_name().to_string(),
            preview_enabled: AtomicBool::new(effect.make_preview_by_default()),
            effect: RwLock::new(effect),
            inputs: RwLock::new(vec![None; slots]),
            hash: Mutex::new(HashState::default()),
            aborted: AtomicBool::new(false),
            persistent_message: Mutex::new(None),
            instance_lock: Mutex::new(()),
        })
    }

    /// Identity.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Owning node, if it is still alive.
    pub fn node(&self) -> Option<Arc<dyn NodeHost>> {
        self.node.upgrade()
    }

    /// Project this instance belongs to.
    pub fn project(&self) -> &Arc<Project> {
        &self.project
    }

    /// Node name, or the plugin class name once the node is gone.
    pub fn name(&self) -> String {
        self.node()
            .map_or_else(|| self.class_name.clone(), |n| n.name().to_string())
    }

    /// Plugin identity.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Forwarded to the node. Falls back to the project default format.
    pub fn render_format(&self) -> Format {
        self.node()
            .map_or(self.project.opts().default_format, |n| n.render_format())
    }

    /// Forwarded to the node.
    pub fn render_views_count(&self) -> u32 {
        self.node().map_or(1, |n| n.render_views_count())
    }

    /// Forwarded to the node.
    pub fn has_output_connected(&self) -> bool {
        self.node().is_some_and(|n| n.has_output_connected())
    }

    /// Always `true`; render clones are a separate type.
    pub fn is_live_instance(&self) -> bool {
        true
    }

    /// Read access to the live effect.
    pub fn effect(&self) -> FxResult<RwLockReadGuard<'_, Box<dyn Effect>>> {
        self.effect.read().map_err(|_| FxError::poisoned("effect"))
    }

    /// Concurrency contract of the plugin.
    pub fn render_safety(&self) -> FxResult<RenderSafety> {
        Ok(self.effect()?.render_safety())
    }

    /// Current value of parameter `name`.
    pub fn param(&self, name: &str) -> FxResult<ParamValue> {
        self.effect()?
            .params()
            .get(name)
            .cloned()
            .ok_or_else(|| FxError::validation(format!("unknown parameter '{name}'")))
    }

    /// Edit a parameter. Invalidates every fingerprint in the project and asks for a re-render.
    ///
    /// Renders already in flight keep the value their clones were taken with.
    pub fn set_param(&self, name: &str, value: ParamValue) -> FxResult<()> {
        {
            let mut effect = self.effect.write().map_err(|_| FxError::poisoned("effect"))?;
            effect.params_mut().set(name, value)?;
        }
        self.project.bump_generation();
        tracing::debug!(node = %self.name(), param = name, "parameter changed");
        self.request_render();
        Ok(())
    }

    /// Snapshot of the input slots.
    pub fn inputs(&self) -> Vec<Option<Arc<EffectInstance>>> {
        self.inputs
            .read()
            .map(|v| v.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    /// Input `n`, `None` when disconnected or out of range.
    pub fn input(&self, n: usize) -> Option<Arc<EffectInstance>> {
        self.inputs().get(n).cloned().flatten()
    }

    /// Connect `input` to `slot`. Connections that would create a cycle are rejected.
    pub fn connect_input(&self, slot: usize, input: Arc<EffectInstance>) -> FxResult<()> {
        if input.id == self.id || input.reaches(self.id) {
            return Err(FxError::validation(format!(
                "connecting '{}' to '{}' would create a cycle",
                input.name(),
                self.name()
            )));
        }
        self.set_input(slot, Some(input))
    }

    /// Disconnect `slot`.
    pub fn disconnect_input(&self, slot: usize) -> FxResult<()> {
        self.set_input(slot, None)
    }

    fn set_input(&self, slot: usize, input: Option<Arc<EffectInstance>>) -> FxResult<()> {
        {
            let mut inputs = self.inputs.write().map_err(|_| FxError::poisoned("inputs"))?;
            let n = inputs.len();
            let dst = inputs.get_mut(slot).ok_or_else(|| {
                FxError::validation(format!(
                    "'{}' has {n} input(s), slot {slot} is out of range",
                    self.name()
                ))
            })?;
            *dst = input;
        }
        self.project.bump_generation();
        self.request_render();
        Ok(())
    }

    fn reaches(&self, target: InstanceId) -> bool {
        self.inputs()
            .iter()
            .flatten()
            .any(|i| i.id == target || i.reaches(target))
    }

    /// Fingerprint of this effect's parameters combined with `input_hashes` (slot order,
    /// [`DISCONNECTED_INPUT_HASH`] for empty slots). Stores it as the current hash.
    pub fn compute_hash(&self, input_hashes: &[Hash64]) -> FxResult<Hash64> {
        let age = self.project.generation();
        let value = {
            let effect = self.effect()?;
            compute_fingerprint(effect.class_name(), effect.params(), input_hashes)
        };
        self.store_hash(value, age);
        Ok(value)
    }

    /// Recompute the fingerprint, recursing into inputs whose own fingerprint is stale.
    pub fn refresh_hash(&self) -> FxResult<Hash64> {
        if self.is_hash_valid() {
            return Ok(self.hash());
        }
        let mut input_hashes = Vec::new();
        for input in self.inputs() {
            input_hashes.push(match input {
                Some(i) => i.refresh_hash()?,
                None => DISCONNECTED_INPUT_HASH,
            });
        }
        self.compute_hash(&input_hashes)
    }

    /// Last stored fingerprint. Check [`EffectInstance::is_hash_valid`] before trusting it.
    pub fn hash(&self) -> Hash64 {
        self.hash_state().value
    }

    /// Whether the stored fingerprint was computed at the current project generation.
    pub fn is_hash_valid(&self) -> bool {
        self.hash_age() == self.project.generation()
    }

    /// Project generation the stored fingerprint was computed at; 0 when never computed.
    pub fn hash_age(&self) -> u64 {
        self.hash_state().age
    }

    pub(crate) fn store_hash(&self, value: Hash64, age: u64) {
        let mut st = self.hash.lock().unwrap_or_else(PoisonError::into_inner);
        // An older snapshot finishing late must not overwrite a newer fingerprint.
        if age >= st.age {
            *st = HashState { value, age };
        }
    }

    fn hash_state(&self) -> HashState {
        *self.hash.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set or clear the abort flag. In-flight renders observe it at their next poll point.
    pub fn set_aborted(&self, aborted: bool) {
        self.aborted.store(aborted, Ordering::Release);
    }

    /// Whether rendering was aborted.
    pub fn aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Abort any ongoing render that uses this effect.
    pub fn abort_rendering(&self) {
        tracing::debug!(node = %self.name(), "abort requested");
        self.set_aborted(true);
    }

    /// Whether the node shows a thumbnail preview.
    pub fn is_preview_enabled(&self) -> bool {
        self.preview_enabled.load(Ordering::Relaxed)
    }

    /// Flip the preview flag.
    pub fn toggle_preview(&self) {
        self.preview_enabled.fetch_xor(true, Ordering::Relaxed);
    }

    /// Post a blocking transient message. Returns the user's answer for
    /// [`MessageKind::Question`], `true` otherwise.
    pub fn message(&self, kind: MessageKind, content: &str) -> bool {
        match self.node() {
            Some(n) => n.message(kind, content),
            None => {
                log_message(&self.class_name, kind, content);
                kind != MessageKind::Question
            }
        }
    }

    /// Show a sticky message until [`EffectInstance::clear_persistent_message`].
    pub fn set_persistent_message(&self, kind: MessageKind, content: &str) {
        *self
            .persistent_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(PostedMessage {
            kind,
            content: content.to_string(),
        });
        match self.node() {
            Some(n) => n.set_persistent_message(kind, content),
            None => log_message(&self.class_name, kind, content),
        }
    }

    /// Remove the sticky message.
    pub fn clear_persistent_message(&self) {
        *self
            .persistent_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(n) = self.node() {
            n.clear_persistent_message();
        }
    }

    /// Current sticky message.
    pub fn persistent_message(&self) -> Option<PostedMessage> {
        self.persistent_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Tell the project timeline about a new frame range.
    pub fn notify_frame_range_changed(&self, first: i64, last: i64) -> FxResult<()> {
        let range = FrameRange::new(first, last)?;
        if let Some(n) = self.node() {
            n.notify_frame_range_changed(range);
        }
        Ok(())
    }

    /// Ask the interface to open every file parameter (called on node creation).
    pub fn open_files_for_all_file_knobs(&self) {
        if let Some(n) = self.node() {
            n.open_file_knobs();
        }
    }

    /// Ask viewers connected to this node to render again.
    pub fn request_render(&self) {
        if let Some(n) = self.node() {
            n.request_render();
        }
    }

    /// Region of definition from the current live state.
    pub fn region_of_definition(&self, time: SequenceTime) -> FxResult<RectI> {
        let inputs = self.inputs();
        let up = LiveUpstream {
            owner: self.name(),
            inputs: &inputs,
        };
        self.effect()?.region_of_definition(time, &up)
    }

    /// Per-input regions of interest from the current live state.
    pub fn region_of_interest(
        &self,
        time: SequenceTime,
        scale: RenderScale,
        window: RectI,
    ) -> FxResult<RoiMap> {
        let inputs = self.inputs();
        let up = LiveUpstream {
            owner: self.name(),
            inputs: &inputs,
        };
        Ok(self.effect()?.region_of_interest(time, scale, window, &up))
    }

    /// Frame range from the current live state.
    pub fn frame_range(&self) -> FxResult<FrameRange> {
        let inputs = self.inputs();
        let up = LiveUpstream {
            owner: self.name(),
            inputs: &inputs,
        };
        self.effect()?.frame_range(&up)
    }

    /// Render `window` at `time`/`scale`/`view`.
    ///
    /// Snapshots this instance and everything upstream into render clones, then evaluates
    /// them. Returns `Ok(None)` when `window` does not intersect the region of definition.
    /// Fails with [`FxError::Cancelled`] when aborted.
    #[tracing::instrument(skip(self), fields(node = %self.name()))]
    pub fn render_roi(
        self: &Arc<Self>,
        time: SequenceTime,
        scale: RenderScale,
        view: ViewIndex,
        window: RectI,
        bypass_cache: bool,
    ) -> FxResult<Option<Arc<Image>>> {
        let tree = RenderTree::snapshot(self)?;
        let request = orchestrator::Request {
            root: self,
            project: &self.project,
            time,
            scale,
            view,
        };
        let out = orchestrator::render_clone_roi(&request, tree.root(), window, bypass_cache);
        match &out {
            Err(e) if e.is_cancelled() => tracing::debug!("render cancelled"),
            Err(e) => tracing::warn!(error = %e, "render failed"),
            Ok(_) => {}
        }
        out
    }

    pub(crate) fn instance_lock(&self) -> MutexGuard<'_, ()> {
        self.instance_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

struct LiveUpstream<'a> {
    owner: String,
    inputs: &'a [Option<Arc<EffectInstance>>],
}

impl Upstream for LiveUpstream<'_> {
    fn owner_name(&self) -> &str {
        &self.owner
    }

    fn input_count(&self) -> usize {
        self.inputs.len()
    }

    fn is_connected(&self, slot: usize) -> bool {
        matches!(self.inputs.get(slot), Some(Some(_)))
    }

    fn input_region_of_definition(
        &self,
        slot: usize,
        time: SequenceTime,
    ) -> Option<FxResult<RectI>> {
        let input = self.inputs.get(slot)?.as_ref()?;
        Some(input.region_of_definition(time))
    }

    fn input_frame_range(&self, slot: usize) -> Option<FxResult<FrameRange>> {
        let input = self.inputs.get(slot)?.as_ref()?;
        Some(input.frame_range())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/instance.rs"]
mod tests;
