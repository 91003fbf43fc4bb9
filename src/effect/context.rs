use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

use crate::effect::MessageKind;
use crate::effect::clone::RenderClone;
use crate::effect::instance::EffectInstance;
use crate::foundation::core::{RenderScale, SequenceTime, ViewIndex};
use crate::raster::buffer::InputImages;
use crate::region::rect::RectI;

/// Arguments of one render call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderArgs {
    /// Region being produced.
    pub roi: RectI,
    /// Frame.
    pub time: SequenceTime,
    /// Proxy scale.
    pub scale: RenderScale,
    /// View.
    pub view: ViewIndex,
}

/// Render calls currently executing on a render clone, per thread.
///
/// Each thread sees a stack: a nested call pushes its own arguments and the caller's are
/// visible again once the nested call returns.
#[derive(Debug, Default)]
pub(crate) struct ActiveRenders {
    by_thread: Mutex<HashMap<ThreadId, Vec<RenderArgs>>>,
}

impl ActiveRenders {
    pub(crate) fn enter(&self, args: RenderArgs) -> ActiveRenderGuard<'_> {
        let thread = std::thread::current().id();
        self.by_thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(thread)
            .or_default()
            .push(args);
        ActiveRenderGuard {
            owner: self,
            thread,
        }
    }

    pub(crate) fn current(&self) -> Option<RenderArgs> {
        let thread = std::thread::current().id();
        let map = self.by_thread.lock().unwrap_or_else(PoisonError::into_inner);
        map.get(&thread).and_then(|s| s.last().copied())
    }
}

pub(crate) struct ActiveRenderGuard<'a> {
    owner: &'a ActiveRenders,
    thread: ThreadId,
}

impl Drop for ActiveRenderGuard<'_> {
    fn drop(&mut self) {
        let mut map = self
            .owner
            .by_thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(stack) = map.get_mut(&self.thread) {
            stack.pop();
            if stack.is_empty() {
                map.remove(&self.thread);
            }
        }
    }
}

/// What an effect sees while pre-processing or producing pixels.
pub struct RenderCall<'a> {
    clone: &'a RenderClone,
    root: &'a EffectInstance,
    args: RenderArgs,
    inputs: &'a InputImages,
    posted: AtomicBool,
}

impl<'a> RenderCall<'a> {
    pub(crate) fn new(
        clone: &'a RenderClone,
        root: &'a EffectInstance,
        args: RenderArgs,
        inputs: &'a InputImages,
    ) -> Self {
        Self {
            clone,
            root,
            args,
            inputs,
            posted: AtomicBool::new(false),
        }
    }

    /// Arguments of the request. `roi` is the whole window; a tile's share is its own bounds.
    pub fn args(&self) -> RenderArgs {
        self.args
    }

    /// Rendered upstream images.
    pub fn inputs(&self) -> &InputImages {
        self.inputs
    }

    /// Name of the node being rendered.
    pub fn name(&self) -> &str {
        self.clone.name()
    }

    /// Render clone being evaluated.
    pub fn clone_instance(&self) -> &RenderClone {
        self.clone
    }

    /// Whether the request was cancelled. Long production calls may poll this.
    pub fn aborted(&self) -> bool {
        self.root.aborted() || self.clone.aborted()
    }

    /// Post a blocking transient message. See [`EffectInstance::message`].
    pub fn message(&self, kind: MessageKind, content: &str) -> bool {
        self.posted.store(true, Ordering::Release);
        self.clone.source().message(kind, content)
    }

    /// Post a sticky message on the node. See [`EffectInstance::set_persistent_message`].
    pub fn set_persistent_message(&self, kind: MessageKind, content: &str) {
        self.posted.store(true, Ordering::Release);
        self.clone.source().set_persistent_message(kind, content);
    }

    pub(crate) fn posted_message(&self) -> bool {
        self.posted.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/context.rs"]
mod tests;
