use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::effect::MessageKind;
use crate::foundation::core::{Format, FrameRange};

/// The node and interface layer an effect instance lives in.
///
/// The render core only talks to its surroundings through this trait. Messages may be
/// posted from any render thread.
pub trait NodeHost: Send + Sync {
    /// Node name, unique within the project.
    fn name(&self) -> &str;

    /// Output format of the node.
    fn render_format(&self) -> Format;

    /// Number of views the node renders.
    fn render_views_count(&self) -> u32;

    /// Whether anything downstream consumes this node.
    fn has_output_connected(&self) -> bool;

    /// Blocking request/response message. Returns the answer for questions, `true` otherwise.
    fn message(&self, kind: MessageKind, content: &str) -> bool;

    /// Show a sticky message on the node until cleared.
    fn set_persistent_message(&self, kind: MessageKind, content: &str);

    /// Remove the sticky message.
    fn clear_persistent_message(&self);

    /// The effect's frame range changed; the project timeline should follow.
    fn notify_frame_range_changed(&self, range: FrameRange);

    /// Ask the interface to open every file parameter of the node.
    fn open_file_knobs(&self) {}

    /// Something changed that invalidates what viewers show.
    fn request_render(&self) {}
}

/// A message recorded by [`BasicNode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostedMessage {
    /// Message kind.
    pub kind: MessageKind,
    /// Message text.
    pub content: String,
}

/// Headless [`NodeHost`]: logs messages through `tracing` and keeps them for inspection.
#[derive(Debug)]
pub struct BasicNode {
    name: String,
    format: Format,
    views: u32,
    has_output: AtomicBool,
    answer_questions: bool,
    transient: Mutex<Vec<PostedMessage>>,
    persistent: Mutex<Option<PostedMessage>>,
    frame_range: Mutex<Option<FrameRange>>,
    render_requests: AtomicU64,
}

impl BasicNode {
    /// Create a node with one view.
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            name: name.into(),
            format,
            views: 1,
            has_output: AtomicBool::new(false),
            answer_questions: true,
            transient: Mutex::new(Vec::new()),
            persistent: Mutex::new(None),
            frame_range: Mutex::new(None),
            render_requests: AtomicU64::new(0),
        }
    }

    /// Builder-style view count.
    pub fn with_views(mut self, views: u32) -> Self {
        self.views = views.max(1);
        self
    }

    /// Builder-style answer given to question messages.
    pub fn answering(mut self, yes: bool) -> Self {
        self.answer_questions = yes;
        self
    }

    /// Mark whether a downstream node consumes this one.
    pub fn set_output_connected(&self, connected: bool) {
        self.has_output.store(connected, Ordering::Relaxed);
    }

    /// Transient messages posted so far.
    pub fn transient_messages(&self) -> Vec<PostedMessage> {
        self.transient
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    /// Current sticky message.
    pub fn persistent_message(&self) -> Option<PostedMessage> {
        self.persistent.lock().ok().and_then(|m| m.clone())
    }

    /// Last frame range notified by the effect.
    pub fn notified_frame_range(&self) -> Option<FrameRange> {
        self.frame_range.lock().ok().and_then(|r| *r)
    }

    /// Number of render requests received.
    pub fn render_requests(&self) -> u64 {
        self.render_requests.load(Ordering::Relaxed)
    }
}

impl NodeHost for BasicNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn render_format(&self) -> Format {
        self.format
    }

    fn render_views_count(&self) -> u32 {
        self.views
    }

    fn has_output_connected(&self) -> bool {
        self.has_output.load(Ordering::Relaxed)
    }

    fn message(&self, kind: MessageKind, content: &str) -> bool {
        log_message(&self.name, kind, content);
        if let Ok(mut v) = self.transient.lock() {
            v.push(PostedMessage {
                kind,
                content: content.to_string(),
            });
        }
        match kind {
            MessageKind::Question => self.answer_questions,
            _ => true,
        }
    }

    fn set_persistent_message(&self, kind: MessageKind, content: &str) {
        log_message(&self.name, kind, content);
        if let Ok(mut m) = self.persistent.lock() {
            *m = Some(PostedMessage {
                kind,
                content: content.to_string(),
            });
        }
    }

    fn clear_persistent_message(&self) {
        if let Ok(mut m) = self.persistent.lock() {
            *m = None;
        }
    }

    fn notify_frame_range_changed(&self, range: FrameRange) {
        tracing::debug!(
            node = %self.name,
            first = range.first.0,
            last = range.last.0,
            "frame range changed"
        );
        if let Ok(mut r) = self.frame_range.lock() {
            *r = Some(range);
        }
    }

    fn request_render(&self) {
        self.render_requests.fetch_add(1, Ordering::Relaxed);
    }
}

pub(crate) fn log_message(node: &str, kind: MessageKind, content: &str) {
    match kind {
        MessageKind::Information | MessageKind::Question => {
            tracing::info!(node = %node, "{content}")
        }
        MessageKind::Warning => tracing::warn!(node = %node, "{content}"),
        MessageKind::Error => tracing::error!(node = %node, "{content}"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/host.rs"]
mod tests;
