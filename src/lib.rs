//! fxgraph is the render-evaluation core of a node-based compositor.
//!
//! An effect graph is made of live [`EffectInstance`]s, one per node. Rendering a node:
//!
//! - snapshots it and everything upstream into immutable [`RenderClone`]s
//! - resolves regions of definition and per-input regions of interest
//! - renders inputs first, consulting the project's [`ImageCache`]
//! - runs the effect's production routine under its declared [`RenderSafety`]
//!
//! Renders can be cancelled with [`EffectInstance::set_aborted`]; effects report problems
//! through transient and persistent messages on their node.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod effect;
pub(crate) mod effects;
pub(crate) mod node;
pub(crate) mod raster;
pub(crate) mod region;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;

pub use crate::foundation::core::{
    Format, FrameRange, RenderScale, Rgba8Premul, SequenceTime, ViewIndex,
};
pub use crate::foundation::error::{FxError, FxResult};

pub use crate::effect::clone::{RenderClone, RenderTree};
pub use crate::effect::context::{RenderArgs, RenderCall};
pub use crate::effect::fingerprint::{DISCONNECTED_INPUT_HASH, Hash64, compute_fingerprint};
pub use crate::effect::instance::{EffectInstance, InstanceId};
pub use crate::effect::params::{Param, ParamSet, ParamValue};
pub use crate::effect::{Effect, MessageKind, RenderSafety, Status};
pub use crate::effects::blur::{BoxBlur, MAX_BLUR_RADIUS};
pub use crate::effects::checkerboard::Checkerboard;
pub use crate::effects::constant::Constant;
pub use crate::effects::invert::Invert;
pub use crate::effects::merge::Merge;
pub use crate::effects::writer::{Writer, file_name_for};
pub use crate::effects::{EFFECT_KINDS, create_effect};
pub use crate::node::host::{BasicNode, NodeHost, PostedMessage};
pub use crate::raster::buffer::{Image, InputImages, TileMut};
pub use crate::raster::cache::{
    CacheStats, ImageCache, ImageKey, MemoryCacheOpts, MemoryImageCache, Persistence,
};
pub use crate::region::algebra::{
    RoiMap, Upstream, default_frame_range, default_region_of_definition,
    default_region_of_interest,
};
pub use crate::region::rect::RectI;
pub use crate::render::output::{FrameSink, OutputDriver, SequenceStats};
pub use crate::scene::graph::{Graph, GraphDesc, NodeDesc};
pub use crate::session::project::{Project, ProjectOpts, RenderOpts};
