//! Built-in effects.

pub(crate) mod blur;
pub(crate) mod checkerboard;
pub(crate) mod constant;
pub(crate) mod invert;
pub(crate) mod merge;
pub(crate) mod pixel;
pub(crate) mod writer;

use crate::effect::Effect;
use crate::foundation::error::{FxError, FxResult};

/// Kind names accepted by [`create_effect`], as used in graph files.
pub const EFFECT_KINDS: &[&str] = &[
    "constant",
    "checkerboard",
    "box_blur",
    "merge",
    "invert",
    "writer",
];

/// Instantiate a built-in effect with default parameters.
pub fn create_effect(kind: &str) -> FxResult<Box<dyn Effect>> {
    let effect: Box<dyn Effect> = match kind {
        "constant" => Box::new(constant::Constant::new()),
        "checkerboard" => Box::new(checkerboard::Checkerboard::new()),
        "box_blur" => Box::new(blur::BoxBlur::new()),
        "merge" => Box::new(merge::Merge::new()),
        "invert" => Box::new(invert::Invert::new()),
        "writer" => Box::new(writer::Writer::new()),
        other => {
            return Err(FxError::validation(format!(
                "unknown effect kind '{other}' (expected one of: {})",
                EFFECT_KINDS.join(", ")
            )));
        }
    };
    Ok(effect)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mod.rs"]
mod tests;
