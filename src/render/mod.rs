//! Evaluation of render clones: the recursive region-of-interest orchestrator, tile
//! dispatch by render safety and the output sequence driver.

pub(crate) mod orchestrator;
pub(crate) mod output;
pub(crate) mod tiling;
