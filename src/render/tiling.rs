use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use crate::region::rect::RectI;
use crate::session::project::RenderOpts;

// One mutex per plugin class, shared by every instance of that class in the process.
static PLUGIN_LOCKS: LazyLock<Mutex<HashMap<String, Arc<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Process-wide production lock of the plugin named `class_name`.
pub(crate) fn plugin_lock(class_name: &str) -> Arc<Mutex<()>> {
    let mut locks = PLUGIN_LOCKS.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(locks.entry(class_name.to_string()).or_default())
}

/// Rows per tile when a fully-safe production call over `window` is split across `workers`.
pub(crate) fn tile_rows(window: RectI, opts: &RenderOpts, workers: usize) -> u32 {
    let max_tiles = opts.max_tiles.unwrap_or(workers).max(1);
    let max_tiles = u32::try_from(max_tiles).unwrap_or(u32::MAX);
    window
        .height()
        .div_ceil(max_tiles)
        .max(opts.min_tile_rows.max(1))
}

#[cfg(test)]
#[path = "../../tests/unit/render/tiling.rs"]
mod tests;
