use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::Format;
use crate::foundation::error::{FxError, FxResult};
use crate::raster::cache::{ImageCache, MemoryImageCache};

/// Tiling and worker-pool controls.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Minimum number of rows per tile when a fully-safe effect is split.
    pub min_tile_rows: u32,
    /// Upper bound on tiles per production call. `None` uses the pool width.
    pub max_tiles: Option<usize>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            threads: None,
            min_tile_rows: 16,
            max_tiles: None,
        }
    }
}

/// Project-wide settings.
#[derive(Clone, Debug, Default)]
pub struct ProjectOpts {
    /// Tiling and threading.
    pub render: RenderOpts,
    /// Format used when an output's region of definition is unbounded.
    pub default_format: Format,
}

/// State shared by every effect instance of a project: the edit generation counter, the
/// image cache and the tile worker pool.
pub struct Project {
    opts: ProjectOpts,
    generation: AtomicU64,
    cache: Arc<dyn ImageCache>,
    pool: rayon::ThreadPool,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("opts", &self.opts)
            .field("generation", &self.generation())
            .field("threads", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

impl Project {
    /// Create a project backed by an in-memory image cache.
    pub fn new(opts: ProjectOpts) -> FxResult<Arc<Self>> {
        Self::with_cache(opts, Arc::new(MemoryImageCache::default()))
    }

    /// Create a project with a caller-provided image cache.
    pub fn with_cache(opts: ProjectOpts, cache: Arc<dyn ImageCache>) -> FxResult<Arc<Self>> {
        let pool = build_thread_pool(opts.render.threads)?;
        Ok(Arc::new(Self {
            opts,
            generation: AtomicU64::new(1),
            cache,
            pool,
        }))
    }

    /// Settings.
    pub fn opts(&self) -> &ProjectOpts {
        &self.opts
    }

    /// Current edit generation. Fingerprints computed at an older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// The image cache.
    pub fn cache(&self) -> &Arc<dyn ImageCache> {
        &self.cache
    }

    pub(crate) fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn pool(&self) -> &rayon::ThreadPool {
        &self.pool
    }
}

fn build_thread_pool(threads: Option<usize>) -> FxResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FxError::validation(
            "render 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("fx-tile-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FxError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/project.rs"]
mod tests;
