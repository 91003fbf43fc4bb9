use smallvec::SmallVec;

use crate::foundation::core::{FrameRange, RenderScale, SequenceTime};
use crate::foundation::error::{FxError, FxResult};
use crate::region::rect::RectI;

/// Per-input regions of interest for one request.
///
/// A slot that is absent is not needed for the request and will not be rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoiMap {
    entries: SmallVec<[(usize, RectI); 4]>,
}

impl RoiMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region needed from `slot`, replacing any previous entry.
    pub fn insert(&mut self, slot: usize, region: RectI) {
        match self.entries.iter_mut().find(|(s, _)| *s == slot) {
            Some(e) => e.1 = region,
            None => {
                let at = self.entries.partition_point(|(s, _)| *s < slot);
                self.entries.insert(at, (slot, region));
            }
        }
    }

    /// Remove `slot` from the map.
    pub fn remove(&mut self, slot: usize) -> Option<RectI> {
        let i = self.entries.iter().position(|(s, _)| *s == slot)?;
        Some(self.entries.remove(i).1)
    }

    /// Region needed from `slot`, if any.
    pub fn get(&self, slot: usize) -> Option<RectI> {
        self.entries
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, r)| *r)
    }

    /// Entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, RectI)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of slots present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no input is needed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only view of an effect's connected inputs, as seen by region algebra.
///
/// Implemented for live instances and for render clones so the same effect code answers
/// both.
pub trait Upstream {
    /// Name of the effect whose inputs these are, for diagnostics.
    fn owner_name(&self) -> &str;

    /// Number of input slots (connected or not).
    fn input_count(&self) -> usize;

    /// Return `true` when `slot` is connected.
    fn is_connected(&self, slot: usize) -> bool;

    /// Region of definition of the effect connected to `slot`, `None` when disconnected.
    fn input_region_of_definition(
        &self,
        slot: usize,
        time: SequenceTime,
    ) -> Option<FxResult<RectI>>;

    /// Frame range of the effect connected to `slot`, `None` when disconnected.
    fn input_frame_range(&self, slot: usize) -> Option<FxResult<FrameRange>>;
}

/// Union of all connected inputs' regions of definition.
///
/// Fails with [`FxError::NoRegionOfDefinition`] when nothing is connected.
pub fn default_region_of_definition(
    time: SequenceTime,
    upstream: &dyn Upstream,
) -> FxResult<RectI> {
    let mut rod: Option<RectI> = None;
    for slot in 0..upstream.input_count() {
        let Some(r) = upstream.input_region_of_definition(slot, time) else {
            continue;
        };
        let r = r?;
        rod = Some(rod.map_or(r, |acc| acc.union(r)));
    }
    rod.ok_or_else(|| FxError::NoRegionOfDefinition {
        effect: upstream.owner_name().to_string(),
    })
}

/// The render window unchanged for every connected input.
pub fn default_region_of_interest(
    _time: SequenceTime,
    _scale: RenderScale,
    window: RectI,
    upstream: &dyn Upstream,
) -> RoiMap {
    let mut map = RoiMap::new();
    for slot in 0..upstream.input_count() {
        if upstream.is_connected(slot) {
            map.insert(slot, window);
        }
    }
    map
}

/// Merge of the connected inputs' frame ranges, unbounded when nothing is connected.
pub fn default_frame_range(upstream: &dyn Upstream) -> FxResult<FrameRange> {
    let mut range: Option<FrameRange> = None;
    for slot in 0..upstream.input_count() {
        let Some(r) = upstream.input_frame_range(slot) else {
            continue;
        };
        let r = r?;
        range = Some(range.map_or(r, |acc| acc.merge(r)));
    }
    Ok(range.unwrap_or(FrameRange::UNBOUNDED))
}

#[cfg(test)]
#[path = "../../tests/unit/region/algebra.rs"]
mod tests;
