use super::*;

#[derive(Default)]
struct FakeUpstream {
    rods: Vec<Option<RectI>>,
    ranges: Vec<Option<FrameRange>>,
    broken_range: Option<usize>,
}

impl Upstream for FakeUpstream {
    fn owner_name(&self) -> &str {
        "Fake1"
    }

    fn input_count(&self) -> usize {
        self.rods.len()
    }

    fn is_connected(&self, slot: usize) -> bool {
        self.rods.get(slot).is_some_and(Option::is_some)
    }

    fn input_region_of_definition(
        &self,
        slot: usize,
        _time: SequenceTime,
    ) -> Option<FxResult<RectI>> {
        self.rods.get(slot).copied().flatten().map(Ok)
    }

    fn input_frame_range(&self, slot: usize) -> Option<FxResult<FrameRange>> {
        if self.broken_range == Some(slot) {
            return Some(Err(FxError::poisoned("effect")));
        }
        self.ranges.get(slot).copied().flatten().map(Ok)
    }
}

#[test]
fn rod_defaults_to_union_of_connected_inputs() {
    let up = FakeUpstream {
        rods: vec![
            Some(RectI::new(0, 0, 100, 100)),
            None,
            Some(RectI::new(100, 0, 200, 100)),
        ],
        ranges: vec![None; 3],
        ..FakeUpstream::default()
    };
    let rod = default_region_of_definition(SequenceTime(0), &up).unwrap();
    assert_eq!(rod, RectI::new(0, 0, 200, 100));
}

#[test]
fn rod_without_connected_inputs_fails() {
    let up = FakeUpstream {
        rods: vec![None, None],
        ranges: vec![None, None],
        ..FakeUpstream::default()
    };
    let err = default_region_of_definition(SequenceTime(0), &up).unwrap_err();
    assert!(matches!(err, FxError::NoRegionOfDefinition { ref effect } if effect == "Fake1"));
}

#[test]
fn roi_default_passes_window_to_every_connected_input() {
    let up = FakeUpstream {
        rods: vec![Some(RectI::new(0, 0, 1, 1)), None, Some(RectI::EMPTY)],
        ranges: vec![None; 3],
        ..FakeUpstream::default()
    };
    let w = RectI::new(3, 4, 50, 60);
    let map = default_region_of_interest(SequenceTime(7), RenderScale::FULL, w, &up);
    assert_eq!(map.iter().collect::<Vec<_>>(), vec![(0, w), (2, w)]);
    assert_eq!(map.get(1), None);
}

#[test]
fn frame_range_merges_inputs_or_is_unbounded() {
    let up = FakeUpstream {
        rods: vec![None, None],
        ranges: vec![
            Some(FrameRange::new(1, 10).unwrap()),
            Some(FrameRange::new(5, 30).unwrap()),
        ],
        ..FakeUpstream::default()
    };
    assert_eq!(
        default_frame_range(&up).unwrap(),
        FrameRange::new(1, 30).unwrap()
    );

    let none = FakeUpstream {
        rods: vec![None],
        ranges: vec![None],
        ..FakeUpstream::default()
    };
    assert_eq!(default_frame_range(&none).unwrap(), FrameRange::UNBOUNDED);
}

#[test]
fn frame_range_error_is_not_treated_as_disconnected() {
    let up = FakeUpstream {
        rods: vec![None, None],
        ranges: vec![Some(FrameRange::new(1, 10).unwrap()), None],
        broken_range: Some(1),
    };
    let err = default_frame_range(&up).unwrap_err();
    assert!(err.to_string().contains("poisoned"));
}

#[test]
fn roi_map_keeps_slot_order_and_replaces() {
    let mut m = RoiMap::new();
    m.insert(2, RectI::new(0, 0, 1, 1));
    m.insert(0, RectI::new(0, 0, 2, 2));
    m.insert(2, RectI::new(0, 0, 3, 3));
    assert_eq!(m.len(), 2);
    assert_eq!(
        m.iter().map(|(s, _)| s).collect::<Vec<_>>(),
        vec![0, 2]
    );
    assert_eq!(m.get(2), Some(RectI::new(0, 0, 3, 3)));
    assert_eq!(m.remove(0), Some(RectI::new(0, 0, 2, 2)));
    assert!(!m.is_empty());
}
