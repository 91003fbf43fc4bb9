use super::*;

use crate::effect::Effect;
use crate::effect::params::ParamValue;
use crate::effects::checkerboard::Checkerboard;
use crate::effects::constant::Constant;
use crate::effects::writer::Writer;
use crate::foundation::core::Format;
use crate::node::host::{BasicNode, NodeHost};
use crate::region::rect::RectI;
use crate::session::project::{Project, ProjectOpts};

#[derive(Default)]
struct VecSink {
    frames: Vec<(SequenceTime, ViewIndex, Option<RectI>)>,
    abort_after: Option<(usize, Arc<EffectInstance>)>,
}

impl FrameSink for VecSink {
    fn write_frame(
        &mut self,
        time: SequenceTime,
        view: ViewIndex,
        image: Option<&Image>,
    ) -> FxResult<()> {
        self.frames.push((time, view, image.map(Image::bounds)));
        if let Some((n, inst)) = &self.abort_after
            && self.frames.len() == *n
        {
            inst.abort_rendering();
        }
        Ok(())
    }
}

struct Chain {
    _nodes: Vec<Arc<BasicNode>>,
    source: Arc<EffectInstance>,
    writer: Arc<EffectInstance>,
}

fn chain(source: Box<dyn Effect>, format: Format, views: u32) -> Chain {
    let project = Project::new(ProjectOpts::default()).unwrap();
    let mut nodes = Vec::new();
    let mut add = |name: &str, effect: Box<dyn Effect>| {
        let node = Arc::new(BasicNode::new(name, format).with_views(views));
        let host: Arc<dyn NodeHost> = node.clone();
        nodes.push(node);
        EffectInstance::new(&project, &host, effect)
    };
    let source = add("src", source);
    let writer = add("out", Box::new(Writer::new()));
    writer.connect_input(0, Arc::clone(&source)).unwrap();
    Chain {
        _nodes: nodes,
        source,
        writer,
    }
}

#[test]
fn non_output_effects_are_rejected() {
    let c = chain(Box::new(Constant::new()), Format::default(), 1);
    assert!(matches!(
        OutputDriver::new(Arc::clone(&c.source)),
        Err(FxError::Validation(_))
    ));
    assert!(OutputDriver::new(Arc::clone(&c.writer)).is_ok());
}

#[test]
fn renders_every_frame_and_view_in_order() {
    let c = chain(Box::new(Constant::new()), Format::default(), 2);
    c.source.set_param("first_frame", ParamValue::Int(1)).unwrap();
    c.source.set_param("last_frame", ParamValue::Int(3)).unwrap();
    let driver = OutputDriver::new(Arc::clone(&c.writer)).unwrap();
    assert_eq!(driver.current_frame(), None);

    let mut sink = VecSink::default();
    let stats = driver.render_full_sequence(&mut sink).unwrap();
    assert_eq!(stats.frames_total, 3);
    assert_eq!(stats.images_written, 6);
    assert_eq!(stats.empty_images, 0);
    let order: Vec<(i64, u32)> = sink.frames.iter().map(|(t, v, _)| (t.0, v.0)).collect();
    assert_eq!(order, vec![(1, 0), (1, 1), (2, 0), (2, 1), (3, 0), (3, 1)]);
    assert_eq!(sink.frames[0].2, Some(RectI::new(0, 0, 100, 100)));
    assert_eq!(driver.current_frame(), Some(SequenceTime(3)));
}

#[test]
fn infinite_rod_is_clipped_to_the_node_format() {
    let format = Format {
        width: 64,
        height: 32,
    };
    let c = chain(Box::new(Checkerboard::new()), format, 1);
    let driver = OutputDriver::new(Arc::clone(&c.writer)).unwrap();
    let img = driver
        .render_frame(SequenceTime(0), ViewIndex(0), RenderScale::FULL)
        .unwrap()
        .unwrap();
    assert_eq!(img.bounds(), RectI::new(0, 0, 64, 32));
}

#[test]
fn abort_stops_the_sequence_and_is_reset_on_restart() {
    let c = chain(Box::new(Constant::new()), Format::default(), 1);
    c.source.set_param("last_frame", ParamValue::Int(9)).unwrap();
    let driver = OutputDriver::new(Arc::clone(&c.writer)).unwrap();

    let mut sink = VecSink {
        abort_after: Some((2, Arc::clone(&c.writer))),
        ..VecSink::default()
    };
    let err = driver.render_full_sequence(&mut sink).unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(sink.frames.len(), 2);
    assert_eq!(driver.current_frame(), Some(SequenceTime(1)));

    let mut sink = VecSink::default();
    let stats = driver.render_full_sequence(&mut sink).unwrap();
    assert_eq!(stats.frames_total, 10);
}

#[test]
fn unbounded_frame_range_is_rejected() {
    let c = chain(Box::new(Constant::new()), Format::default(), 1);
    c.writer.disconnect_input(0).unwrap();
    let driver = OutputDriver::new(Arc::clone(&c.writer)).unwrap();
    assert!(matches!(
        driver.render_full_sequence(&mut VecSink::default()),
        Err(FxError::Validation(_))
    ));
}
