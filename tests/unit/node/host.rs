use super::*;

#[test]
fn records_messages_and_answers_questions() {
    let node = BasicNode::new("read1", Format::default()).answering(false);
    assert!(node.message(MessageKind::Information, "loaded"));
    assert!(!node.message(MessageKind::Question, "reload?"));
    let kinds: Vec<MessageKind> = node.transient_messages().iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![MessageKind::Information, MessageKind::Question]);
}

#[test]
fn persistent_message_replaces_and_clears() {
    let node = BasicNode::new("n", Format::default());
    node.set_persistent_message(MessageKind::Warning, "first");
    node.set_persistent_message(MessageKind::Error, "second");
    assert_eq!(
        node.persistent_message(),
        Some(PostedMessage {
            kind: MessageKind::Error,
            content: "second".to_string(),
        })
    );
    node.clear_persistent_message();
    assert_eq!(node.persistent_message(), None);
}

#[test]
fn views_are_at_least_one() {
    let node = BasicNode::new("n", Format::default()).with_views(0);
    assert_eq!(node.render_views_count(), 1);
    assert_eq!(BasicNode::new("s", Format::default()).with_views(2).render_views_count(), 2);
}

#[test]
fn tracks_frame_range_and_render_requests() {
    let node = BasicNode::new("n", Format::default());
    assert_eq!(node.notified_frame_range(), None);
    let r = FrameRange::new(3, 8).unwrap();
    node.notify_frame_range_changed(r);
    assert_eq!(node.notified_frame_range(), Some(r));
    node.request_render();
    node.request_render();
    assert_eq!(node.render_requests(), 2);
    node.open_file_knobs();
}
