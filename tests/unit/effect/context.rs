use super::*;

fn args(x: i32) -> RenderArgs {
    RenderArgs {
        roi: RectI::new(x, 0, x + 1, 1),
        time: SequenceTime(0),
        scale: RenderScale::FULL,
        view: ViewIndex(0),
    }
}

#[test]
fn nested_calls_restore_caller_args() {
    let active = ActiveRenders::default();
    assert_eq!(active.current(), None);
    {
        let _outer = active.enter(args(1));
        assert_eq!(active.current(), Some(args(1)));
        {
            let _inner = active.enter(args(2));
            assert_eq!(active.current(), Some(args(2)));
        }
        assert_eq!(active.current(), Some(args(1)));
    }
    assert_eq!(active.current(), None);
}

#[test]
fn args_are_not_visible_from_other_threads() {
    let active = ActiveRenders::default();
    let _g = active.enter(args(3));
    std::thread::scope(|s| {
        s.spawn(|| assert_eq!(active.current(), None));
    });
    assert_eq!(active.current(), Some(args(3)));
}

#[test]
fn poisoned_stack_keeps_caller_args() {
    let active = ActiveRenders::default();
    let _outer = active.enter(args(1));
    std::thread::scope(|s| {
        let poisoner = s.spawn(|| {
            let _map = active.by_thread.lock().unwrap();
            panic!("poison the stack lock");
        });
        assert!(poisoner.join().is_err());
    });
    assert!(active.by_thread.is_poisoned());
    {
        let _inner = active.enter(args(2));
        assert_eq!(active.current(), Some(args(2)));
    }
    assert_eq!(active.current(), Some(args(1)));
}
