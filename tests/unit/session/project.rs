use super::*;

#[test]
fn zero_threads_is_rejected() {
    let opts = ProjectOpts {
        render: RenderOpts {
            threads: Some(0),
            ..RenderOpts::default()
        },
        ..ProjectOpts::default()
    };
    assert!(matches!(Project::new(opts), Err(FxError::Validation(_))));
}

#[test]
fn generation_starts_at_one_and_increases() {
    let p = Project::new(ProjectOpts::default()).unwrap();
    assert_eq!(p.generation(), 1);
    assert_eq!(p.bump_generation(), 2);
    assert_eq!(p.generation(), 2);
}

#[test]
fn explicit_thread_count_sizes_the_pool() {
    let opts = ProjectOpts {
        render: RenderOpts {
            threads: Some(3),
            ..RenderOpts::default()
        },
        ..ProjectOpts::default()
    };
    let p = Project::new(opts).unwrap();
    assert_eq!(p.pool().current_num_threads(), 3);
}
