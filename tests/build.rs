use crucible_di::{Container, DiError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_build_constructs_everything_eagerly() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct A;
    struct B;

    let container = Container::new();
    container
        .provide(|| {
            BUILT.fetch_add(1, Ordering::SeqCst);
            A
        })
        .unwrap();
    container
        .provide(|| {
            BUILT.fetch_add(1, Ordering::SeqCst);
            B
        })
        .unwrap();

    assert_eq!(BUILT.load(Ordering::SeqCst), 0);
    container.build().unwrap();
    // Both ran during the build, before any injection.
    assert_eq!(BUILT.load(Ordering::SeqCst), 2);
}

#[test]
fn test_diamond_graph_constructs_shared_node_once() {
    static BASE_BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Base;
    struct Left {
        base: Arc<Base>,
    }
    struct Right {
        base: Arc<Base>,
    }
    struct Top {
        left: Arc<Left>,
        right: Arc<Right>,
    }

    let container = Container::new();
    container
        .provide(|| {
            BASE_BUILT.fetch_add(1, Ordering::SeqCst);
            Base
        })
        .unwrap();
    container
        .provide(|base: Arc<Base>| Left { base })
        .unwrap();
    container
        .provide(|base: Arc<Base>| Right { base })
        .unwrap();
    container
        .provide(|left: Arc<Left>, right: Arc<Right>| Top { left, right })
        .unwrap();
    container.build().unwrap();

    assert_eq!(BASE_BUILT.load(Ordering::SeqCst), 1);

    // Both arms of the diamond share the one base instance.
    let top = container.inject::<Top>();
    assert!(Arc::ptr_eq(&top.left.base, &top.right.base));
}

#[test]
fn test_missing_required_dependency_fails_build() {
    struct Database;
    struct Repo {
        _db: Arc<Database>,
    }

    let container = Container::new();
    container.provide(|db: Arc<Database>| Repo { _db: db }).unwrap();

    match container.build() {
        Err(DiError::Build(errors)) => {
            assert_eq!(errors.len(), 1);
            match &errors[0] {
                DiError::MissingDependency {
                    consumer,
                    dependency,
                } => {
                    assert!(consumer.to_string().contains("Repo"));
                    assert!(dependency.to_string().contains("Database"));
                }
                other => panic!("expected MissingDependency, got {:?}", other),
            }
        }
        other => panic!("expected build failure, got {:?}", other),
    }
    assert!(!container.is_built());
}

#[test]
fn test_build_reports_multiple_failures_in_one_pass() {
    struct NeedsString {
        _s: Arc<String>,
    }
    struct NeedsU64 {
        _n: Arc<u64>,
    }

    let container = Container::new();
    container
        .provide(|s: Arc<String>| NeedsString { _s: s })
        .unwrap();
    container.provide(|n: Arc<u64>| NeedsU64 { _n: n }).unwrap();

    match container.build() {
        Err(DiError::Build(errors)) => {
            // Both independent failures surface from a single build call.
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected build failure, got {:?}", other),
    }
}

#[test]
fn test_shared_failure_not_repeated_per_dependent() {
    struct Broken;
    struct UserA {
        _b: Arc<Broken>,
    }
    struct UserB {
        _b: Arc<Broken>,
    }

    let container = Container::new();
    container
        .provide_result(|| -> Result<Broken, std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
        })
        .unwrap();
    container.provide(|b: Arc<Broken>| UserA { _b: b }).unwrap();
    container.provide(|b: Arc<Broken>| UserB { _b: b }).unwrap();

    match container.build() {
        Err(DiError::Build(errors)) => {
            // One root cause, not three copies of it.
            assert_eq!(errors.len(), 1);
            assert!(matches!(errors[0], DiError::ConstructorFailed { .. }));
        }
        other => panic!("expected build failure, got {:?}", other),
    }
}

#[test]
fn test_failed_constructor_runs_once_across_builds() {
    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

    struct Flaky;

    let container = Container::new();
    container
        .provide_result(|| -> Result<Flaky, std::io::Error> {
            ATTEMPTS.fetch_add(1, Ordering::SeqCst);
            Err(std::io::Error::new(std::io::ErrorKind::Other, "down"))
        })
        .unwrap();

    assert!(container.build().is_err());
    // The second build replays the cached failure without re-running.
    assert!(container.build().is_err());
    assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_build_leaves_injection_closed() {
    struct Good;
    struct Bad {
        _missing: Arc<String>,
    }

    let container = Container::new();
    container.bind(Good).unwrap();
    container
        .provide(|missing: Arc<String>| Bad { _missing: missing })
        .unwrap();
    assert!(container.build().is_err());

    // Even bindings that resolved fine are unavailable after a failed build.
    assert!(matches!(
        container.try_inject::<Good>(),
        Err(DiError::NotBuilt)
    ));
}

#[test]
fn test_constructor_error_source_preserved() {
    #[derive(Debug)]
    struct ConfigError(&'static str);

    impl std::fmt::Display for ConfigError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "bad config: {}", self.0)
        }
    }
    impl std::error::Error for ConfigError {}

    struct Config;

    let container = Container::new();
    container
        .provide_result(|| -> Result<Config, ConfigError> { Err(ConfigError("port")) })
        .unwrap();

    match container.build() {
        Err(DiError::Build(errors)) => match &errors[0] {
            DiError::ConstructorFailed { source, .. } => {
                let cause = source.downcast_ref::<ConfigError>().unwrap();
                assert_eq!(cause.0, "port");
            }
            other => panic!("expected ConstructorFailed, got {:?}", other),
        },
        other => panic!("expected build failure, got {:?}", other),
    }
}

#[test]
fn test_rebuild_after_success_is_noop() {
    let container = Container::new();
    container.bind(5u8).unwrap();
    container.build().unwrap();
    container.build().unwrap();

    assert_eq!(*container.inject::<u8>(), 5);
}

#[test]
#[should_panic(expected = "Failed to build container")]
fn test_must_build_panics_on_failure() {
    struct Orphan {
        _dep: Arc<String>,
    }

    let container = Container::new();
    container
        .provide(|dep: Arc<String>| Orphan { _dep: dep })
        .unwrap();
    container.must_build();
}

#[test]
fn test_must_build_succeeds_quietly() {
    let container = Container::new();
    container.bind(true).unwrap();
    container.must_build();
    assert!(*container.inject::<bool>());
}

#[test]
fn test_empty_container_builds() {
    let container = Container::new();
    container.build().unwrap();
    assert!(container.is_built());
    assert_eq!(container.binding_count(), 0);
}
