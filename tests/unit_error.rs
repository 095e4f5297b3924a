use crucible_di::{DiError, Key};
use std::error::Error;
use std::sync::Arc;

fn boxed(message: &'static str) -> Arc<dyn Error + Send + Sync> {
    Arc::from(Box::<dyn Error + Send + Sync>::from(message))
}

#[test]
fn test_duplicate_binding_display() {
    let err = DiError::DuplicateBinding(Key::of::<u32>());
    assert_eq!(err.to_string(), "Duplicate binding: u32");

    let err = DiError::DuplicateBinding(Key::named::<u32>("alt"));
    assert_eq!(err.to_string(), "Duplicate binding: u32[alt]");
}

#[test]
fn test_not_found_display() {
    let err = DiError::NotFound(Key::of::<bool>());
    assert_eq!(err.to_string(), "Binding not found: bool");
}

#[test]
fn test_lifecycle_state_displays() {
    assert_eq!(DiError::NotBuilt.to_string(), "Container has not been built");
    assert_eq!(
        DiError::Sealed.to_string(),
        "Container already built; registration is closed"
    );
}

#[test]
fn test_missing_dependency_display() {
    let err = DiError::MissingDependency {
        consumer: Key::of::<u8>(),
        dependency: Key::of::<u16>(),
    };
    assert_eq!(err.to_string(), "Unresolved dependency: u8 requires u16");
}

#[test]
fn test_cycle_display() {
    let err = DiError::Cycle(vec![Key::of::<u8>(), Key::of::<u16>(), Key::of::<u8>()]);
    assert_eq!(err.to_string(), "Circular dependency: u8 -> u16 -> u8");
}

#[test]
fn test_argument_count_display() {
    let err = DiError::ArgumentCount {
        target: Key::of::<u32>(),
        expected: 2,
        actual: 3,
    };
    assert_eq!(
        err.to_string(),
        "Invocation of u32 failed: expected 2 arguments, got 3"
    );
}

#[test]
fn test_invalid_argument_display() {
    let err = DiError::InvalidArgument {
        target: Key::of::<u32>(),
        index: 1,
        expected: "u64",
    };
    assert_eq!(
        err.to_string(),
        "Invocation of u32 failed: argument 1 is not u64"
    );
}

#[test]
fn test_constructor_failed_display_and_source() {
    let err = DiError::ConstructorFailed {
        target: Key::of::<u32>(),
        source: boxed("connection refused"),
    };
    assert_eq!(
        err.to_string(),
        "Constructor for u32 failed: connection refused"
    );
    assert_eq!(err.source().unwrap().to_string(), "connection refused");
}

#[test]
fn test_build_aggregate_display() {
    let err = DiError::Build(vec![
        DiError::NotFound(Key::of::<u8>()),
        DiError::NotBuilt,
    ]);
    assert_eq!(
        err.to_string(),
        "Container build failed with 2 error(s): Binding not found: u8; Container has not been built"
    );
}

#[test]
fn test_hook_error_displays_and_sources() {
    let start = DiError::StartHook {
        index: 0,
        source: boxed("listener refused"),
    };
    assert_eq!(start.to_string(), "Start hook 0 failed: listener refused");
    assert!(start.source().is_some());

    let stop = DiError::StopHook {
        index: 2,
        source: boxed("flush failed"),
    };
    assert_eq!(stop.to_string(), "Stop hook 2 failed: flush failed");
    assert!(stop.source().is_some());
}

#[test]
fn test_shutdown_aggregate_display() {
    let err = DiError::Shutdown(vec![DiError::StopHook {
        index: 1,
        source: boxed("flush failed"),
    }]);
    assert_eq!(
        err.to_string(),
        "Shutdown completed with 1 error(s): Stop hook 1 failed: flush failed"
    );
}

#[test]
fn test_simple_variants_have_no_source() {
    assert!(DiError::NotBuilt.source().is_none());
    assert!(DiError::NotFound(Key::of::<u8>()).source().is_none());
    assert!(DiError::Cycle(vec![]).source().is_none());
}

#[test]
fn test_errors_are_cloneable() {
    let err = DiError::ConstructorFailed {
        target: Key::of::<u32>(),
        source: boxed("boom"),
    };
    let copy = err.clone();
    assert_eq!(err.to_string(), copy.to_string());
}
