//! Error types for the dependency injection container.

use std::fmt;
use std::sync::Arc;

use crate::key::Key;

/// Boxed error type accepted from fallible constructors and lifecycle hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Dependency injection errors
///
/// Represents the error conditions that can occur during binding
/// registration, graph building, post-build injection, or lifecycle
/// execution. Wrapped causes (a constructor or hook returning its own error)
/// are reachable through [`std::error::Error::source`].
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Container, DiError};
///
/// // Injecting a type that was never registered
/// let container = Container::new();
/// container.build().unwrap();
/// match container.try_inject::<String>() {
///     Err(DiError::NotFound(key)) => {
///         assert!(key.display_name().contains("String"));
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use crucible_di::{DiError, Key};
///
/// let cycle = DiError::Cycle(vec![Key::of::<u8>(), Key::of::<u16>(), Key::of::<u8>()]);
/// assert_eq!(cycle.to_string(), "Circular dependency: u8 -> u16 -> u8");
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Same (type, name) key registered twice; the first registration stays intact
    DuplicateBinding(Key),
    /// Binding was never registered
    NotFound(Key),
    /// Stored instance could not be downcast to the requested type
    TypeMismatch(&'static str),
    /// Injection attempted before a successful build
    NotBuilt,
    /// Registration attempted after build; reset() reopens the container
    Sealed,
    /// A required dependency has no matching binding
    MissingDependency {
        /// The binding whose constructor declared the dependency
        consumer: Key,
        /// The missing binding key
        dependency: Key,
    },
    /// Circular dependency detected (includes the named cycle path)
    Cycle(Vec<Key>),
    /// Constructor invoked with the wrong number of arguments
    ArgumentCount {
        /// The binding being constructed
        target: Key,
        /// Declared parameter count
        expected: usize,
        /// Arguments actually supplied
        actual: usize,
    },
    /// An argument did not match the declared parameter shape
    InvalidArgument {
        /// The binding being constructed
        target: Key,
        /// Zero-based parameter index
        index: usize,
        /// Declared parameter type name
        expected: &'static str,
    },
    /// The constructor itself returned an error
    ConstructorFailed {
        /// The binding being constructed
        target: Key,
        /// The constructor's own error
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// Aggregate of build-phase failures, in registration order
    Build(Vec<DiError>),
    /// A start hook failed; startup aborted at this hook
    StartHook {
        /// Registration position of the failing hook
        index: usize,
        /// The hook's own error
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// A stop hook failed; shutdown continued through remaining hooks
    StopHook {
        /// Registration position of the failing hook
        index: usize,
        /// The hook's own error
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// Aggregate of stop-hook failures collected during shutdown
    Shutdown(Vec<DiError>),
}

fn join_keys(path: &[Key]) -> String {
    path.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn join_errors(errors: &[DiError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::DuplicateBinding(key) => write!(f, "Duplicate binding: {}", key),
            DiError::NotFound(key) => write!(f, "Binding not found: {}", key),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::NotBuilt => write!(f, "Container has not been built"),
            DiError::Sealed => write!(f, "Container already built; registration is closed"),
            DiError::MissingDependency {
                consumer,
                dependency,
            } => write!(
                f,
                "Unresolved dependency: {} requires {}",
                consumer, dependency
            ),
            DiError::Cycle(path) => {
                write!(f, "Circular dependency: {}", join_keys(path))
            }
            DiError::ArgumentCount {
                target,
                expected,
                actual,
            } => write!(
                f,
                "Invocation of {} failed: expected {} arguments, got {}",
                target, expected, actual
            ),
            DiError::InvalidArgument {
                target,
                index,
                expected,
            } => write!(
                f,
                "Invocation of {} failed: argument {} is not {}",
                target, index, expected
            ),
            DiError::ConstructorFailed { target, source } => {
                write!(f, "Constructor for {} failed: {}", target, source)
            }
            DiError::Build(errors) => write!(
                f,
                "Container build failed with {} error(s): {}",
                errors.len(),
                join_errors(errors)
            ),
            DiError::StartHook { index, source } => {
                write!(f, "Start hook {} failed: {}", index, source)
            }
            DiError::StopHook { index, source } => {
                write!(f, "Stop hook {} failed: {}", index, source)
            }
            DiError::Shutdown(errors) => write!(
                f,
                "Shutdown completed with {} error(s): {}",
                errors.len(),
                join_errors(errors)
            ),
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::ConstructorFailed { source, .. }
            | DiError::StartHook { source, .. }
            | DiError::StopHook { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout crucible-di.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Container, DiResult};
/// use std::sync::Arc;
///
/// fn wire(container: &Container) -> DiResult<Arc<u32>> {
///     container.bind(42u32)?;
///     container.build()?;
///     container.try_inject::<u32>()
/// }
///
/// let container = Container::new();
/// assert_eq!(*wire(&container).unwrap(), 42);
/// ```
pub type DiResult<T> = Result<T, DiError>;
