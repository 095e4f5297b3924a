//! Binding descriptors for introspection and diagnostics.

use crate::dependency::Dependency;
use crate::key::Key;
use crate::scope::Scope;

/// Public view of a binding's resolution state.
///
/// `Resolving` is only observable from inside a build (a constructor
/// inspecting descriptors through some side channel); descriptors taken
/// before a build show `Unresolved`, after a successful build `Resolved`,
/// and after a failed build `Failed` for the bindings that broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Registered, not yet visited by a build.
    Unresolved,
    /// On the active depth-first resolution stack.
    Resolving,
    /// Constructed and cached; injection returns the shared instance.
    Resolved,
    /// Resolution failed; the error is replayed to dependents.
    Failed,
}

/// Descriptor for one registered binding.
///
/// Useful for debugging wiring problems, validating configuration at
/// startup, or generating dependency reports.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Container, ResolutionState, Scope};
/// use std::sync::Arc;
///
/// struct Config;
/// struct Database { _config: Arc<Config> }
///
/// let container = Container::new();
/// container.bind(Config).unwrap();
/// container.provide(|config: Arc<Config>| Database { _config: config }).unwrap();
///
/// let before = container.descriptors();
/// assert_eq!(before.len(), 2);
/// assert!(before.iter().all(|d| d.state == ResolutionState::Unresolved));
///
/// container.build().unwrap();
///
/// let after = container.descriptors();
/// assert!(after.iter().all(|d| d.state == ResolutionState::Resolved));
///
/// let database = after.iter().find(|d| d.type_name().contains("Database")).unwrap();
/// assert_eq!(database.scope, Scope::Singleton);
/// assert_eq!(database.dependencies.len(), 1);
/// assert!(database.dependencies[0].is_required());
/// ```
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    /// The binding key (type with optional name).
    pub key: Key,
    /// Instance scope.
    pub scope: Scope,
    /// Resolution state at the time the descriptor was taken.
    pub state: ResolutionState,
    /// Declared dependencies; empty for value bindings.
    pub dependencies: Vec<Dependency>,
}

impl BindingDescriptor {
    /// The binding name, or `None` for the default unnamed binding.
    pub fn name(&self) -> Option<&'static str> {
        self.key.name()
    }

    /// Human-readable type name of the binding.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// True for named bindings.
    pub fn is_named(&self) -> bool {
        self.key.name().is_some()
    }
}
