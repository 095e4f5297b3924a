//! Binding scope for registered providers.

/// Scope of a binding's instance.
///
/// Currently every binding is a singleton: the container constructs at most
/// one instance per binding key and every consumer shares it (identity, not a
/// copy). The enum is non-exhaustive so shorter-lived scopes can be added
/// without breaking callers that match on it.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Container, Scope};
///
/// let container = Container::new();
/// container.bind(8080u16).unwrap();
/// container.build().unwrap();
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors[0].scope, Scope::Singleton);
/// assert!(descriptors[0].scope.is_singleton());
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One instance per binding, constructed at most once and shared by all
    /// consumers for the container's lifetime.
    Singleton,
}

impl Scope {
    /// Returns true for singleton bindings.
    pub fn is_singleton(&self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Singleton
    }
}
