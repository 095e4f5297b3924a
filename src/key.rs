//! Binding key types for the dependency injection container.

use std::any::TypeId;
use std::fmt;

/// Key identifying a binding in the container.
///
/// A binding key is the pair of a bound type and an optional name. Unnamed
/// keys are the default; named keys let multiple bindings of the same type
/// coexist (for example two `u32` ports registered under different names).
/// Because instances are always stored behind `Arc<T>`, the same key form
/// works for concrete types and trait objects alike: `Key::of::<Database>()`
/// and `Key::of::<dyn Logger>()` are both ordinary keys.
///
/// Equality, ordering, and hashing consider only the `TypeId` and the name;
/// the type name string is carried for diagnostics and error messages.
///
/// # Examples
///
/// ```rust
/// use crucible_di::Key;
///
/// let unnamed = Key::of::<u32>();
/// assert_eq!(unnamed.display_name(), "u32");
/// assert_eq!(unnamed.name(), None);
///
/// let named = Key::named::<u32>("config_port");
/// assert_eq!(named.name(), Some("config_port"));
/// assert_ne!(unnamed, named);
/// assert_eq!(named.to_string(), "u32[config_port]");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    type_name: &'static str,
    name: Option<&'static str>,
}

impl Key {
    /// Creates the unnamed key for `T`.
    ///
    /// `T` may be unsized, so trait-object keys are written
    /// `Key::of::<dyn Logger>()`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Key {
        Key {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            name: None,
        }
    }

    /// Creates the key for `T` under a binding name.
    #[inline(always)]
    pub fn named<T: ?Sized + 'static>(name: &'static str) -> Key {
        Key {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            name: Some(name),
        }
    }

    /// The `TypeId` of the bound type.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name for debugging and error messages.
    ///
    /// This is the `std::any::type_name` result captured at key creation.
    pub fn display_name(&self) -> &'static str {
        self.type_name
    }

    /// The binding name, or `None` for the default unnamed binding.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{}[{}]", self.type_name, name),
            None => f.write_str(self.type_name),
        }
    }
}

// Equality on the hot path is TypeId-first; the display string never
// participates.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Key {}

// Ordering for deterministic diagnostics output.
impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
    }
}
