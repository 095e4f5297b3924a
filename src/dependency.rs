//! Dependency metadata and the resolution boundary.
//!
//! Everything the resolver knows about a constructor comes through this
//! module. Constructor parameters declare their own dependencies by shape:
//! `Arc<T>` is a required dependency on `T`, `Option<Arc<T>>` an optional
//! one. The [`Dep`] trait turns those shapes into [`Dependency`] descriptors
//! before the build and extracts concrete values from [`Resolved`] slots
//! during it, so the rest of the container operates on uniform descriptors
//! rather than inspecting types ad hoc.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Type-erased shared instance.
///
/// The payload inside the `dyn Any` is always the sized `Arc<T>` for the
/// bound `T: ?Sized`, which is what lets one storage form serve concrete
/// types and trait objects alike.
pub type Shared = Arc<dyn Any + Send + Sync>;

/// Wraps a shared instance in the erased storage form.
pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) -> Shared {
    Arc::new(instance)
}

/// Recovers the typed handle from the erased storage form.
pub(crate) fn unerase<T: ?Sized + Send + Sync + 'static>(shared: &Shared) -> Option<Arc<T>> {
    shared.downcast_ref::<Arc<T>>().cloned()
}

/// Descriptor for one declared dependency of a constructor.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Dep, Key};
/// use std::sync::Arc;
///
/// struct Database;
///
/// let required = <Arc<Database>>::dependency();
/// assert!(required.is_required());
/// assert_eq!(required.key(), Key::of::<Database>());
///
/// let optional = <Option<Arc<Database>>>::dependency();
/// assert!(!optional.is_required());
/// assert_eq!(optional.key(), required.key());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    key: Key,
    required: bool,
}

impl Dependency {
    /// Descriptor for a dependency that must resolve or the build fails.
    pub fn required(key: Key) -> Dependency {
        Dependency {
            key,
            required: true,
        }
    }

    /// Descriptor for a dependency that degrades to absent when unbound.
    pub fn optional(key: Key) -> Dependency {
        Dependency {
            key,
            required: false,
        }
    }

    /// The binding key this dependency resolves against.
    pub fn key(&self) -> Key {
        self.key
    }

    /// Whether absence of the binding is a build failure.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{} (optional)", self.key)
        }
    }
}

/// Outcome of resolving one dependency slot.
///
/// The required/optional distinction lives here as an explicit sum rather
/// than a nullable handle: a missing optional binding resolves to `Absent`
/// and that is success, never an error. `Present` carries the erased shared
/// instance for the slot.
#[derive(Clone)]
pub enum Resolved {
    /// The binding resolved; the slot holds its shared instance.
    Present(Shared),
    /// No binding exists for an optional dependency.
    Absent,
}

impl Resolved {
    /// Wraps a typed instance into a present slot using the container's
    /// storage convention. Mostly useful for driving [`Constructor::invoke`]
    /// directly in tests.
    ///
    /// [`Constructor::invoke`]: crate::Constructor::invoke
    pub fn present<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) -> Resolved {
        Resolved::Present(erase(instance))
    }

    /// True for `Present` slots.
    pub fn is_present(&self) -> bool {
        matches!(self, Resolved::Present(_))
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Present(_) => f.write_str("Present(..)"),
            Resolved::Absent => f.write_str("Absent"),
        }
    }
}

/// A constructor parameter shape the container knows how to fill.
///
/// Implemented for `Arc<T>` (required dependency on `T`) and
/// `Option<Arc<T>>` (optional dependency on `T`), with `T: ?Sized` so trait
/// objects work: `Arc<dyn Logger>` declares a required dependency on the
/// `dyn Logger` binding.
pub trait Dep: Sized {
    /// The descriptor the resolver enumerates before construction.
    fn dependency() -> Dependency;

    /// Converts the resolved slot for this parameter into its value.
    ///
    /// `target` and `index` identify the constructor and parameter position
    /// for error reporting.
    fn extract(slot: Resolved, target: Key, index: usize) -> DiResult<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Dep for Arc<T> {
    fn dependency() -> Dependency {
        Dependency::required(Key::of::<T>())
    }

    fn extract(slot: Resolved, target: Key, index: usize) -> DiResult<Self> {
        let mismatch = || DiError::InvalidArgument {
            target,
            index,
            expected: std::any::type_name::<T>(),
        };
        match slot {
            Resolved::Present(shared) => unerase::<T>(&shared).ok_or_else(mismatch),
            Resolved::Absent => Err(mismatch()),
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> Dep for Option<Arc<T>> {
    fn dependency() -> Dependency {
        Dependency::optional(Key::of::<T>())
    }

    fn extract(slot: Resolved, target: Key, index: usize) -> DiResult<Self> {
        match slot {
            Resolved::Present(shared) => {
                unerase::<T>(&shared)
                    .map(Some)
                    .ok_or(DiError::InvalidArgument {
                        target,
                        index,
                        expected: std::any::type_name::<T>(),
                    })
            }
            Resolved::Absent => Ok(None),
        }
    }
}

/// An ordered parameter list, implemented for tuples of [`Dep`] up to arity 8.
///
/// `extract` validates the argument count against the declared arity before
/// touching any slot; a mismatch reports the expected and actual counts, a
/// per-slot failure reports the parameter index.
pub trait DepList: Sized {
    /// Declared dependencies in parameter order.
    fn dependencies() -> Vec<Dependency>;

    /// Validates and converts the resolved slots into the parameter tuple.
    fn extract(args: Vec<Resolved>, target: Key) -> DiResult<Self>;
}

macro_rules! impl_dep_list {
    ($len:tt $(, ($D:ident, $idx:tt))*) => {
        impl<$($D: Dep),*> DepList for ($($D,)*) {
            fn dependencies() -> Vec<Dependency> {
                vec![$(<$D as Dep>::dependency()),*]
            }

            #[allow(non_snake_case)]
            fn extract(args: Vec<Resolved>, target: Key) -> DiResult<Self> {
                let actual = args.len();
                let [$($D),*]: [Resolved; $len] = match args.try_into() {
                    Ok(slots) => slots,
                    Err(_) => {
                        return Err(DiError::ArgumentCount {
                            target,
                            expected: $len,
                            actual,
                        });
                    }
                };
                Ok(($(<$D as Dep>::extract($D, target, $idx)?,)*))
            }
        }
    };
}

impl_dep_list!(0);
impl_dep_list!(1, (D0, 0));
impl_dep_list!(2, (D0, 0), (D1, 1));
impl_dep_list!(3, (D0, 0), (D1, 1), (D2, 2));
impl_dep_list!(4, (D0, 0), (D1, 1), (D2, 2), (D3, 3));
impl_dep_list!(5, (D0, 0), (D1, 1), (D2, 2), (D3, 3), (D4, 4));
impl_dep_list!(6, (D0, 0), (D1, 1), (D2, 2), (D3, 3), (D4, 4), (D5, 5));
impl_dep_list!(7, (D0, 0), (D1, 1), (D2, 2), (D3, 3), (D4, 4), (D5, 5), (D6, 6));
impl_dep_list!(8, (D0, 0), (D1, 1), (D2, 2), (D3, 3), (D4, 4), (D5, 5), (D6, 6), (D7, 7));
