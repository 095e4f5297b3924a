//! Constructor traits backing `provide` registrations.
//!
//! A constructor is any function or closure whose parameters all implement
//! [`Dep`]; the parameter shapes *are* the declared dependencies, so no
//! separate wiring declaration exists. [`Constructor`] covers plain returns,
//! [`TryConstructor`] covers `Result` returns whose `Err` becomes a
//! resolution failure. Both are implemented for arities 0 through 8.

use std::sync::Arc;

use crate::dependency::{Dep, DepList, Dependency, Resolved};
use crate::error::{BoxError, DiError, DiResult};
use crate::key::Key;

/// A dependency-declaring function that produces an instance.
///
/// Implemented for `Fn(D0, .., Dn) -> T` where every parameter implements
/// [`Dep`]. The binding registered through
/// [`Container::provide`](crate::Container::provide) takes `T`'s key;
/// [`Container::provide_trait`](crate::Container::provide_trait) accepts
/// constructors with `Instance = Arc<Tr>` and keys them under `Tr` instead.
///
/// # Examples
///
/// Invoking directly, the way the resolver does during a build:
///
/// ```rust
/// use crucible_di::{Constructor, Key, Resolved};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Database { url: String }
///
/// let ctor = |config: Arc<Config>| Database { url: config.url.clone() };
///
/// let args = vec![Resolved::present(Arc::new(Config { url: "db:5432".into() }))];
/// let database = ctor.invoke(args, Key::of::<Database>()).unwrap();
/// assert_eq!(database.url, "db:5432");
/// ```
pub trait Constructor<Args>: Send + Sync + 'static {
    /// The constructed type.
    type Instance: Send + Sync + 'static;

    /// Declared dependencies, in parameter order.
    fn dependencies() -> Vec<Dependency>;

    /// Validates the argument list and calls the underlying function.
    ///
    /// Fails with an argument-count or per-index argument error before the
    /// function runs; never panics on malformed input.
    fn invoke(&self, args: Vec<Resolved>, target: Key) -> DiResult<Self::Instance>;
}

/// A dependency-declaring function that may fail to produce an instance.
///
/// Implemented for `Fn(D0, .., Dn) -> Result<T, E>` with `E` convertible to
/// a boxed error. An `Err` return surfaces as
/// [`DiError::ConstructorFailed`] wrapping the cause, which propagates as a
/// resolution failure to every dependent of the binding.
pub trait TryConstructor<Args>: Send + Sync + 'static {
    /// The constructed type on success.
    type Instance: Send + Sync + 'static;

    /// Declared dependencies, in parameter order.
    fn dependencies() -> Vec<Dependency>;

    /// Validates the argument list, calls the function, and wraps its error.
    fn try_invoke(&self, args: Vec<Resolved>, target: Key) -> DiResult<Self::Instance>;
}

macro_rules! impl_constructors {
    ($($D:ident),*) => {
        impl<F, T, $($D),*> Constructor<($($D,)*)> for F
        where
            F: Fn($($D),*) -> T + Send + Sync + 'static,
            T: Send + Sync + 'static,
            $($D: Dep,)*
        {
            type Instance = T;

            fn dependencies() -> Vec<Dependency> {
                <($($D,)*) as DepList>::dependencies()
            }

            #[allow(non_snake_case)]
            fn invoke(&self, args: Vec<Resolved>, target: Key) -> DiResult<T> {
                let ($($D,)*) = <($($D,)*) as DepList>::extract(args, target)?;
                Ok((self)($($D),*))
            }
        }

        impl<F, T, E, $($D),*> TryConstructor<($($D,)*)> for F
        where
            F: Fn($($D),*) -> Result<T, E> + Send + Sync + 'static,
            T: Send + Sync + 'static,
            E: Into<BoxError>,
            $($D: Dep,)*
        {
            type Instance = T;

            fn dependencies() -> Vec<Dependency> {
                <($($D,)*) as DepList>::dependencies()
            }

            #[allow(non_snake_case)]
            fn try_invoke(&self, args: Vec<Resolved>, target: Key) -> DiResult<T> {
                let ($($D,)*) = <($($D,)*) as DepList>::extract(args, target)?;
                (self)($($D),*).map_err(|e| DiError::ConstructorFailed {
                    target,
                    source: Arc::from(e.into()),
                })
            }
        }
    };
}

impl_constructors!();
impl_constructors!(D0);
impl_constructors!(D0, D1);
impl_constructors!(D0, D1, D2);
impl_constructors!(D0, D1, D2, D3);
impl_constructors!(D0, D1, D2, D3, D4);
impl_constructors!(D0, D1, D2, D3, D4, D5);
impl_constructors!(D0, D1, D2, D3, D4, D5, D6);
impl_constructors!(D0, D1, D2, D3, D4, D5, D6, D7);

/// A struct-shaped target that declares its dependencies as a tuple.
///
/// The field-annotation style of dependency declaration, rendered with a
/// types-as-tags tuple: `Deps` lists the parameter shapes (`Arc<T>`
/// required, `Option<Arc<T>>` optional) and `assemble` builds the value
/// from them. Registered through
/// [`Container::provide_type`](crate::Container::provide_type).
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Container, Injectable};
/// use std::sync::Arc;
///
/// struct Logger;
/// struct Audit;
///
/// struct UserService {
///     logger: Arc<Logger>,
///     audit: Option<Arc<Audit>>,
/// }
///
/// impl Injectable for UserService {
///     type Deps = (Arc<Logger>, Option<Arc<Audit>>);
///
///     fn assemble((logger, audit): Self::Deps) -> Self {
///         UserService { logger, audit }
///     }
/// }
///
/// let container = Container::new();
/// container.bind(Logger).unwrap();
/// container.provide_type::<UserService>().unwrap();
/// container.build().unwrap();
///
/// let service = container.inject::<UserService>();
/// assert!(service.audit.is_none());
/// assert!(Arc::ptr_eq(&service.logger, &container.inject::<Logger>()));
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Parameter tuple declaring the dependencies in order.
    type Deps: DepList;

    /// Builds the value from its resolved dependencies.
    fn assemble(deps: Self::Deps) -> Self;
}
