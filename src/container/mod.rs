//! The container runtime: registration, build, injection, lifecycle.

mod build;

use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::cancellation::CancellationToken;
use crate::constructor::{Constructor, Injectable, TryConstructor};
use crate::dependency::{erase, unerase, DepList, Shared};
use crate::descriptors::{BindingDescriptor, ResolutionState};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifecycle::Lifecycle;
use crate::module::Module;
use crate::registry::{CtorFn, ProviderInfo, Registry, State};

use self::build::GraphResolver;

/// The dependency injection container.
///
/// A container moves through three phases. During **registration**, bindings
/// are added through the `bind*` and `provide*` families; each key may be
/// registered once, and a duplicate fails the registration call without
/// touching the existing binding. **Building** ([`build`](Container::build)
/// or [`must_build`](Container::must_build)) resolves the whole graph
/// depth-first, constructing every singleton at most once, then seals the
/// container against further registration. After a successful build the
/// **injection** family ([`inject`](Container::inject),
/// [`try_inject`](Container::try_inject),
/// [`inject_or`](Container::inject_or)) hands out the materialized shared
/// instances and is safe to call concurrently from any thread; it never
/// constructs anything new.
///
/// Containers are ordinary values; construct as many as you need (tests
/// want isolated ones). A process-wide default is available through
/// [`global()`](crate::global) for applications that prefer it.
///
/// # Examples
///
/// ```rust
/// use crucible_di::Container;
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, message: &str);
/// }
///
/// struct StdoutLogger;
/// impl Logger for StdoutLogger {
///     fn log(&self, message: &str) {
///         println!("{message}");
///     }
/// }
///
/// struct AuditService {
///     logger: Arc<dyn Logger>,
/// }
///
/// let container = Container::new();
/// container.bind_arc::<dyn Logger>(Arc::new(StdoutLogger)).unwrap();
/// container.provide(|logger: Arc<dyn Logger>| AuditService { logger }).unwrap();
/// container.build().unwrap();
///
/// let audit = container.inject::<AuditService>();
/// audit.logger.log("container wired");
///
/// // Both handles point at the same singleton.
/// let logger = container.inject::<dyn Logger>();
/// assert!(Arc::ptr_eq(&audit.logger, &logger));
/// ```
pub struct Container {
    inner: RwLock<Inner>,
    lifecycle: Lifecycle,
}

struct Inner {
    registry: Registry,
    sealed: bool,
    built: bool,
}

impl Container {
    /// Creates an empty container accepting registrations.
    pub fn new() -> Container {
        Container {
            inner: RwLock::new(Inner {
                registry: Registry::new(),
                sealed: false,
                built: false,
            }),
            lifecycle: Lifecycle::new(),
        }
    }

    fn register(&self, info: ProviderInfo) -> DiResult<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.sealed {
            return Err(DiError::Sealed);
        }
        inner.registry.insert(info)
    }

    // ----- registration: pre-built values -----

    /// Binds a pre-built instance under `T`'s unnamed key.
    ///
    /// The value is wrapped in an `Arc` and shared by every consumer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::{Container, DiError};
    ///
    /// struct Config { port: u16 }
    ///
    /// let container = Container::new();
    /// container.bind(Config { port: 8080 }).unwrap();
    ///
    /// // The same key cannot be bound twice.
    /// let err = container.bind(Config { port: 9090 }).unwrap_err();
    /// assert!(matches!(err, DiError::DuplicateBinding(_)));
    ///
    /// container.build().unwrap();
    /// assert_eq!(container.inject::<Config>().port, 8080);
    /// ```
    pub fn bind<T: Send + Sync + 'static>(&self, value: T) -> DiResult<()> {
        self.register(ProviderInfo::value(Key::of::<T>(), erase(Arc::new(value))))
    }

    /// Binds a pre-built instance under `T`'s key with a binding name.
    ///
    /// Named bindings let several instances of one type coexist.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::Container;
    ///
    /// let container = Container::new();
    /// container.bind_named("primary", 5432u16).unwrap();
    /// container.bind_named("replica", 5433u16).unwrap();
    /// container.build().unwrap();
    ///
    /// assert_eq!(*container.inject_named::<u16>("replica"), 5433);
    /// ```
    pub fn bind_named<T: Send + Sync + 'static>(
        &self,
        name: &'static str,
        value: T,
    ) -> DiResult<()> {
        self.register(ProviderInfo::value(
            Key::named::<T>(name),
            erase(Arc::new(value)),
        ))
    }

    /// Binds an already-shared instance under `T`'s unnamed key.
    ///
    /// Because `T` may be unsized, this is also the trait-object binding
    /// path: `bind_arc::<dyn Logger>(Arc::new(Console))`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::Container;
    /// use std::sync::Arc;
    ///
    /// trait Clock: Send + Sync {
    ///     fn now(&self) -> u64;
    /// }
    ///
    /// struct FixedClock;
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> u64 { 0 }
    /// }
    ///
    /// let container = Container::new();
    /// container.bind_arc::<dyn Clock>(Arc::new(FixedClock)).unwrap();
    /// container.build().unwrap();
    ///
    /// assert_eq!(container.inject::<dyn Clock>().now(), 0);
    /// ```
    pub fn bind_arc<T: ?Sized + Send + Sync + 'static>(&self, instance: Arc<T>) -> DiResult<()> {
        self.register(ProviderInfo::value(Key::of::<T>(), erase(instance)))
    }

    /// Binds an already-shared instance under `T`'s key with a binding name.
    pub fn bind_arc_named<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &'static str,
        instance: Arc<T>,
    ) -> DiResult<()> {
        self.register(ProviderInfo::value(Key::named::<T>(name), erase(instance)))
    }

    // ----- registration: constructors -----

    /// Registers a constructor under its return type's unnamed key.
    ///
    /// The constructor's parameters declare its dependencies: `Arc<T>`
    /// requires a binding for `T`, `Option<Arc<T>>` consumes one when
    /// present and resolves to `None` when absent. The constructor runs at
    /// most once, during the build.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::Container;
    /// use std::sync::Arc;
    ///
    /// struct Config { url: String }
    /// struct Metrics;
    /// struct Database { url: String, metrics: Option<Arc<Metrics>> }
    ///
    /// let container = Container::new();
    /// container.bind(Config { url: "db:5432".into() }).unwrap();
    /// container.provide(|config: Arc<Config>, metrics: Option<Arc<Metrics>>| Database {
    ///     url: config.url.clone(),
    ///     metrics,
    /// }).unwrap();
    /// container.build().unwrap();
    ///
    /// let database = container.inject::<Database>();
    /// assert_eq!(database.url, "db:5432");
    /// assert!(database.metrics.is_none()); // optional and unbound
    /// ```
    pub fn provide<A, F>(&self, ctor: F) -> DiResult<()>
    where
        F: Constructor<A>,
    {
        let key = Key::of::<F::Instance>();
        self.register(ProviderInfo::constructor(
            key,
            F::dependencies(),
            erase_value_ctor(ctor, key),
        ))
    }

    /// Registers a constructor under its return type's key with a binding
    /// name. Dependencies declared by the parameters always resolve against
    /// unnamed keys; the name applies to the binding this call produces.
    pub fn provide_named<A, F>(&self, name: &'static str, ctor: F) -> DiResult<()>
    where
        F: Constructor<A>,
    {
        let key = Key::named::<F::Instance>(name);
        self.register(ProviderInfo::constructor(
            key,
            F::dependencies(),
            erase_value_ctor(ctor, key),
        ))
    }

    /// Registers a fallible constructor under its success type's unnamed
    /// key.
    ///
    /// An `Err` from the constructor fails the binding's resolution (and
    /// transitively its dependents); the cause is preserved behind
    /// [`DiError::ConstructorFailed`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::Container;
    ///
    /// struct Config { url: String }
    ///
    /// fn load_config() -> Result<Config, std::io::Error> {
    ///     Ok(Config { url: "db:5432".into() })
    /// }
    ///
    /// let container = Container::new();
    /// container.provide_result(load_config).unwrap();
    /// container.build().unwrap();
    ///
    /// assert_eq!(container.inject::<Config>().url, "db:5432");
    /// ```
    pub fn provide_result<A, F>(&self, ctor: F) -> DiResult<()>
    where
        F: TryConstructor<A>,
    {
        let key = Key::of::<F::Instance>();
        self.register(ProviderInfo::constructor(
            key,
            F::dependencies(),
            erase_try_ctor(ctor, key),
        ))
    }

    /// Registers a constructor producing `Arc<Tr>` under `Tr`'s unnamed
    /// key.
    ///
    /// Use this when the constructor assembles a trait object: a plain
    /// [`provide`](Container::provide) would register the binding under
    /// `Arc<Tr>` itself rather than under the trait.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::Container;
    /// use std::sync::Arc;
    ///
    /// struct Config { verbose: bool }
    ///
    /// trait Logger: Send + Sync {
    ///     fn verbose(&self) -> bool;
    /// }
    ///
    /// struct StdoutLogger { verbose: bool }
    /// impl Logger for StdoutLogger {
    ///     fn verbose(&self) -> bool { self.verbose }
    /// }
    ///
    /// let container = Container::new();
    /// container.bind(Config { verbose: true }).unwrap();
    /// container.provide_trait::<dyn Logger, _, _>(|config: Arc<Config>| {
    ///     Arc::new(StdoutLogger { verbose: config.verbose }) as Arc<dyn Logger>
    /// }).unwrap();
    /// container.build().unwrap();
    ///
    /// assert!(container.inject::<dyn Logger>().verbose());
    /// ```
    pub fn provide_trait<Tr, A, F>(&self, ctor: F) -> DiResult<()>
    where
        Tr: ?Sized + Send + Sync + 'static,
        F: Constructor<A, Instance = Arc<Tr>>,
    {
        let key = Key::of::<Tr>();
        self.register(ProviderInfo::constructor(
            key,
            F::dependencies(),
            erase_arc_ctor(ctor, key),
        ))
    }

    /// Registers a constructor producing `Arc<Tr>` under `Tr`'s key with a
    /// binding name.
    pub fn provide_trait_named<Tr, A, F>(&self, name: &'static str, ctor: F) -> DiResult<()>
    where
        Tr: ?Sized + Send + Sync + 'static,
        F: Constructor<A, Instance = Arc<Tr>>,
    {
        let key = Key::named::<Tr>(name);
        self.register(ProviderInfo::constructor(
            key,
            F::dependencies(),
            erase_arc_ctor(ctor, key),
        ))
    }

    /// Registers a struct-shaped target by its [`Injectable`]
    /// implementation, under `T`'s unnamed key.
    pub fn provide_type<T: Injectable>(&self) -> DiResult<()> {
        let key = Key::of::<T>();
        let call: CtorFn = Arc::new(move |args| {
            <T::Deps as DepList>::extract(args, key)
                .map(|deps| erase(Arc::new(T::assemble(deps))))
        });
        self.register(ProviderInfo::constructor(
            key,
            <T::Deps as DepList>::dependencies(),
            call,
        ))
    }

    /// Installs a [`Module`], failing fast on the first registration error.
    pub fn install<M: Module>(&self, module: M) -> DiResult<()> {
        module.register(self)
    }

    // ----- build phase -----

    /// Eagerly resolves the whole graph and seals the container.
    ///
    /// Every registered binding is resolved depth-first in registration
    /// order; each constructor runs at most once. Failures are collected
    /// across the whole registry and returned as one
    /// [`DiError::Build`] aggregate. After any build attempt the container
    /// rejects further registration; after a *failed* build it also stays
    /// un-built, so injection fails closed until [`reset`](Container::reset).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::{Container, DiError};
    /// use std::sync::Arc;
    ///
    /// struct Database;
    /// struct Repo { _db: Arc<Database> }
    ///
    /// let container = Container::new();
    /// container.provide(|db: Arc<Database>| Repo { _db: db }).unwrap();
    ///
    /// // Database was never bound, so the build reports it.
    /// match container.build() {
    ///     Err(DiError::Build(errors)) => {
    ///         assert_eq!(errors.len(), 1);
    ///         assert!(matches!(errors[0], DiError::MissingDependency { .. }));
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn build(&self) -> DiResult<()> {
        let mut inner = self.inner.write().unwrap();
        inner.sealed = true;
        debug!(bindings = inner.registry.len(), "building container");
        let errors = GraphResolver::new(&mut inner.registry).resolve_all();
        if errors.is_empty() {
            inner.built = true;
            debug!("container built");
            Ok(())
        } else {
            warn!(failures = errors.len(), "container build failed");
            Err(DiError::Build(errors))
        }
    }

    /// Like [`build`](Container::build) but panics on failure, a bootstrap
    /// convenience for call sites where a broken graph means the process
    /// cannot run.
    pub fn must_build(&self) {
        if let Err(e) = self.build() {
            panic!("Failed to build container: {}", e);
        }
    }

    // ----- post-build injection -----

    /// Returns the materialized instance for `T`'s unnamed binding.
    ///
    /// Never constructs anything: before a successful build this fails with
    /// [`DiError::NotBuilt`], and a key that was never registered fails
    /// with [`DiError::NotFound`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::{Container, DiError};
    ///
    /// let container = Container::new();
    /// container.bind(42u32).unwrap();
    /// container.build().unwrap();
    ///
    /// assert_eq!(*container.try_inject::<u32>().unwrap(), 42);
    /// assert!(matches!(
    ///     container.try_inject::<String>(),
    ///     Err(DiError::NotFound(_))
    /// ));
    /// ```
    pub fn try_inject<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.inject_by_key(Key::of::<T>())
    }

    /// Returns the materialized instance for `T`'s binding under `name`.
    pub fn try_inject_named<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &'static str,
    ) -> DiResult<Arc<T>> {
        self.inject_by_key(Key::named::<T>(name))
    }

    /// Returns the materialized instance for `T`, panicking with a
    /// descriptive message on any failure. Intended for call sites that
    /// have already validated availability; use
    /// [`try_inject`](Container::try_inject) everywhere else.
    pub fn inject<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        match self.try_inject::<T>() {
            Ok(instance) => instance,
            Err(e) => panic!("Failed to inject {}: {:?}", std::any::type_name::<T>(), e),
        }
    }

    /// Named variant of [`inject`](Container::inject).
    pub fn inject_named<T: ?Sized + Send + Sync + 'static>(&self, name: &'static str) -> Arc<T> {
        match self.try_inject_named::<T>(name) {
            Ok(instance) => instance,
            Err(e) => panic!(
                "Failed to inject {}[{}]: {:?}",
                std::any::type_name::<T>(),
                name,
                e
            ),
        }
    }

    /// Returns the materialized instance for `T`, or the fallback on any
    /// failure. Never surfaces an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::Container;
    /// use std::sync::Arc;
    ///
    /// struct Cache { capacity: usize }
    ///
    /// let container = Container::new();
    /// container.build().unwrap();
    ///
    /// // Nothing bound; the fallback is handed back.
    /// let cache = container.inject_or(Arc::new(Cache { capacity: 0 }));
    /// assert_eq!(cache.capacity, 0);
    /// ```
    pub fn inject_or<T: ?Sized + Send + Sync + 'static>(&self, fallback: Arc<T>) -> Arc<T> {
        self.try_inject::<T>().unwrap_or(fallback)
    }

    fn inject_by_key<T: ?Sized + Send + Sync + 'static>(&self, key: Key) -> DiResult<Arc<T>> {
        let inner = self.inner.read().unwrap();
        if !inner.built {
            return Err(DiError::NotBuilt);
        }
        let info = inner.registry.get(&key).ok_or(DiError::NotFound(key))?;
        // a successful build leaves every binding materialized
        let shared = info.instance().ok_or(DiError::NotFound(key))?;
        unerase::<T>(shared).ok_or(DiError::TypeMismatch(key.display_name()))
    }

    // ----- introspection -----

    /// Whether a binding exists for `T`'s unnamed key.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.inner
            .read()
            .unwrap()
            .registry
            .contains_key(&Key::of::<T>())
    }

    /// Whether a binding exists for `T`'s key under `name`.
    pub fn contains_named<T: ?Sized + 'static>(&self, name: &'static str) -> bool {
        self.inner
            .read()
            .unwrap()
            .registry
            .contains_key(&Key::named::<T>(name))
    }

    /// Whether the container has completed a successful build.
    pub fn is_built(&self) -> bool {
        self.inner.read().unwrap().built
    }

    /// Number of registered bindings.
    pub fn binding_count(&self) -> usize {
        self.inner.read().unwrap().registry.len()
    }

    /// Descriptors for every registered binding, in registration order.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        let inner = self.inner.read().unwrap();
        inner
            .registry
            .iter_in_order()
            .map(|info| BindingDescriptor {
                key: info.key,
                scope: info.scope,
                state: public_state(&info.state),
                dependencies: info.dependencies().to_vec(),
            })
            .collect()
    }

    /// Human-readable dump of the registry and its resolution states.
    #[cfg(feature = "diagnostics")]
    pub fn dump_graph(&self) -> String {
        use crate::registry::Provider;
        use std::fmt::Write as _;

        let inner = self.inner.read().unwrap();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "container: {} binding(s), sealed={}, built={}",
            inner.registry.len(),
            inner.sealed,
            inner.built
        );
        for info in inner.registry.iter_in_order() {
            let kind = match &info.provider {
                Provider::Value(_) => "value",
                Provider::Ctor(_) => "constructor",
            };
            let _ = writeln!(
                out,
                "{} [{}, {:?}, {:?}]",
                info.key,
                kind,
                info.scope,
                public_state(&info.state)
            );
            for dep in info.dependencies() {
                let _ = writeln!(out, "  requires {}", dep);
            }
        }
        out
    }

    // ----- lifecycle -----

    /// The lifecycle hook registry for this container.
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Runs start hooks in registration order with a fresh token; the first
    /// failure aborts the remaining sequence.
    pub fn start(&self) -> DiResult<()> {
        self.start_with(&CancellationToken::new())
    }

    /// Runs start hooks with a caller-supplied token.
    pub fn start_with(&self, token: &CancellationToken) -> DiResult<()> {
        self.lifecycle.run_start(token)
    }

    /// Runs stop hooks in reverse registration order with a fresh token,
    /// collecting failures into one [`DiError::Shutdown`] aggregate.
    /// Hooks run once; a second `close` is a no-op.
    pub fn close(&self) -> DiResult<()> {
        self.close_with(&CancellationToken::new())
    }

    /// Runs stop hooks with a caller-supplied token, for cancellation or
    /// deadline control. A hook that ignores its token still runs to
    /// completion; the container never interrupts it.
    pub fn close_with(&self, token: &CancellationToken) -> DiResult<()> {
        self.lifecycle.run_stop(token)
    }

    /// Clears all bindings, cached instances, and lifecycle hooks,
    /// returning the container to its pristine state. Intended for test
    /// isolation, especially with the [`global()`](crate::global)
    /// container.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::Container;
    ///
    /// let container = Container::new();
    /// container.bind(1u8).unwrap();
    /// container.build().unwrap();
    ///
    /// container.reset();
    /// assert!(!container.contains::<u8>());
    /// assert!(!container.is_built());
    ///
    /// // Registration is open again.
    /// container.bind(2u8).unwrap();
    /// container.build().unwrap();
    /// assert_eq!(*container.inject::<u8>(), 2);
    /// ```
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.registry.clear();
        inner.sealed = false;
        inner.built = false;
        self.lifecycle.clear();
        debug!("container reset");
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap();
        f.debug_struct("Container")
            .field("bindings", &inner.registry.len())
            .field("sealed", &inner.sealed)
            .field("built", &inner.built)
            .finish()
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        let pending = self.lifecycle.pending_stop_hooks();
        if pending > 0 {
            warn!(
                pending,
                "container dropped with stop hooks that never ran; call close() before drop"
            );
        }
    }
}

fn public_state(state: &State) -> ResolutionState {
    match state {
        State::Unresolved => ResolutionState::Unresolved,
        State::Resolving => ResolutionState::Resolving,
        State::Resolved => ResolutionState::Resolved,
        State::Failed(_) => ResolutionState::Failed,
    }
}

fn erase_value_ctor<A, F>(ctor: F, key: Key) -> CtorFn
where
    F: Constructor<A>,
{
    Arc::new(move |args| {
        ctor.invoke(args, key)
            .map(|instance| erase(Arc::new(instance)))
    })
}

fn erase_try_ctor<A, F>(ctor: F, key: Key) -> CtorFn
where
    F: TryConstructor<A>,
{
    Arc::new(move |args| {
        ctor.try_invoke(args, key)
            .map(|instance| erase(Arc::new(instance)))
    })
}

fn erase_arc_ctor<Tr, A, F>(ctor: F, key: Key) -> CtorFn
where
    Tr: ?Sized + Send + Sync + 'static,
    F: Constructor<A, Instance = Arc<Tr>>,
{
    Arc::new(move |args| ctor.invoke(args, key).map(erase))
}
