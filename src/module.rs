//! Grouped registration through installable modules.
//!
//! A module bundles related bindings (and lifecycle hooks) so applications
//! can compose their wiring from reusable parts instead of one flat
//! registration block.

use crate::container::Container;
use crate::error::DiResult;

/// A reusable group of registrations installed as a unit.
///
/// Installation fails fast: the first registration error stops the install
/// and is returned to the caller. Registrations made before the failure stay
/// in place; later ones never run.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Container, DiResult, Module};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Database { url: String }
///
/// struct StorageModule;
///
/// impl Module for StorageModule {
///     fn register(self, container: &Container) -> DiResult<()> {
///         container.bind(Config { url: "db:5432".into() })?;
///         container.provide(|config: Arc<Config>| Database { url: config.url.clone() })?;
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// container.install(StorageModule).unwrap();
/// container.build().unwrap();
/// assert_eq!(container.inject::<Database>().url, "db:5432");
/// ```
pub trait Module {
    /// Registers this module's bindings and hooks against the container.
    fn register(self, container: &Container) -> DiResult<()>;
}
