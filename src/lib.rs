//! # crucible-di
//!
//! Thread-safe dependency injection for Rust with declared dependencies,
//! eager graph builds, and ordered lifecycle hooks.
//!
//! ## Features
//!
//! - **Declared dependencies**: constructors state their inputs as `Arc<T>`
//!   (required) or `Option<Arc<T>>` (optional) parameters
//! - **Eager builds**: [`Container::build`] resolves the whole graph up
//!   front, so wiring mistakes surface at startup instead of first use
//! - **Singleton identity**: every constructor runs at most once and all
//!   consumers share the same `Arc`
//! - **Circular dependency detection**: cycles are reported with the full
//!   key path instead of overflowing the stack
//! - **Named bindings**: several instances of one type can coexist under
//!   distinct binding names
//! - **Lifecycle hooks**: start hooks run in registration order, stop hooks
//!   in reverse, with cancellation tokens threaded through
//!
//! ## Quick Start
//!
//! ```rust
//! use crucible_di::Container;
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct StdoutLogger;
//! impl Logger for StdoutLogger {
//!     fn log(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! struct Cache;
//!
//! struct UserService {
//!     logger: Arc<dyn Logger>,
//!     cache: Option<Arc<Cache>>,
//! }
//!
//! // Register bindings.
//! let container = Container::new();
//! container.bind_arc::<dyn Logger>(Arc::new(StdoutLogger)).unwrap();
//! container.provide(|logger: Arc<dyn Logger>, cache: Option<Arc<Cache>>| {
//!     UserService { logger, cache }
//! }).unwrap();
//!
//! // Build the whole graph, then inject anywhere.
//! container.build().unwrap();
//! let users = container.inject::<UserService>();
//! users.logger.log("ready");
//! assert!(users.cache.is_none()); // optional and nothing bound
//! ```
//!
//! ## Build model
//!
//! A container is **open** for registration until the first
//! [`build`](Container::build) call, which resolves every binding
//! depth-first in registration order and then seals the container. Build
//! failures are aggregated across the whole registry, so a single pass
//! reports every wiring mistake; a failed build also leaves the
//! container un-built, so injection keeps failing until
//! [`reset`](Container::reset). Injection after a successful build is a
//! read-only lookup and safe from any number of threads.
//!
//! ## Lifecycle
//!
//! ```rust
//! use crucible_di::Container;
//!
//! let container = Container::new();
//! container.lifecycle().on_start(|_token| {
//!     // bind listeners, spawn workers
//!     Ok(())
//! });
//! container.lifecycle().on_stop(|_token| {
//!     // drain in-flight work, flush buffers
//!     Ok(())
//! });
//!
//! container.build().unwrap();
//! container.start().unwrap();
//! // ... serve ...
//! container.close().unwrap();
//! ```
//!
//! ## Global container
//!
//! Applications with a single composition root can use the process-wide
//! [`global()`] container instead of threading a handle everywhere.
//! Libraries should keep accepting `&Container`.

// Module declarations
pub mod cancellation;
pub mod constructor;
pub mod container;
pub mod dependency;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifecycle;
pub mod module;
pub mod scope;

// Internal modules
mod global;
mod registry;

// Re-export core types
pub use cancellation::{CancellationError, CancellationToken};
pub use constructor::{Constructor, Injectable, TryConstructor};
pub use container::Container;
pub use dependency::{Dep, DepList, Dependency, Resolved, Shared};
pub use descriptors::{BindingDescriptor, ResolutionState};
pub use error::{BoxError, DiError, DiResult};
pub use global::global;
pub use key::Key;
pub use lifecycle::Lifecycle;
pub use module::Module;
pub use scope::Scope;
