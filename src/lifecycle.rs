//! Ordered startup and shutdown hooks.
//!
//! Hooks are appended during the registration phase and executed once: start
//! hooks in registration order (fail-fast), stop hooks in reverse
//! registration order with every failure collected so teardown always runs
//! to the end. The reverse order is the point: whatever started last is
//! torn down first.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::cancellation::CancellationToken;
use crate::error::{BoxError, DiError, DiResult};

type Hook = Box<dyn FnOnce(&CancellationToken) -> Result<(), BoxError> + Send>;

/// Ordered start/stop hook registry owned by a container.
///
/// Obtained through [`Container::lifecycle`](crate::Container::lifecycle);
/// execution happens through the container's
/// [`start`](crate::Container::start) and [`close`](crate::Container::close)
/// entry points.
///
/// # Examples
///
/// ```rust
/// use crucible_di::Container;
/// use std::sync::{Arc, Mutex};
///
/// let order = Arc::new(Mutex::new(Vec::new()));
/// let container = Container::new();
///
/// for id in ["pool", "server"] {
///     let order = Arc::clone(&order);
///     container.lifecycle().on_stop(move |_| {
///         order.lock().unwrap().push(id);
///         Ok(())
///     });
/// }
///
/// container.close().unwrap();
/// assert_eq!(*order.lock().unwrap(), vec!["server", "pool"]);
/// ```
pub struct Lifecycle {
    inner: Mutex<Hooks>,
}

#[derive(Default)]
struct Hooks {
    on_start: Vec<Hook>,
    on_stop: Vec<Hook>,
}

impl Lifecycle {
    pub(crate) fn new() -> Lifecycle {
        Lifecycle {
            inner: Mutex::new(Hooks::default()),
        }
    }

    /// Registers a hook to run during startup.
    ///
    /// Start hooks execute in registration order; the first failure aborts
    /// the remaining sequence.
    pub fn on_start<F>(&self, hook: F)
    where
        F: FnOnce(&CancellationToken) -> Result<(), BoxError> + Send + 'static,
    {
        self.inner.lock().unwrap().on_start.push(Box::new(hook));
    }

    /// Registers a hook to run during shutdown.
    ///
    /// Stop hooks execute in reverse registration order; failures are
    /// collected and the sequence always runs to completion.
    pub fn on_stop<F>(&self, hook: F)
    where
        F: FnOnce(&CancellationToken) -> Result<(), BoxError> + Send + 'static,
    {
        self.inner.lock().unwrap().on_stop.push(Box::new(hook));
    }

    /// Number of registered start hooks that have not run yet.
    pub fn pending_start_hooks(&self) -> usize {
        self.inner.lock().unwrap().on_start.len()
    }

    /// Number of registered stop hooks that have not run yet.
    pub fn pending_stop_hooks(&self) -> usize {
        self.inner.lock().unwrap().on_stop.len()
    }

    pub(crate) fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.on_start.clear();
        inner.on_stop.clear();
    }

    /// Drains and runs start hooks in registration order, aborting at the
    /// first failure. Hooks that did not get to run are dropped.
    pub(crate) fn run_start(&self, token: &CancellationToken) -> DiResult<()> {
        let hooks = std::mem::take(&mut self.inner.lock().unwrap().on_start);
        debug!(count = hooks.len(), "running start hooks");
        for (index, hook) in hooks.into_iter().enumerate() {
            hook(token).map_err(|e| DiError::StartHook {
                index,
                source: Arc::from(e),
            })?;
        }
        Ok(())
    }

    /// Drains and runs stop hooks in reverse registration order, collecting
    /// every failure into one aggregate.
    pub(crate) fn run_stop(&self, token: &CancellationToken) -> DiResult<()> {
        let mut hooks = std::mem::take(&mut self.inner.lock().unwrap().on_stop);
        debug!(count = hooks.len(), "running stop hooks");
        let mut errors = Vec::new();
        while let Some(hook) = hooks.pop() {
            let index = hooks.len();
            if let Err(e) = hook(token) {
                errors.push(DiError::StopHook {
                    index,
                    source: Arc::from(e),
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DiError::Shutdown(errors))
        }
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("Lifecycle")
            .field("pending_start_hooks", &inner.on_start.len())
            .field("pending_stop_hooks", &inner.on_stop.len())
            .finish()
    }
}
