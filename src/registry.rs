//! Binding records and the keyed registry.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::dependency::{Dependency, Resolved, Shared};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::scope::Scope;

/// Erased constructor call stored per binding.
pub(crate) type CtorFn = Arc<dyn Fn(Vec<Resolved>) -> DiResult<Shared> + Send + Sync>;

/// Constructor descriptor: declared dependencies plus the erased call.
#[derive(Clone)]
pub(crate) struct CtorSpec {
    pub(crate) deps: Vec<Dependency>,
    pub(crate) call: CtorFn,
}

/// Provider payload backing a binding.
#[derive(Clone)]
pub(crate) enum Provider {
    /// Pre-built instance supplied at registration.
    Value(Shared),
    /// Constructor invoked during the build phase.
    Ctor(CtorSpec),
}

/// Resolution state of a binding.
///
/// `Resolving` marks membership on the active depth-first stack and drives
/// cycle detection. `Failed` caches the first error so dependents and
/// repeated builds replay it instead of re-running the constructor.
#[derive(Debug, Clone)]
pub(crate) enum State {
    Unresolved,
    Resolving,
    Resolved,
    Failed(DiError),
}

/// Everything the container records about one binding.
///
/// The `cell` is the construct-once slot: it is populated exactly once per
/// binding and every consumer clones the same `Shared` out of it, which is
/// what makes the singleton identity guarantee hold.
pub(crate) struct ProviderInfo {
    pub(crate) key: Key,
    pub(crate) scope: Scope,
    pub(crate) provider: Provider,
    pub(crate) cell: OnceCell<Shared>,
    pub(crate) state: State,
}

impl ProviderInfo {
    pub(crate) fn value(key: Key, instance: Shared) -> ProviderInfo {
        ProviderInfo {
            key,
            scope: Scope::Singleton,
            provider: Provider::Value(instance),
            cell: OnceCell::new(),
            state: State::Unresolved,
        }
    }

    pub(crate) fn constructor(key: Key, deps: Vec<Dependency>, call: CtorFn) -> ProviderInfo {
        ProviderInfo {
            key,
            scope: Scope::Singleton,
            provider: Provider::Ctor(CtorSpec { deps, call }),
            cell: OnceCell::new(),
            state: State::Unresolved,
        }
    }

    /// Declared dependencies; empty for value bindings.
    pub(crate) fn dependencies(&self) -> &[Dependency] {
        match &self.provider {
            Provider::Value(_) => &[],
            Provider::Ctor(spec) => &spec.deps,
        }
    }

    /// The materialized instance, if this binding has resolved.
    pub(crate) fn instance(&self) -> Option<&Shared> {
        self.cell.get()
    }
}

/// Keyed binding storage with registration order preserved.
///
/// At most one record exists per key: inserting a duplicate fails and leaves
/// the existing registration untouched. Order is kept for deterministic
/// eager builds and diagnostics.
pub(crate) struct Registry {
    entries: HashMap<Key, ProviderInfo>,
    order: Vec<Key>,
}

impl Registry {
    pub(crate) fn new() -> Registry {
        Registry {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, info: ProviderInfo) -> DiResult<()> {
        if self.entries.contains_key(&info.key) {
            return Err(DiError::DuplicateBinding(info.key));
        }
        let kind = match &info.provider {
            Provider::Value(_) => "value",
            Provider::Ctor(_) => "constructor",
        };
        debug!(binding = %info.key, kind, "registered binding");
        self.order.push(info.key);
        self.entries.insert(info.key, info);
        Ok(())
    }

    pub(crate) fn get(&self, key: &Key) -> Option<&ProviderInfo> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &Key) -> Option<&mut ProviderInfo> {
        self.entries.get_mut(key)
    }

    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in registration order.
    pub(crate) fn keys_in_order(&self) -> Vec<Key> {
        self.order.clone()
    }

    /// Records in registration order.
    pub(crate) fn iter_in_order(&self) -> impl Iterator<Item = &ProviderInfo> {
        self.order.iter().filter_map(|key| self.entries.get(key))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
