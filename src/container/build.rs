//! Depth-first graph resolution for the build phase.
//!
//! Runs entirely under the container's write lock: one resolver walks the
//! registry, flipping binding states and populating instance cells. Keys on
//! the active stack are in the `Resolving` state; reaching one again closes
//! a dependency cycle and the stack slice from its first occurrence is the
//! reported path.

use std::collections::HashSet;

use tracing::trace;

use crate::dependency::{Resolved, Shared};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registry::{CtorSpec, Provider, Registry, State};

pub(crate) struct GraphResolver<'a> {
    registry: &'a mut Registry,
    stack: Vec<Key>,
}

impl<'a> GraphResolver<'a> {
    pub(crate) fn new(registry: &'a mut Registry) -> GraphResolver<'a> {
        GraphResolver {
            registry,
            stack: Vec::new(),
        }
    }

    /// Resolves every registration eagerly, in registration order.
    ///
    /// Collects one error per failing top-level binding. A dependency
    /// failure surfaces once through the first dependent that hits it and
    /// again for the failing binding itself when the walk reaches it, so
    /// identical messages are deduplicated.
    pub(crate) fn resolve_all(&mut self) -> Vec<DiError> {
        let mut errors = Vec::new();
        let mut reported = HashSet::new();
        for key in self.registry.keys_in_order() {
            if let Err(e) = self.resolve(key) {
                if reported.insert(e.to_string()) {
                    errors.push(e);
                }
            }
        }
        errors
    }

    /// Resolves one binding depth-first.
    pub(crate) fn resolve(&mut self, key: Key) -> DiResult<Shared> {
        let provider = {
            let info = match self.registry.get_mut(&key) {
                Some(info) => info,
                None => return Err(DiError::NotFound(key)),
            };
            match info.state.clone() {
                State::Resolved => {
                    // cell and state are updated together; a resolved
                    // binding always has an instance
                    return match info.instance() {
                        Some(shared) => Ok(shared.clone()),
                        None => Err(DiError::NotFound(key)),
                    };
                }
                State::Failed(e) => return Err(e),
                State::Resolving => {
                    let start = self.stack.iter().position(|k| *k == key).unwrap_or(0);
                    let mut path: Vec<Key> = self.stack[start..].to_vec();
                    path.push(key);
                    return Err(DiError::Cycle(path));
                }
                State::Unresolved => {
                    info.state = State::Resolving;
                    info.provider.clone()
                }
            }
        };

        trace!(binding = %key, "resolving");
        self.stack.push(key);
        let outcome = match provider {
            Provider::Value(shared) => Ok(shared),
            Provider::Ctor(spec) => self.construct(key, &spec),
        };
        self.stack.pop();

        match outcome {
            Ok(shared) => {
                if let Some(info) = self.registry.get_mut(&key) {
                    let _ = info.cell.set(shared.clone());
                    info.state = State::Resolved;
                }
                Ok(shared)
            }
            Err(e) => {
                if let Some(info) = self.registry.get_mut(&key) {
                    info.state = State::Failed(e.clone());
                }
                Err(e)
            }
        }
    }

    /// Resolves a constructor's declared dependencies and invokes it.
    fn construct(&mut self, key: Key, spec: &CtorSpec) -> DiResult<Shared> {
        let mut args = Vec::with_capacity(spec.deps.len());
        for dep in &spec.deps {
            let dep_key = dep.key();
            if self.registry.contains_key(&dep_key) {
                let shared = self.resolve(dep_key)?;
                args.push(Resolved::Present(shared));
            } else if dep.is_required() {
                return Err(DiError::MissingDependency {
                    consumer: key,
                    dependency: dep_key,
                });
            } else {
                args.push(Resolved::Absent);
            }
        }
        (spec.call)(args)
    }
}
