//! Per-type migrator registry and chain execution.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{MigrateError, Result};
use crate::migrator::Migrator;

/// Observer for registry events.
///
/// Passed in at construction instead of reaching for ambient global state, so
/// hosts can route replacement warnings into their own telemetry.
pub trait MigrationEvents: Send + Sync {
    /// A migrator with the same `from_version` was already registered and has
    /// been replaced.
    fn migrator_replaced(&self, type_id: &str, from_version: u32, old_to: u32, new_to: u32);
}

/// Default observer: emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl MigrationEvents for TracingEvents {
    fn migrator_replaced(&self, type_id: &str, from_version: u32, old_to: u32, new_to: u32) {
        tracing::warn!(
            type_id,
            from_version,
            old_to,
            new_to,
            "replacing registered migrator"
        );
    }
}

/// Registry of migrators per logical type, resolving and executing chains.
///
/// Registration is expected during an initialization phase; the internal
/// mutex keeps `register`/`unregister` correct if they do race a lookup.
pub struct MigrationManager {
    registry: Mutex<HashMap<String, Vec<Migrator>>>,
    events: Arc<dyn MigrationEvents>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    /// Create a manager reporting events through `tracing`.
    pub fn new() -> Self {
        Self::with_events(Arc::new(TracingEvents))
    }

    /// Create a manager reporting events to an explicit observer.
    pub fn with_events(events: Arc<dyn MigrationEvents>) -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Register a migrator for a logical type.
    ///
    /// At most one migrator per `from_version` is kept: registering a second
    /// replaces the first (last registration wins) and notifies the observer.
    /// The per-type list stays sorted ascending by `from_version`.
    pub fn register(&self, type_id: impl Into<String>, migrator: Migrator) {
        let type_id = type_id.into();
        let mut registry = self.registry.lock().expect("migration registry poisoned");
        let steps = registry.entry(type_id.clone()).or_default();

        match steps.binary_search_by_key(&migrator.from_version(), Migrator::from_version) {
            Ok(idx) => {
                let old = std::mem::replace(&mut steps[idx], migrator);
                self.events.migrator_replaced(
                    &type_id,
                    old.from_version(),
                    old.to_version(),
                    steps[idx].to_version(),
                );
            }
            Err(idx) => steps.insert(idx, migrator),
        }
    }

    /// Register a migrator keyed by the Rust type it migrates.
    pub fn register_for<T>(&self, migrator: Migrator) {
        self.register(std::any::type_name::<T>(), migrator);
    }

    /// Remove the migrator with the given `from_version`, if present.
    pub fn unregister(&self, type_id: &str, from_version: u32) -> bool {
        let mut registry = self.registry.lock().expect("migration registry poisoned");
        let Some(steps) = registry.get_mut(type_id) else {
            return false;
        };
        match steps.binary_search_by_key(&from_version, Migrator::from_version) {
            Ok(idx) => {
                steps.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Check whether a contiguous chain exists from one version to another.
    ///
    /// Trivially satisfied when `from_version >= to_version`.
    pub fn can_migrate(&self, type_id: &str, from_version: u32, to_version: u32) -> bool {
        if from_version >= to_version {
            return true;
        }
        self.resolve_chain(type_id, from_version, to_version).is_ok()
    }

    /// Carry a payload from one schema version to another.
    ///
    /// Walks the registered chain greedily, applying each step's transform to
    /// the running payload. The input is returned unchanged, without
    /// consulting the registry, when `from_version >= to_version`. On any
    /// failure the running payload is discarded; no external state is touched
    /// mid-chain.
    pub fn migrate(
        &self,
        type_id: &str,
        payload: Vec<u8>,
        from_version: u32,
        to_version: u32,
    ) -> Result<Vec<u8>> {
        if from_version >= to_version {
            return Ok(payload);
        }

        let chain = self.resolve_chain(type_id, from_version, to_version)?;

        let mut running = payload;
        for step in &chain {
            running = step
                .apply(&running)
                .map_err(|source| MigrateError::StepFailed {
                    from: step.from_version(),
                    to: step.to_version(),
                    source,
                })?;
        }

        tracing::debug!(
            type_id,
            from_version,
            to_version,
            steps = chain.len(),
            "migrated payload"
        );
        Ok(running)
    }

    /// Resolve the chain for a walk, cloning steps out of the registry so
    /// transforms run without holding the lock.
    ///
    /// A single linear pass bounded by the number of registered steps: each
    /// hop looks up the one migrator consuming the current version. No
    /// search; migrators form a simple chain with one outgoing edge per
    /// version.
    fn resolve_chain(
        &self,
        type_id: &str,
        from_version: u32,
        to_version: u32,
    ) -> Result<Vec<Migrator>> {
        let registry = self.registry.lock().expect("migration registry poisoned");
        let steps = registry.get(type_id).map(Vec::as_slice).unwrap_or_default();

        let mut chain = Vec::new();
        let mut current = from_version;
        while current < to_version {
            match steps.binary_search_by_key(&current, Migrator::from_version) {
                Ok(idx) => {
                    let step = steps[idx].clone();
                    current = step.to_version();
                    chain.push(step);
                }
                Err(_) => {
                    return Err(MigrateError::ChainBroken {
                        type_id: type_id.to_string(),
                        at_version: current,
                        target_version: to_version,
                    });
                }
            }
        }
        Ok(chain)
    }
}

impl std::fmt::Debug for MigrationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock().expect("migration registry poisoned");
        let types: Vec<_> = registry.keys().collect();
        f.debug_struct("MigrationManager")
            .field("types", &types)
            .finish_non_exhaustive()
    }
}
