//! Lifecycle hooks - per-instance state machine and the public entry
//! points a host framework drives.
//!
//! The host calls [`Bridge::attach`] from its pre-creation hook,
//! [`Instance::launch`] from its creation hook, and [`Instance::destroy`]
//! from its destruction hook. `Drop` destroys the instance if the host
//! never did, so no handle outlives its instance either way.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{Signal, signal};

use crate::binding::BindingSpec;
use crate::config::BridgeConfig;
use crate::data::bind_data;
use crate::error::BridgeError;
use crate::handle::{Handle, run_effect};
use crate::readiness::ReadinessTracker;
use crate::registry::HandleRegistry;
use crate::subscription::{bind_subscription, subscribe_with};

/// Lifecycle of one instance.
///
/// `Created` and `Launched` are both "bound" states; the split enforces
/// that `launch` runs exactly once. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Launched,
    Destroyed,
}

/// Installs lifecycle-bound bindings onto component instances.
///
/// Holds the explicit configuration (transport, finalizer); every attached
/// instance shares it, and bridges never interfere with each other.
pub struct Bridge<V: Clone + PartialEq + 'static> {
    config: Rc<BridgeConfig<V>>,
}

impl<V: Clone + PartialEq + 'static> Bridge<V> {
    pub fn new(config: BridgeConfig<V>) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    /// Pre-creation hook: allocate the handle registry and readiness
    /// tracker for a new instance.
    pub fn attach(&self) -> Instance<V> {
        Instance {
            state: Cell::new(LifecycleState::Created),
            registry: Rc::new(HandleRegistry::new()),
            readiness: Rc::new(ReadinessTracker::new()),
            cells: RefCell::new(HashMap::new()),
            config: self.config.clone(),
        }
    }
}

/// One component instance's bound reactive state.
///
/// Owns exactly one registry, one readiness tracker, and one reactive cell
/// per declared data key; all three share the instance's lifetime exactly.
pub struct Instance<V: Clone + PartialEq + 'static> {
    state: Cell<LifecycleState>,
    registry: Rc<HandleRegistry>,
    readiness: Rc<ReadinessTracker>,
    cells: RefCell<HashMap<String, Signal<Option<V>>>>,
    config: Rc<BridgeConfig<V>>,
}

impl<V: Clone + PartialEq + 'static> Instance<V> {
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Creation hook: read the declarative configuration and bind every
    /// declared key. Runs exactly once per instance.
    ///
    /// The whole declaration set is validated before any binding is
    /// created, so a malformed declaration aborts the launch without
    /// touching any key.
    pub fn launch(&self, spec: BindingSpec<V>) -> Result<(), BridgeError> {
        match self.state.get() {
            LifecycleState::Created => {}
            LifecycleState::Launched => return Err(BridgeError::AlreadyLaunched),
            LifecycleState::Destroyed => return Err(BridgeError::Destroyed),
        }
        spec.validate()?;

        for (key, declaration) in spec.data {
            let cell: Signal<Option<V>> = signal(None);
            self.cells.borrow_mut().insert(key.clone(), cell.clone());
            bind_data(
                self.registry.clone(),
                &key,
                declaration,
                cell,
                self.config.finalize.clone(),
            );
        }
        for (key, declaration) in spec.subscriptions {
            bind_subscription(
                self.config.transport.clone(),
                self.registry.clone(),
                self.readiness.clone(),
                key,
                declaration,
            )?;
        }

        self.state.set(LifecycleState::Launched);
        Ok(())
    }

    /// Imperative subscription, outside the declarative spec.
    pub fn subscribe(&self, key: &str, params: &[V]) -> Result<(), BridgeError> {
        if self.state.get() == LifecycleState::Destroyed {
            return Err(BridgeError::Destroyed);
        }
        subscribe_with(
            &self.config.transport,
            &self.registry,
            &self.readiness,
            key,
            params,
        )?;
        Ok(())
    }

    /// Imperative reactive computation bound to this instance.
    ///
    /// Runs `computation` immediately and re-runs it whenever a signal it
    /// read changes, until `destroy` stops it. The returned handle allows
    /// stopping it earlier via [`HandleRegistry::stop_and_remove`].
    pub fn autorun(
        &self,
        computation: impl FnMut() + 'static,
    ) -> Result<Rc<dyn Handle>, BridgeError> {
        if self.state.get() == LifecycleState::Destroyed {
            return Err(BridgeError::Destroyed);
        }
        let handle = run_effect(computation);
        self.registry.register(handle.clone());
        Ok(handle)
    }

    /// Reactive read of the published value for `key`.
    ///
    /// `None` for undeclared keys and for declared keys that have not
    /// produced a value yet.
    pub fn get(&self, key: &str) -> Option<V> {
        let cell = self.cells.borrow().get(key).cloned();
        cell.and_then(|cell| cell.get())
    }

    /// The reactive cell backing `key`, if declared.
    pub fn cell(&self, key: &str) -> Option<Signal<Option<V>>> {
        self.cells.borrow().get(key).cloned()
    }

    /// Reactive ready state for a subscription.
    pub fn is_ready(&self, key: &str) -> bool {
        self.readiness.is_ready(key)
    }

    pub fn readiness(&self) -> &ReadinessTracker {
        &self.readiness
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Destruction hook: stop every registered handle.
    ///
    /// Terminal and idempotent; nothing bound to this instance fires again.
    pub fn destroy(&self) {
        if self.state.get() == LifecycleState::Destroyed {
            return;
        }
        self.registry.stop_all();
        self.state.set(LifecycleState::Destroyed);
    }
}

impl<V: Clone + PartialEq + 'static> Drop for Instance<V> {
    fn drop(&mut self) {
        self.destroy();
    }
}
