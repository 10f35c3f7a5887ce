//! Handle Registry - per-instance ordered collection of live handles.
//!
//! Every computation and subscription an instance starts is registered
//! here, so teardown reduces to a single `stop_all`. Ownership is
//! exclusive: a handle belongs to the registry of the instance that created
//! it until it is stopped, either individually (dependency-driven
//! replacement) or all at once at teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::BridgeError;
use crate::handle::Handle;

/// Ordered collection of the live handles owned by one instance.
pub struct HandleRegistry {
    handles: RefCell<Vec<Rc<dyn Handle>>>,
    active: Cell<bool>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self {
            handles: RefCell::new(Vec::new()),
            active: Cell::new(true),
        }
    }

    /// Append a handle.
    ///
    /// Registering after `stop_all` is a programming error; it is checked
    /// only in debug builds.
    pub fn register(&self, handle: Rc<dyn Handle>) {
        debug_assert!(
            self.active.get(),
            "register called on a torn-down registry"
        );
        self.handles.borrow_mut().push(handle);
    }

    /// Stop `handle` and remove it if present.
    ///
    /// Absent handles are a no-op, so calling this twice with the same
    /// handle is safe. A stop failure is returned after the handle has
    /// already been removed.
    pub fn stop_and_remove(&self, handle: &Rc<dyn Handle>) -> Result<(), BridgeError> {
        let found = {
            let mut handles = self.handles.borrow_mut();
            handles
                .iter()
                .position(|registered| Rc::ptr_eq(registered, handle))
                .map(|index| handles.remove(index))
        };
        match found {
            Some(handle) => handle.stop(),
            None => Ok(()),
        }
    }

    /// Stop every handle in insertion order.
    ///
    /// A failing stop is logged and does not prevent stopping the rest.
    /// Afterwards the collection is empty and the registry is inactive.
    pub fn stop_all(&self) {
        self.active.set(false);
        let handles: Vec<Rc<dyn Handle>> = self.handles.borrow_mut().drain(..).collect();
        for (position, handle) in handles.iter().enumerate() {
            if let Err(err) = handle.stop() {
                tracing::error!(position, error = %err, "failed to stop handle during teardown");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.borrow().is_empty()
    }

    /// False once `stop_all` has run.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
