//! Reactive Data Binder - continuously recomputed, published values.
//!
//! Each declared data key gets a reactive cell (`Signal<Option<V>>`,
//! starting at `None`) and one live computation that recomputes the
//! producer's value and publishes it into the cell. When a declaration
//! carries a params source, a watch restarts the computation on every
//! change of the source's return value - stopping the previous computation
//! first, so at most one computation per key is ever live.

use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use spark_signals::Signal;

use crate::binding::Produced;
use crate::config::Finalize;
use crate::handle::{Handle, run_effect, watch};
use crate::registry::HandleRegistry;

pub(crate) type UpdateFn<V> = Rc<dyn Fn(Option<&V>) -> Produced<V>>;
pub(crate) type ParamsFn<V> = Rc<dyn Fn() -> V>;

/// How a reactive data key produces its value. The closed set of shapes.
pub enum DataDeclaration<V> {
    /// A bare producer, invoked without parameters.
    Producer(Rc<dyn Fn() -> Produced<V>>),
    /// An update function, optionally driven by a reactive params source.
    Updater {
        update: UpdateFn<V>,
        params: Option<ParamsFn<V>>,
    },
}

impl<V> DataDeclaration<V> {
    /// Declare a plain producer.
    pub fn producer<R>(producer: impl Fn() -> R + 'static) -> Self
    where
        R: Into<Produced<V>>,
    {
        DataDeclaration::Producer(Rc::new(move || producer().into()))
    }

    /// Declare an update function without a params source; it runs exactly
    /// once at launch (and again on reactive changes it tracks itself).
    pub fn updater<R>(update: impl Fn(Option<&V>) -> R + 'static) -> Self
    where
        R: Into<Produced<V>>,
    {
        DataDeclaration::Updater {
            update: Rc::new(move |params| update(params).into()),
            params: None,
        }
    }

    /// Declare an update function driven by a reactive params source; each
    /// change of the source's return value restarts the computation with the
    /// new parameters.
    pub fn updater_with_params<R>(
        update: impl Fn(Option<&V>) -> R + 'static,
        params: impl Fn() -> V + 'static,
    ) -> Self
    where
        R: Into<Produced<V>>,
    {
        DataDeclaration::Updater {
            update: Rc::new(move |params| update(params).into()),
            params: Some(Rc::new(params)),
        }
    }
}

/// Bind one data key: keep exactly one live computation publishing into its
/// cell.
pub(crate) fn bind_data<V>(
    registry: Rc<HandleRegistry>,
    key: &str,
    declaration: DataDeclaration<V>,
    cell: Signal<Option<V>>,
    finalize: Option<Finalize<V>>,
) where
    V: Clone + PartialEq + 'static,
{
    let (update, params) = match declaration {
        DataDeclaration::Producer(producer) => {
            let update: UpdateFn<V> = Rc::new(move |_| producer());
            (update, None)
        }
        DataDeclaration::Updater { update, params } => (update, params),
    };

    let key = key.to_string();
    let registry_for_watch = registry.clone();
    let registry_for_run = registry.clone();
    let run_computation = move |params: Option<V>| -> Rc<dyn Handle> {
        let update = update.clone();
        let cell = cell.clone();
        let finalize = finalize.clone();
        let key = key.clone();
        let handle = run_effect(move || {
            let produced = catch_unwind(AssertUnwindSafe(|| {
                let mut value = update(params.as_ref()).resolve();
                if let Some(finalize) = &finalize {
                    value = finalize(value);
                }
                value
            }));
            match produced {
                Ok(value) => {
                    cell.set(Some(value));
                }
                Err(_) => {
                    tracing::error!(key = %key, "data producer panicked; keeping previous value");
                }
            }
        });
        registry_for_run.register(handle.clone());
        handle
    };

    match params {
        Some(params_source) => {
            let current: RefCell<Option<Rc<dyn Handle>>> = RefCell::new(None);
            let watch_handle = watch(
                move || params_source(),
                move |params: &V| {
                    if let Some(previous) = current.borrow_mut().take() {
                        if let Err(err) = registry.stop_and_remove(&previous) {
                            tracing::warn!(error = %err, "failed to stop replaced computation");
                        }
                    }
                    *current.borrow_mut() = Some(run_computation(Some(params.clone())));
                },
                true,
            );
            registry_for_watch.register(watch_handle);
        }
        None => {
            run_computation(None);
        }
    }
}
