//! Handles and the watch primitive.
//!
//! Everything the crate needs from spark-signals flows through this module:
//! effects are wrapped into [`EffectHandle`] so the registry can own
//! computations and subscriptions uniformly, and [`watch`] builds the
//! source/callback primitive used for dependency-parameterized restarts on
//! top of a plain effect.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::effect;

use crate::error::BridgeError;

/// An opaque stoppable resource: a live computation or subscription.
///
/// Stopping detaches the resource from future reactive triggers. Stop must
/// be safe to call more than once.
pub trait Handle {
    fn stop(&self) -> Result<(), BridgeError>;
}

/// A live data subscription: stoppable, optionally readiness-capable.
///
/// `ready` returning `Some` declares the readiness capability; a handle must
/// answer `Some` or `None` consistently for its whole life. Reading the
/// current value inside an effect establishes a reactive dependency when the
/// transport backs readiness with a signal.
pub trait SubscriptionHandle: Handle {
    fn ready(&self) -> Option<bool>;
}

/// A registered reactive computation.
///
/// Wraps the stop function returned by `spark_signals::effect`; stopping a
/// second time is a no-op.
pub struct EffectHandle {
    stop: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl EffectHandle {
    pub(crate) fn new(stop: impl FnOnce() + 'static) -> Self {
        Self {
            stop: RefCell::new(Some(Box::new(stop))),
        }
    }
}

impl Handle for EffectHandle {
    fn stop(&self) -> Result<(), BridgeError> {
        if let Some(stop) = self.stop.borrow_mut().take() {
            stop();
        }
        Ok(())
    }
}

/// Start a computation that re-runs `body` whenever a signal it read
/// changes, and return it as a registrable handle.
pub(crate) fn run_effect(body: impl FnMut() + 'static) -> Rc<dyn Handle> {
    Rc::new(EffectHandle::new(effect(body)))
}

/// Invoke `callback` whenever `source`'s return value changes, and once
/// immediately when `immediate` is set.
///
/// Change detection uses `PartialEq` on the produced value. The callback
/// runs inside the watching effect; computations it creates get their own
/// tracking context and independent lifetimes.
pub(crate) fn watch<T, S, C>(source: S, mut callback: C, immediate: bool) -> Rc<dyn Handle>
where
    T: Clone + PartialEq + 'static,
    S: Fn() -> T + 'static,
    C: FnMut(&T) + 'static,
{
    let mut last: Option<T> = None;
    run_effect(move || {
        let value = source();
        let fire = match &last {
            None => immediate,
            Some(previous) => *previous != value,
        };
        last = Some(value.clone());
        if fire {
            callback(&value);
        }
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use spark_signals::signal;

    use super::*;

    #[test]
    fn test_effect_handle_stop_is_idempotent() {
        let stops = Rc::new(Cell::new(0));
        let stops_clone = stops.clone();
        let handle = EffectHandle::new(move || {
            stops_clone.set(stops_clone.get() + 1);
        });

        handle.stop().unwrap();
        handle.stop().unwrap();

        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_watch_immediate_fires_once_with_initial_value() {
        let source = signal(7);
        let source_clone = source.clone();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let _handle = watch(
            move || source_clone.get(),
            move |value: &i32| seen_clone.borrow_mut().push(*value),
            true,
        );

        assert_eq!(*seen.borrow(), vec![7]);

        source.set(8);
        assert_eq!(*seen.borrow(), vec![7, 8]);
    }

    #[test]
    fn test_watch_non_immediate_skips_initial_evaluation() {
        let source = signal(1);
        let source_clone = source.clone();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let _handle = watch(
            move || source_clone.get(),
            move |value: &i32| seen_clone.borrow_mut().push(*value),
            false,
        );

        assert!(seen.borrow().is_empty());

        source.set(2);
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_watch_does_not_fire_on_equal_value() {
        let source = signal(0);
        let source_clone = source.clone();

        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();

        let _handle = watch(
            move || source_clone.get() / 10,
            move |_: &i32| fired_clone.set(fired_clone.get() + 1),
            true,
        );

        assert_eq!(fired.get(), 1);

        // Source changes, derived value does not.
        source.set(5);
        assert_eq!(fired.get(), 1);

        source.set(10);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_watch_stops_with_its_handle() {
        let source = signal(1);
        let source_clone = source.clone();

        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();

        let handle = watch(
            move || source_clone.get(),
            move |_: &i32| fired_clone.set(fired_clone.get() + 1),
            true,
        );

        assert_eq!(fired.get(), 1);

        handle.stop().unwrap();
        source.set(2);
        assert_eq!(fired.get(), 1);
    }
}
