//! Subscription Manager - live data subscriptions and readiness wiring.
//!
//! Subscribing delegates to the injected transport, registers the returned
//! handle, and - when the handle supports the readiness query - keeps the
//! instance's [`ReadinessTracker`] entry in sync through a dedicated,
//! registry-owned effect. Declarations with a params source resubscribe on
//! every change of the source's return value, stopping the previous handle
//! first.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Transport;
use crate::error::BridgeError;
use crate::handle::{Handle, SubscriptionHandle, run_effect, watch};
use crate::readiness::ReadinessTracker;
use crate::registry::HandleRegistry;

/// How a subscription obtains its parameters.
pub enum SubscriptionDeclaration<V> {
    /// Subscribe once at launch with these parameters; no watch.
    Static(Vec<V>),
    /// Evaluate the source immediately and on every change of its return
    /// value; each evaluation stops the previous handle and resubscribes.
    Params(Rc<dyn Fn() -> Vec<V>>),
}

impl<V> SubscriptionDeclaration<V> {
    /// Declare a reactive params source.
    pub fn params(source: impl Fn() -> Vec<V> + 'static) -> Self {
        SubscriptionDeclaration::Params(Rc::new(source))
    }
}

/// One live subscription: the transport handle and, when the handle
/// supports readiness, the effect feeding the tracker. The pair is
/// replaced together on resubscription.
pub(crate) struct LiveSubscription {
    handle: Rc<dyn SubscriptionHandle>,
    readiness_effect: Option<Rc<dyn Handle>>,
}

impl LiveSubscription {
    /// Stop both members via the registry, the subscription first.
    fn retire(self, registry: &HandleRegistry) {
        let handle: Rc<dyn Handle> = self.handle;
        if let Err(err) = registry.stop_and_remove(&handle) {
            tracing::warn!(error = %err, "failed to stop replaced subscription");
        }
        if let Some(effect) = self.readiness_effect {
            if let Err(err) = registry.stop_and_remove(&effect) {
                tracing::warn!(error = %err, "failed to stop replaced readiness effect");
            }
        }
    }
}

/// Create one live subscription: delegate to the transport, register the
/// handle, and wire readiness when the handle supports it.
pub(crate) fn subscribe_with<V>(
    transport: &Transport<V>,
    registry: &Rc<HandleRegistry>,
    readiness: &Rc<ReadinessTracker>,
    key: &str,
    params: &[V],
) -> Result<LiveSubscription, BridgeError>
where
    V: Clone + PartialEq + 'static,
{
    if key.is_empty() {
        return Err(BridgeError::MissingSubscriptionName);
    }
    let handle = (transport)(key, params);
    let registered: Rc<dyn Handle> = handle.clone();
    registry.register(registered);

    let mut readiness_effect = None;
    if handle.ready().is_some() {
        readiness.set_ready(key, false);
        let readiness = readiness.clone();
        let key = key.to_string();
        let ready_handle = handle.clone();
        let effect = run_effect(move || {
            readiness.set_ready(&key, ready_handle.ready().unwrap_or(false));
        });
        registry.register(effect.clone());
        readiness_effect = Some(effect);
    }

    Ok(LiveSubscription {
        handle,
        readiness_effect,
    })
}

/// Bind one declared subscription.
pub(crate) fn bind_subscription<V>(
    transport: Transport<V>,
    registry: Rc<HandleRegistry>,
    readiness: Rc<ReadinessTracker>,
    key: String,
    declaration: SubscriptionDeclaration<V>,
) -> Result<(), BridgeError>
where
    V: Clone + PartialEq + 'static,
{
    match declaration {
        SubscriptionDeclaration::Static(params) => {
            subscribe_with(&transport, &registry, &readiness, &key, &params)?;
            Ok(())
        }
        SubscriptionDeclaration::Params(source) => {
            let registry_for_watch = registry.clone();
            let current: RefCell<Option<LiveSubscription>> = RefCell::new(None);
            let watch_handle = watch(
                move || source(),
                move |params: &Vec<V>| {
                    if let Some(previous) = current.borrow_mut().take() {
                        previous.retire(&registry);
                    }
                    match subscribe_with(&transport, &registry, &readiness, &key, params) {
                        Ok(live) => *current.borrow_mut() = Some(live),
                        Err(err) => tracing::error!(error = %err, "resubscription failed"),
                    }
                },
                true,
            );
            registry_for_watch.register(watch_handle);
            Ok(())
        }
    }
}
