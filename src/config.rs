//! Bridge configuration - explicit, per-bridge, no global state.

use std::rc::Rc;

use crate::handle::SubscriptionHandle;

/// The injected subscription transport: `(name, params) -> handle`.
pub type Transport<V> = Rc<dyn Fn(&str, &[V]) -> Rc<dyn SubscriptionHandle>>;

/// A transform applied to every computed data result before publishing.
pub type Finalize<V> = Rc<dyn Fn(V) -> V>;

/// Configuration for a [`Bridge`](crate::Bridge).
///
/// Passed in explicitly at construction; instances attached to different
/// bridges never interfere through shared options.
pub struct BridgeConfig<V> {
    pub(crate) transport: Transport<V>,
    pub(crate) finalize: Option<Finalize<V>>,
}

impl<V> BridgeConfig<V> {
    /// Create a configuration around the subscription transport.
    pub fn new(transport: impl Fn(&str, &[V]) -> Rc<dyn SubscriptionHandle> + 'static) -> Self {
        Self {
            transport: Rc::new(transport),
            finalize: None,
        }
    }

    /// Install a transform applied to every computed data result before it
    /// is published, e.g. normalization or interning.
    pub fn finalize(mut self, finalize: impl Fn(V) -> V + 'static) -> Self {
        self.finalize = Some(Rc::new(finalize));
        self
    }
}
