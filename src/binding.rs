//! Binding declarations - the per-instance declarative configuration.
//!
//! A [`BindingSpec`] is read exactly once, at launch. Data keys map to a
//! [`DataDeclaration`](crate::data::DataDeclaration); subscription names map
//! to a [`SubscriptionDeclaration`](crate::subscription::SubscriptionDeclaration).

use crate::data::DataDeclaration;
use crate::error::BridgeError;
use crate::subscription::SubscriptionDeclaration;

// =============================================================================
// Produced values
// =============================================================================

/// The result of one producer invocation: a plain value, or a deferred
/// query that materializes into one.
///
/// The two variants are the closed set of shapes a producer may return;
/// the explicit tag replaces method-presence probing on the result.
pub enum Produced<V> {
    Value(V),
    Query(Box<dyn Materialize<V>>),
}

/// A deferred result that can be synchronously materialized into a value.
pub trait Materialize<V> {
    fn materialize(&self) -> V;
}

impl<V> Produced<V> {
    /// Resolve to the final value, materializing deferred queries.
    pub fn resolve(self) -> V {
        match self {
            Produced::Value(value) => value,
            Produced::Query(query) => query.materialize(),
        }
    }
}

impl<V> From<V> for Produced<V> {
    fn from(value: V) -> Self {
        Produced::Value(value)
    }
}

// =============================================================================
// BindingSpec
// =============================================================================

/// Declarative configuration for one instance.
///
/// Built with the `data`/`subscription` chaining methods and handed to
/// [`Instance::launch`](crate::Instance::launch).
pub struct BindingSpec<V> {
    pub(crate) data: Vec<(String, DataDeclaration<V>)>,
    pub(crate) subscriptions: Vec<(String, SubscriptionDeclaration<V>)>,
}

impl<V> BindingSpec<V> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Declare a reactive data key.
    pub fn data(mut self, key: impl Into<String>, declaration: DataDeclaration<V>) -> Self {
        self.data.push((key.into(), declaration));
        self
    }

    /// Declare a subscription.
    pub fn subscription(
        mut self,
        key: impl Into<String>,
        declaration: SubscriptionDeclaration<V>,
    ) -> Self {
        self.subscriptions.push((key.into(), declaration));
        self
    }

    /// Reject what the declaration types cannot: empty keys and duplicate
    /// keys within a category. Runs in full before any binding is created.
    pub(crate) fn validate(&self) -> Result<(), BridgeError> {
        let mut seen = std::collections::HashSet::new();
        for (key, _) in &self.data {
            if key.is_empty() {
                return Err(BridgeError::Configuration {
                    key: key.clone(),
                    reason: "data key must not be empty",
                });
            }
            if !seen.insert(key.as_str()) {
                return Err(BridgeError::Configuration {
                    key: key.clone(),
                    reason: "duplicate data key",
                });
            }
        }
        let mut seen = std::collections::HashSet::new();
        for (key, _) in &self.subscriptions {
            if key.is_empty() {
                return Err(BridgeError::MissingSubscriptionName);
            }
            if !seen.insert(key.as_str()) {
                return Err(BridgeError::Configuration {
                    key: key.clone(),
                    reason: "duplicate subscription name",
                });
            }
        }
        Ok(())
    }
}

impl<V> Default for BindingSpec<V> {
    fn default() -> Self {
        Self::new()
    }
}
