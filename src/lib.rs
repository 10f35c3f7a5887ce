//! # tether
//!
//! Lifecycle-bound reactive data bindings and subscriptions for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! tether attaches externally-managed reactive computations and data
//! subscriptions to the lifecycle of component instances. Each instance
//! owns a handle registry and a readiness tracker; every computation and
//! subscription started for the instance is registered there, so teardown
//! is one `stop_all`.
//!
//! ```text
//! Bridge::attach → Instance::launch(BindingSpec) → effects + subscriptions
//!                                                        ↓
//!                                  HandleRegistry ← Instance::destroy
//! ```
//!
//! Bindings with a reactive params source restart on every change of the
//! source's return value: the previous handle is stopped before the new one
//! is created, so at most one handle per binding is ever live.
//!
//! ## Example
//!
//! ```ignore
//! use tether::{Bridge, BridgeConfig, BindingSpec, DataDeclaration, SubscriptionDeclaration};
//!
//! let bridge = Bridge::new(BridgeConfig::new(ddp_subscribe));
//!
//! // Pre-creation hook:
//! let instance = bridge.attach();
//!
//! // Creation hook:
//! instance.launch(
//!     BindingSpec::new()
//!         .data("count", DataDeclaration::producer(|| 5))
//!         .subscription("todos", SubscriptionDeclaration::params(move || vec![list_id.get()])),
//! )?;
//!
//! assert_eq!(instance.get("count"), Some(5));
//!
//! // Destruction hook (or just drop the instance):
//! instance.destroy();
//! ```
//!
//! ## Modules
//!
//! - [`lifecycle`] - [`Bridge`], [`Instance`], the per-instance state machine
//! - [`binding`] - declarative [`BindingSpec`], produced values
//! - [`data`] - reactive data binder
//! - [`subscription`] - subscription manager and readiness wiring
//! - [`registry`] - per-instance handle registry
//! - [`readiness`] - reactive subscription ready states
//! - [`handle`] - stoppable handles and the watch primitive
//! - [`config`] - explicit bridge configuration
//! - [`error`] - error taxonomy

pub mod binding;
pub mod config;
pub mod data;
pub mod error;
pub mod handle;
pub mod lifecycle;
pub mod readiness;
pub mod registry;
pub mod subscription;

pub use binding::{BindingSpec, Materialize, Produced};
pub use config::{BridgeConfig, Finalize, Transport};
pub use data::DataDeclaration;
pub use error::BridgeError;
pub use handle::{EffectHandle, Handle, SubscriptionHandle};
pub use lifecycle::{Bridge, Instance, LifecycleState};
pub use readiness::ReadinessTracker;
pub use registry::HandleRegistry;
pub use subscription::SubscriptionDeclaration;
