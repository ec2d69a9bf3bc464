//! Publication event bus and notification delivery.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PublicationEvent`] — emitted once per activated revision.
//! - [`delivery`] — best-effort email notification; failures are logged
//!   and never propagate into the reconciliation pass.
//! - [`run_notifier`] — background task bridging the bus to delivery.

pub mod bus;
pub mod delivery;
pub mod notifier;

pub use bus::{EventBus, PublicationEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use notifier::run_notifier;
