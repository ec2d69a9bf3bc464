//! Multi-provider edge-cache invalidation.
//!
//! Building blocks:
//!
//! - [`CdnProvider`] — the polymorphic purge capability every client
//!   implements.
//! - [`PurgeResult`] — one record per provider call; failures are data,
//!   never errors thrown up the stack.
//! - [`ProviderSetting`] / [`ProviderKind`] — tagged configuration with an
//!   opaque per-provider JSON payload.
//! - [`CdnDispatcher`] — fans a purge out to every configured provider and
//!   aggregates results, isolating each provider's failures.
//! - [`providers`] — the wire-protocol clients themselves.

pub mod config;
pub mod dispatcher;
pub mod provider;
pub mod providers;
pub mod result;
pub mod sigv4;

pub use config::{ProviderKind, ProviderSetting};
pub use dispatcher::CdnDispatcher;
pub use provider::CdnProvider;
pub use result::PurgeResult;
