//! Scheduled publication reconciliation.
//!
//! Given a logical content item with several competing past- and
//! future-dated revisions, decide which single revision is live at an
//! instant, materialize it as a published snapshot, and hand the changed
//! URLs to the CDN dispatcher — across many isolated tenants, without
//! double-publishing or losing edits.
//!
//! - [`engine`] — the per-item reconciliation algorithm.
//! - [`store`] — the persistence seam ([`ContentStore`]) and its Postgres
//!   implementation.
//! - [`tenants`] — tenant resolution and per-tenant scoped data handles.
//! - [`orchestrator`] — the pass driver invoked by the recurring job.

pub mod engine;
pub mod orchestrator;
pub mod store;
pub mod tenants;

pub use engine::{reconcile_item, ReconcileOutcome};
pub use orchestrator::{Orchestrator, PassSummary};
pub use store::{ContentStore, PgContentStore, StoreError};
pub use tenants::{
    PgTenantDirectory, SingleTenantDirectory, TenantConnection, TenantDirectory, TenantError,
};
