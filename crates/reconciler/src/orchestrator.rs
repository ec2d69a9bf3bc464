//! The pass driver.
//!
//! A recurring external trigger calls [`Orchestrator::run_pass`]. The
//! orchestrator enumerates tenants, opens a fresh scoped handle per
//! tenant, sweeps that tenant's reconciliation candidates, and — only
//! after the tenant's snapshot writes have committed — dispatches one
//! purge with the union of changed URLs. Every failure is contained at
//! its granularity: item, then tenant; a pass never takes the process
//! down. The orchestrator holds no state between passes, so overlapping
//! runs are safe (if wasteful) and every pass is re-entrant.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use vellum_cdn::CdnDispatcher;
use vellum_core::types::Timestamp;
use vellum_events::{EventBus, PublicationEvent};

use crate::engine::{reconcile_item, ReconcileOutcome};
use crate::tenants::{TenantDirectory, TenantError, TenantHandle, TenantStores};

/// Aggregate numbers for one pass, for the worker's logs.
#[derive(Debug, Default, Clone)]
pub struct PassSummary {
    pub tenants_processed: usize,
    pub tenants_failed: usize,
    pub items_activated: usize,
    pub items_failed: usize,
    pub purge_calls: usize,
}

/// What one tenant's sweep produced.
#[derive(Debug, Default)]
struct TenantOutcome {
    activated: Vec<PublicationEvent>,
    changed_urls: Vec<String>,
    items_failed: usize,
}

/// Drives reconciliation and purge dispatch across tenants.
pub struct Orchestrator {
    directory: Arc<dyn TenantDirectory>,
    stores: Arc<dyn TenantStores>,
    bus: Option<Arc<EventBus>>,
}

impl Orchestrator {
    pub fn new(directory: Arc<dyn TenantDirectory>, stores: Arc<dyn TenantStores>) -> Self {
        Self {
            directory,
            stores,
            bus: None,
        }
    }

    /// Publish a `publication.activated` event per activation (optional).
    pub fn with_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Run one reconciliation pass as of `now`.
    ///
    /// Cancellation is cooperative at tenant granularity: the tenant in
    /// flight finishes, the next one is not started.
    pub async fn run_pass(&self, now: Timestamp, cancel: &CancellationToken) -> PassSummary {
        let mut summary = PassSummary::default();

        let domains = match self.directory.list_active_domains().await {
            Ok(domains) => domains,
            Err(e) => {
                tracing::error!(error = %e, "Tenant enumeration failed; skipping pass");
                summary.tenants_failed += 1;
                return summary;
            }
        };

        for domain in domains {
            if cancel.is_cancelled() {
                tracing::info!("Pass cancelled; not starting remaining tenants");
                break;
            }

            match self.process_tenant(&domain, now).await {
                Ok(outcome) => {
                    summary.tenants_processed += 1;
                    summary.items_activated += outcome.activated.len();
                    summary.items_failed += outcome.items_failed;
                    if !outcome.changed_urls.is_empty() {
                        summary.purge_calls += 1;
                    }
                }
                Err(e) => {
                    // Tenant-level isolation: log with the tenant attached,
                    // move on to the remaining tenants.
                    tracing::error!(tenant = %domain, error = %e, "Tenant pass failed");
                    summary.tenants_failed += 1;
                }
            }
        }

        tracing::info!(
            tenants_processed = summary.tenants_processed,
            tenants_failed = summary.tenants_failed,
            items_activated = summary.items_activated,
            items_failed = summary.items_failed,
            "Reconciliation pass complete"
        );
        summary
    }

    async fn process_tenant(&self, domain: &str, now: Timestamp) -> Result<TenantOutcome, TenantError> {
        let connection = self.directory.resolve(domain).await?;
        let handle = self.stores.open(&connection).await?;

        // Scoped handle discipline: whatever the sweep does, release the
        // handle before surfacing the result.
        let result = self.sweep_tenant(&handle, now).await;
        handle.close().await;
        let outcome = result?;

        for event in &outcome.activated {
            if let Some(bus) = &self.bus {
                bus.publish(event.clone());
            }
        }

        Ok(outcome)
    }

    /// Reconcile every candidate item, then dispatch one purge for the
    /// union of changed URLs. Purge strictly follows the snapshot writes:
    /// a purged cache slot must refill from the new snapshot, never the
    /// old one.
    async fn sweep_tenant(
        &self,
        handle: &TenantHandle,
        now: Timestamp,
    ) -> Result<TenantOutcome, TenantError> {
        let store = handle.store.as_ref();
        let domain = handle.domain.as_str();
        let mut outcome = TenantOutcome::default();

        let candidates = store.candidate_items(now).await?;
        tracing::debug!(tenant = %domain, candidates = candidates.len(), "Candidate scan complete");

        for item_number in candidates {
            match reconcile_item(store, item_number, now).await {
                Ok(ReconcileOutcome::NoOp) => {}
                Ok(ReconcileOutcome::Activated {
                    item_number,
                    title,
                    url_path,
                    published_at,
                    changed_urls,
                }) => {
                    outcome.changed_urls.extend(changed_urls);
                    outcome.activated.push(PublicationEvent::new(
                        domain,
                        item_number,
                        title,
                        url_path,
                        published_at,
                    ));
                }
                Err(e) => {
                    // Item-level isolation: the next pass re-evaluates this
                    // item from current state.
                    tracing::warn!(tenant = %domain, item_number, error = %e, "Item reconciliation failed");
                    outcome.items_failed += 1;
                }
            }
        }

        if !outcome.changed_urls.is_empty() {
            let settings = store.list_cdn_settings().await?;
            let results = CdnDispatcher::purge(&settings, &outcome.changed_urls).await;
            for result in &results {
                if result.success {
                    tracing::info!(
                        tenant = %domain,
                        provider = %result.provider,
                        status = result.status_code,
                        operation_id = result.operation_id.as_deref(),
                        "Purge dispatched"
                    );
                } else {
                    tracing::warn!(
                        tenant = %domain,
                        provider = %result.provider,
                        status = result.status_code,
                        reason = %result.reason,
                        "Purge failed"
                    );
                }
            }
        }

        Ok(outcome)
    }
}
