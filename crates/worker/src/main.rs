//! Publication worker: runs the reconciliation pass on a fixed interval.
//!
//! The schedule lives here, not in the reconciler — the orchestrator is
//! just invoked. Cadence is a deployment parameter; correctness comes
//! from the pass being idempotent, not from any particular interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vellum_events::{EmailConfig, EventBus};
use vellum_reconciler::tenants::{PgTenantStores, TenantConnection};
use vellum_reconciler::{Orchestrator, PgTenantDirectory, SingleTenantDirectory, TenantDirectory};

/// Default pass cadence: every 30 minutes.
const DEFAULT_PASS_INTERVAL_SECS: u64 = 1800;

/// Worker configuration from environment variables.
///
/// `TENANTS_DATABASE_URL` set = multi-tenant mode against the control
/// database; otherwise single-tenant mode against `DATABASE_URL`.
struct WorkerConfig {
    database_url: Option<String>,
    tenants_database_url: Option<String>,
    tenant_domain: String,
    pass_interval: Duration,
    notify_email: Option<String>,
}

impl WorkerConfig {
    fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            tenants_database_url: std::env::var("TENANTS_DATABASE_URL").ok(),
            tenant_domain: std::env::var("TENANT_DOMAIN")
                .unwrap_or_else(|_| "default".to_string()),
            pass_interval: Duration::from_secs(
                std::env::var("PASS_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PASS_INTERVAL_SECS),
            ),
            notify_email: std::env::var("PUBLISH_NOTIFY_EMAIL").ok(),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vellum_worker=debug,vellum_reconciler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();

    let directory: Arc<dyn TenantDirectory> = match &config.tenants_database_url {
        Some(url) => {
            let control_pool = match vellum_db::create_pool(url).await {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::error!(error = %e, "Cannot reach the control database");
                    return;
                }
            };
            tracing::info!("Multi-tenant mode");
            Arc::new(PgTenantDirectory::new(control_pool))
        }
        None => {
            let Some(database_url) = config.database_url.clone() else {
                tracing::error!("Set DATABASE_URL (single-tenant) or TENANTS_DATABASE_URL");
                return;
            };
            tracing::info!(domain = %config.tenant_domain, "Single-tenant mode");
            Arc::new(SingleTenantDirectory::new(TenantConnection {
                domain: config.tenant_domain.clone(),
                database_url,
                storage_url: None,
            }))
        }
    };

    let cancel = CancellationToken::new();

    let bus = Arc::new(EventBus::default());
    let mut orchestrator = Orchestrator::new(directory, Arc::new(PgTenantStores));

    // Notification is optional twice over: it needs both SMTP settings and
    // a recipient. Missing either just means no emails.
    match (EmailConfig::from_env(), config.notify_email.clone()) {
        (Some(email_config), Some(recipient)) => {
            orchestrator = orchestrator.with_bus(bus.clone());
            tokio::spawn(vellum_events::run_notifier(
                bus.clone(),
                email_config,
                recipient,
                cancel.clone(),
            ));
        }
        _ => tracing::info!("Publication notifications disabled"),
    }

    tracing::info!(
        interval_secs = config.pass_interval.as_secs(),
        "Publication worker started"
    );

    let mut interval = tokio::time::interval(config.pass_interval);
    let pass_cancel = cancel.clone();

    let worker = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = pass_cancel.cancelled() => {
                    tracing::info!("Worker loop stopping");
                    break;
                }
                _ = interval.tick() => {
                    let summary = orchestrator.run_pass(Utc::now(), &pass_cancel).await;
                    if summary.items_activated > 0 || summary.tenants_failed > 0 {
                        tracing::info!(
                            items_activated = summary.items_activated,
                            tenants_failed = summary.tenants_failed,
                            "Pass finished"
                        );
                    }
                }
            }
        }
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown requested; finishing the tenant in flight");
    cancel.cancel();
    let _ = worker.await;
}
