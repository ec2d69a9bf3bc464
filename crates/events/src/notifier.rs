//! Background task bridging the event bus to email delivery.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::bus::EventBus;
use crate::delivery::email::{EmailConfig, EmailDelivery};

/// Subscribe to the bus and email each publication event to `recipient`.
///
/// Best-effort by contract: delivery failures are logged and the loop
/// continues. Runs until `cancel` is triggered.
pub async fn run_notifier(
    bus: Arc<EventBus>,
    config: EmailConfig,
    recipient: String,
    cancel: CancellationToken,
) {
    let delivery = EmailDelivery::new(config);
    let mut rx = bus.subscribe();

    tracing::info!(recipient, "Publication notifier started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Publication notifier stopping");
                break;
            }
            received = rx.recv() => {
                match received {
                    Ok(event) => {
                        if let Err(e) = delivery.deliver(&recipient, &event).await {
                            tracing::warn!(
                                tenant = %event.tenant_domain,
                                item_number = event.item_number,
                                error = %e,
                                "Notification delivery failed; continuing"
                            );
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Notifier lagged behind the event bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}
