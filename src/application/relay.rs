use crate::domain::config::EnvironmentConfig;
use crate::domain::event::PaymentEvent;
use crate::domain::ports::{Transport, TransportBox};
use crate::domain::request::SignedRequest;
use crate::error::RelayError;

/// Acknowledgement of a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub status: u16,
}

/// Signs payment events and posts them to the configured backend.
///
/// `Relay` holds no state of its own besides the transport. Each call is a
/// single at-most-once attempt; failures are returned, never retried.
pub struct Relay {
    transport: TransportBox,
}

impl Relay {
    pub fn new(transport: TransportBox) -> Self {
        Self { transport }
    }

    /// Relays one event using the given config snapshot.
    ///
    /// Returns `Ack` for a 2xx response. Any other status is
    /// `ServerRejected`, a missing response is `TransportError`.
    pub async fn relay(
        &self,
        event: &PaymentEvent,
        config: &EnvironmentConfig,
    ) -> Result<Ack, RelayError> {
        let request = SignedRequest::build(event, config).inspect_err(|e| {
            tracing::warn!(error = %e, amount = %event.amount, "Failed to sign payment event");
        })?;
        let body = request.to_json()?;

        tracing::debug!(
            url = %request.url,
            environment = %config.environment(),
            body = %body,
            "Sending payment event"
        );

        let status = match self.transport.post_json(&request.url, body).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Payment event delivery failed");
                return Err(e);
            }
        };

        if (200..300).contains(&status) {
            tracing::info!(
                url = %request.url,
                amount = %event.amount,
                time = event.observed_at_epoch_millis,
                status,
                "Payment event delivered"
            );
            Ok(Ack { status })
        } else {
            tracing::warn!(url = %request.url, status, "Server rejected payment event");
            Err(RelayError::ServerRejected { status })
        }
    }
}
