use super::config::EnvironmentConfig;
use super::event::PaymentEvent;
use super::signing;
use crate::error::RelayError;
use serde::{Deserialize, Serialize};

/// JSON body posted to `/payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBody {
    pub amount: String,
    pub time: i64,
    pub signature: String,
}

/// A fully signed outbound request, derived deterministically from an
/// event and a config snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    pub body: PaymentBody,
}

impl SignedRequest {
    pub fn build(event: &PaymentEvent, config: &EnvironmentConfig) -> Result<Self, RelayError> {
        let signature = signing::sign(&config.secret_key, &event.signing_message())?;

        Ok(Self {
            url: config.payment_url(),
            body: PaymentBody {
                amount: event.amount.as_str().to_string(),
                time: event.observed_at_epoch_millis,
                signature,
            },
        })
    }

    /// Serialises the body. Only strings and an integer are involved, so a
    /// failure here means the signed body itself is unusable.
    pub fn to_json(&self) -> Result<String, RelayError> {
        serde_json::to_string(&self.body).map_err(|e| RelayError::SigningError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::Deployment;
    use crate::domain::event::Amount;

    fn event(amount: &str) -> PaymentEvent {
        PaymentEvent::new(Amount::new(amount).unwrap(), 1_700_000_000_000)
    }

    #[test]
    fn test_body_round_trip_preserves_amount_text_and_time() {
        let config = Deployment::new("http://dev", "http://prod", "testkey").snapshot(false);
        let request = SignedRequest::build(&event("10.50"), &config).unwrap();

        let json = request.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["amount"], serde_json::json!("10.50"));
        assert_eq!(value["time"], serde_json::json!(1_700_000_000_000i64));

        let decoded: PaymentBody = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, request.body);
    }

    #[test]
    fn test_toggle_changes_only_url() {
        let deployment = Deployment::new("http://dev", "http://prod", "testkey");
        let dev = SignedRequest::build(&event("0.01"), &deployment.snapshot(false)).unwrap();
        let prod = SignedRequest::build(&event("0.01"), &deployment.snapshot(true)).unwrap();

        assert_eq!(dev.url, "http://dev/payment");
        assert_eq!(prod.url, "http://prod/payment");
        assert_eq!(dev.body, prod.body);
        assert_eq!(
            dev.body.signature,
            "88a61086b64d86c97785d25c91283eb79bd7fa73db70116eaa2984798c0f49c4"
        );
    }
}
