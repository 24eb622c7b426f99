use crate::error::NotifyError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A positive monetary amount, kept exactly as it was observed.
///
/// The text is validated as a decimal but never re-rendered, so `"0.10"`
/// stays `"0.10"` in both the signature and the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(String);

impl Amount {
    pub fn new(text: impl Into<String>) -> Result<Self, NotifyError> {
        let text = text.into();
        let value = Decimal::from_str(&text).map_err(|e| {
            NotifyError::ValidationError(format!("Amount '{}' is not a decimal: {}", text, e))
        })?;
        if value <= Decimal::ZERO {
            return Err(NotifyError::ValidationError(format!(
                "Amount '{}' must be positive",
                text
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl TryFrom<String> for Amount {
    type Error = NotifyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A payment observed by the event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEvent {
    pub amount: Amount,
    pub observed_at_epoch_millis: i64,
}

impl PaymentEvent {
    pub fn new(amount: Amount, observed_at_epoch_millis: i64) -> Self {
        Self {
            amount,
            observed_at_epoch_millis,
        }
    }

    /// The HMAC input: amount text followed by the decimal millis, no separator.
    pub fn signing_message(&self) -> String {
        format!("{}{}", self.amount, self.observed_at_epoch_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_keeps_original_text() {
        let amount = Amount::new("0.10").unwrap();
        assert_eq!(amount.as_str(), "0.10");
        assert_eq!(amount.to_string(), "0.10");
    }

    #[test]
    fn test_amount_rejects_non_positive_and_garbage() {
        assert!(Amount::new("0").is_err());
        assert!(Amount::new("-1.00").is_err());
        assert!(Amount::new("abc").is_err());
        assert!(Amount::new("").is_err());
    }

    #[test]
    fn test_signing_message_has_no_separator() {
        let event = PaymentEvent::new(Amount::new("0.01").unwrap(), 1_700_000_000_000);
        assert_eq!(event.signing_message(), "0.011700000000000");
    }
}
