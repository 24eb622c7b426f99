//! Turns raw notifications into payment events.
//!
//! Only notifications posted by the watched package are considered. The
//! amount is taken from the notification text with a configurable rule;
//! text that does not match is skipped.

use crate::domain::event::{Amount, PaymentEvent};
use crate::error::{NotifyError, Result};
use regex::Regex;
use serde::Deserialize;

pub const DEFAULT_PACKAGE: &str = "com.tencent.mm";
pub const DEFAULT_AMOUNT_PATTERN: &str = r"收款(\d+\.\d+)元";

/// A notification as captured by the platform observer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Notification {
    pub package: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "time")]
    pub posted_at_epoch_millis: i64,
}

/// How the amount is obtained from a notification.
#[derive(Debug, Clone)]
pub enum AmountExtraction {
    /// First capture group of the pattern, applied to the text.
    Pattern(Regex),
    /// Every matching notification reports this amount.
    Fixed(Amount),
}

impl AmountExtraction {
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() < 2 {
            return Err(NotifyError::ValidationError(format!(
                "Amount pattern '{}' needs a capture group",
                pattern
            )));
        }
        Ok(Self::Pattern(regex))
    }

    fn extract(&self, text: &str) -> Option<Result<Amount>> {
        match self {
            Self::Pattern(regex) => {
                let captured = regex.captures(text)?.get(1)?;
                Some(Amount::new(captured.as_str()))
            }
            Self::Fixed(amount) => Some(Ok(amount.clone())),
        }
    }
}

/// Filters notifications by sender and extracts payment events.
#[derive(Debug, Clone)]
pub struct NotificationFilter {
    package: String,
    extraction: AmountExtraction,
}

impl NotificationFilter {
    pub fn new(package: impl Into<String>, extraction: AmountExtraction) -> Self {
        Self {
            package: package.into(),
            extraction,
        }
    }

    /// Returns the payment event for a relevant notification, `None` for
    /// notifications that should be ignored.
    pub fn to_event(&self, notification: &Notification) -> Result<Option<PaymentEvent>> {
        if notification.package != self.package {
            tracing::trace!(
                package = %notification.package,
                "Ignoring notification from other package"
            );
            return Ok(None);
        }

        match self.extraction.extract(&notification.text) {
            Some(amount) => {
                let event = PaymentEvent::new(amount?, notification.posted_at_epoch_millis);
                tracing::debug!(
                    title = %notification.title,
                    amount = %event.amount,
                    time = event.observed_at_epoch_millis,
                    "Payment notification captured"
                );
                Ok(Some(event))
            }
            None => {
                tracing::debug!(text = %notification.text, "No amount found in notification");
                Ok(None)
            }
        }
    }
}

impl NotificationFilter {
    /// Watches `com.tencent.mm` and extracts with `收款(\d+\.\d+)元`.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(
            DEFAULT_PACKAGE,
            AmountExtraction::pattern(DEFAULT_AMOUNT_PATTERN)?,
        ))
    }
}
