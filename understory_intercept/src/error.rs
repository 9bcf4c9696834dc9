// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by application callbacks.
//!
//! Nothing here ever reaches the host: the interceptor converts every failure
//! into the host's default behavior and logs it.

use alloc::string::String;

use thiserror::Error;

/// Failure of a policy query or of a feature-flag source.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Configuration needed to decide is missing or unreadable.
    #[error("configuration unavailable: {0}")]
    ConfigUnavailable(String),
    /// The policy reached a verdict it knows to be invalid.
    #[error("invalid verdict: {0}")]
    InvalidVerdict(String),
    /// Any other failure.
    #[error("policy failed: {0}")]
    Failed(String),
}

/// Failure reported by an event subscriber.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SubscriberError {
    message: String,
}

impl SubscriberError {
    /// Create an error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message this error was created with.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(
            PolicyError::ConfigUnavailable("flags".into()).to_string(),
            "configuration unavailable: flags"
        );
        assert_eq!(SubscriberError::new("boom").to_string(), "boom");
    }
}
