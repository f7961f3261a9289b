use thiserror::Error;

/// Failure of the state source to deliver a snapshot.
#[derive(Debug, Error)]
#[error("Error fetching device states: {0}")]
pub struct SourceError(pub String);

impl SourceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Failure of the notification channel for a single recipient.
#[derive(Debug, Error)]
#[error("Error delivering notification to [{address}]: {reason}")]
pub struct DeliveryError {
    pub address: String,
    pub reason: String,
}

impl DeliveryError {
    pub fn new(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid battery check configuration: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("Invalid check time [{0}], expected HH:MM or HH:MM:SS")]
    CheckTime(String),
    #[error("Unknown timezone [{0}]")]
    Timezone(String),
    #[error("Invalid matcher terms: {0}")]
    Terms(regex::Error),
}

#[derive(Debug, Error)]
pub enum BatteryCheckError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
