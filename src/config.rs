use chrono::NaiveTime;
use chrono_tz::Tz;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    classifier::DEFAULT_LEVEL_EXCLUSION_TERMS,
    threshold::{DEFAULT_CRITICAL_THRESHOLD, DEFAULT_LOW_THRESHOLD},
    Aggregator, Classifier, ConfigError, Recipient, Thresholds,
};

pub const DEFAULT_INSTANCE: &str = "battery_check";
pub const DEFAULT_CHECK_TIME: &str = "18:15:00";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Stockholm;

fn default_instance() -> String {
    DEFAULT_INSTANCE.to_owned()
}

fn default_low_threshold() -> f64 {
    DEFAULT_LOW_THRESHOLD
}

fn default_critical_threshold() -> f64 {
    DEFAULT_CRITICAL_THRESHOLD
}

fn default_check_time() -> String {
    DEFAULT_CHECK_TIME.to_owned()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.name().to_owned()
}

fn default_level_exclusion_terms() -> Vec<String> {
    DEFAULT_LEVEL_EXCLUSION_TERMS
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatteryCheckConfig {
    /// Namespace of the ignore actions this instance answers to
    #[serde(default = "default_instance")]
    pub name: String,
    #[serde(default)]
    pub persons: Vec<Recipient>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "default_low_threshold")]
    pub low_battery_threshold: f64,
    #[serde(default = "default_critical_threshold")]
    pub critical_battery_threshold: f64,
    #[serde(default = "default_check_time")]
    pub check_time: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Battery class entities containing one of these terms are companion sensors
    #[serde(default = "default_level_exclusion_terms")]
    pub level_exclusion_terms: Vec<String>,
}

impl Default for BatteryCheckConfig {
    fn default() -> Self {
        Self {
            name: default_instance(),
            persons: Vec::new(),
            exclude: Vec::new(),
            low_battery_threshold: DEFAULT_LOW_THRESHOLD,
            critical_battery_threshold: DEFAULT_CRITICAL_THRESHOLD,
            check_time: default_check_time(),
            timezone: default_timezone(),
            level_exclusion_terms: default_level_exclusion_terms(),
        }
    }
}

/// Non fatal configuration problems; each one comes with a fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigWarning {
    #[error("No persons configured for notifications")]
    NoRecipients,
    #[error("Person '{person}' missing notify address")]
    MissingAddress { person: String },
    #[error("low_battery_threshold ({low}) should be higher than critical_battery_threshold ({critical})")]
    ThresholdOrder { critical: f64, low: f64 },
    #[error("Invalid timezone '{0}', using default '{default}'", default = DEFAULT_TIMEZONE)]
    UnknownTimezone(String),
    #[error("Invalid check time '{0}', using default '{default}'", default = DEFAULT_CHECK_TIME)]
    InvalidCheckTime(String),
}

pub fn parse_check_time(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ConfigError::CheckTime(value.to_owned()))
}

pub fn parse_timezone(value: &str) -> Result<Tz, ConfigError> {
    value
        .parse::<Tz>()
        .map_err(|_| ConfigError::Timezone(value.to_owned()))
}

impl BatteryCheckConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(BatteryCheckConfig)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.persons.is_empty() {
            warnings.push(ConfigWarning::NoRecipients);
        }
        for person in &self.persons {
            if person.address().is_none() {
                warnings.push(ConfigWarning::MissingAddress {
                    person: person.display_name().to_owned(),
                });
            }
        }
        if !self.thresholds().is_ordered() {
            warnings.push(ConfigWarning::ThresholdOrder {
                critical: self.critical_battery_threshold,
                low: self.low_battery_threshold,
            });
        }
        if parse_timezone(&self.timezone).is_err() {
            warnings.push(ConfigWarning::UnknownTimezone(self.timezone.clone()));
        }
        if parse_check_time(&self.check_time).is_err() {
            warnings.push(ConfigWarning::InvalidCheckTime(self.check_time.clone()));
        }
        warnings
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.critical_battery_threshold, self.low_battery_threshold)
    }

    pub fn tz(&self) -> Tz {
        parse_timezone(&self.timezone).unwrap_or(DEFAULT_TIMEZONE)
    }

    pub fn check_time(&self) -> NaiveTime {
        parse_check_time(&self.check_time)
            .or_else(|_| parse_check_time(DEFAULT_CHECK_TIME))
            .unwrap_or(NaiveTime::MIN)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.exclude.iter().cloned(), &self.level_exclusion_terms)
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.classifier(), self.thresholds())
    }
}
