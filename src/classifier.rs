use regex::{RegexSet, RegexSetBuilder};
use std::collections::HashSet;

use crate::{ConfigError, DeviceState};

pub const BATTERY_DEVICE_CLASS: &str = "battery";
pub const BINARY_SENSOR_PREFIX: &str = "binary_sensor.";
pub const BINARY_BATTERY_TERMS: [&str; 4] = ["battery", "batt", "islow", "low_battery"];
pub const DEFAULT_LEVEL_EXCLUSION_TERMS: [&str; 3] = ["charging_status", "recharge", "power"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    PowerLevelReport,
    BinaryLowIndicator,
    Irrelevant,
}

/// Decides which entities of a snapshot carry battery information.
#[derive(Debug, Clone)]
pub struct Classifier {
    exclude: HashSet<String>,
    level_exclusions: RegexSet,
    binary_terms: RegexSet,
}

/// Upper bound for the compiled size of a term matcher.
const TERM_SET_SIZE_LIMIT: usize = 1 << 20;

/// Builds a case insensitive substring matcher for a list of plain terms.
fn term_set<I, S>(terms: I) -> Result<RegexSet, regex::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let patterns: Vec<String> = terms
        .into_iter()
        .map(|t| regex::escape(t.as_ref()))
        .collect();
    RegexSetBuilder::new(&patterns)
        .case_insensitive(true)
        .size_limit(TERM_SET_SIZE_LIMIT)
        .build()
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), DEFAULT_LEVEL_EXCLUSION_TERMS)
    }
}

impl Classifier {
    /// Fails when a term list is too large to compile.
    pub fn try_new<E, T, S>(exclude: E, level_exclusion_terms: T) -> Result<Self, ConfigError>
    where
        E: IntoIterator<Item = String>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            exclude: exclude.into_iter().collect(),
            level_exclusions: term_set(level_exclusion_terms).map_err(ConfigError::Terms)?,
            binary_terms: term_set(BINARY_BATTERY_TERMS).map_err(ConfigError::Terms)?,
        })
    }

    /// Like `try_new`, but a term list that fails to compile is logged and matches nothing.
    pub fn new<E, T, S>(exclude: E, level_exclusion_terms: T) -> Self
    where
        E: IntoIterator<Item = String>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let level_exclusions = term_set(level_exclusion_terms).unwrap_or_else(|err| {
            log::warn!("Companion sensor exclusion disabled: {}", err);
            RegexSet::empty()
        });
        let binary_terms = term_set(BINARY_BATTERY_TERMS).unwrap_or_else(|err| {
            log::warn!("Binary battery sensor detection disabled: {}", err);
            RegexSet::empty()
        });
        Self {
            exclude: exclude.into_iter().collect(),
            level_exclusions,
            binary_terms,
        }
    }

    pub fn is_excluded(&self, entity_id: &str) -> bool {
        self.exclude.contains(entity_id)
    }

    pub fn excluded_count(&self) -> usize {
        self.exclude.len()
    }

    pub fn classify(&self, entity_id: &str, device: &DeviceState) -> EntityKind {
        if self.is_excluded(entity_id) {
            return EntityKind::Irrelevant;
        }
        if device.device_class() == Some(BATTERY_DEVICE_CLASS) {
            // companion sensors (charging state, power draw) share the battery class
            if self.level_exclusions.is_match(entity_id) {
                return EntityKind::Irrelevant;
            }
            return EntityKind::PowerLevelReport;
        }
        if self.is_binary_battery_sensor(entity_id) {
            return EntityKind::BinaryLowIndicator;
        }
        EntityKind::Irrelevant
    }

    pub fn is_binary_battery_sensor(&self, entity_id: &str) -> bool {
        entity_id.starts_with(BINARY_SENSOR_PREFIX) && self.binary_terms.is_match(entity_id)
    }
}
