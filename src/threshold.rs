use serde::{Deserialize, Serialize};

use crate::Reading;

pub const DEFAULT_LOW_THRESHOLD: f64 = 20.0;
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 10.0;
pub const CRITICAL_BINARY_TERM: &str = "islow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Normal,
    Low,
    Critical,
}

impl Severity {
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Severity::Normal)
    }
}

/// Result of evaluating a numeric battery reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelEvaluation {
    Level { level: f64, severity: Severity },
    Unavailable,
    Unparseable,
}

impl LevelEvaluation {
    pub fn severity(&self) -> Severity {
        match self {
            LevelEvaluation::Level { severity, .. } => *severity,
            LevelEvaluation::Unavailable | LevelEvaluation::Unparseable => Severity::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub critical: f64,
    pub low: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical: DEFAULT_CRITICAL_THRESHOLD,
            low: DEFAULT_LOW_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn new(critical: f64, low: f64) -> Self {
        Self { critical, low }
    }

    pub fn is_ordered(&self) -> bool {
        self.critical < self.low
    }

    pub fn severity_of(&self, level: f64) -> Severity {
        if level <= self.critical {
            Severity::Critical
        } else if level <= self.low {
            Severity::Low
        } else {
            Severity::Normal
        }
    }

    pub fn evaluate_level(&self, reading: &Reading) -> LevelEvaluation {
        let Reading::Value(raw) = reading else {
            return LevelEvaluation::Unavailable;
        };
        match raw.trim().parse::<f64>() {
            Ok(level) if !level.is_nan() => LevelEvaluation::Level {
                level,
                severity: self.severity_of(level),
            },
            _ => LevelEvaluation::Unparseable,
        }
    }

    pub fn evaluate(&self, reading: &Reading) -> Severity {
        self.evaluate_level(reading).severity()
    }
}

/// `on` means the indicator reports low power; `islow` sensors are the critical ones.
pub fn evaluate_binary(entity_id: &str, reading: &Reading) -> Severity {
    if !reading.is_on() {
        return Severity::Normal;
    }
    if entity_id.to_lowercase().contains(CRITICAL_BINARY_TERM) {
        Severity::Critical
    } else {
        Severity::Low
    }
}
