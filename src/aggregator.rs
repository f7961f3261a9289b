use crate::{
    classifier::{Classifier, EntityKind},
    threshold::{evaluate_binary, LevelEvaluation, Severity, Thresholds},
    DeviceState, Snapshot,
};

pub const FINDING_BULLET: &str = "• ";
pub const CRITICAL_BINARY_PHRASE: &str = "KRITISK LÅG BATTERI";
pub const LOW_BINARY_PHRASE: &str = "Lågt batteri";

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFinding {
    pub entity_id: String,
    pub name: String,
    pub severity: Severity,
    pub description: String,
}

/// Findings of one scan, each list in identifier order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatteryReport {
    pub critical: Vec<DeviceFinding>,
    pub low: Vec<DeviceFinding>,
}

impl BatteryReport {
    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.low.is_empty()
    }

    fn push(&mut self, finding: DeviceFinding) {
        match finding.severity {
            Severity::Critical => self.critical.push(finding),
            Severity::Low => self.low.push(finding),
            Severity::Normal => {}
        }
    }
}

/// Renders a battery level, `5` instead of `5.0` for whole numbers. A unit other than `%`
/// is printed in place of the percent sign (`3.1V`).
pub fn format_level(level: f64, unit: Option<&str>) -> String {
    match unit {
        Some(unit) if !unit.is_empty() && unit != "%" => format!("{level}{unit}"),
        _ => format!("{level}%"),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    classifier: Classifier,
    thresholds: Thresholds,
}

impl Aggregator {
    pub fn new(classifier: Classifier, thresholds: Thresholds) -> Self {
        Self {
            classifier,
            thresholds,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn aggregate(&self, snapshot: &Snapshot) -> BatteryReport {
        let mut report = BatteryReport::default();
        for (entity_id, device) in snapshot.iter() {
            if self.classifier.is_excluded(entity_id) {
                log::debug!("Skipping excluded entity: {}", entity_id);
                continue;
            }
            let finding = match self.classifier.classify(entity_id, device) {
                EntityKind::PowerLevelReport => self.check_level(entity_id, device),
                EntityKind::BinaryLowIndicator => check_binary(entity_id, device),
                EntityKind::Irrelevant => None,
            };
            if let Some(finding) = finding {
                report.push(finding);
            }
        }
        report
    }

    fn check_level(&self, entity_id: &str, device: &DeviceState) -> Option<DeviceFinding> {
        let unit = device.unit();
        match self.thresholds.evaluate_level(&device.reading()) {
            LevelEvaluation::Unavailable => None,
            LevelEvaluation::Unparseable => {
                log::debug!(
                    "Could not parse battery level for {}: {:?}",
                    entity_id,
                    device.state
                );
                None
            }
            LevelEvaluation::Level { level, severity } => {
                log::debug!("* {} = {}{}", entity_id, level, unit.unwrap_or_default());
                if !severity.is_reportable() {
                    return None;
                }
                let name = device.display_name(entity_id);
                let rendered = format_level(level, unit);
                log::info!("{:?} battery detected for {}: {}", severity, name, rendered);
                Some(DeviceFinding {
                    entity_id: entity_id.to_owned(),
                    name: name.to_owned(),
                    severity,
                    description: format!("{FINDING_BULLET}{name}: {rendered}"),
                })
            }
        }
    }
}

fn check_binary(entity_id: &str, device: &DeviceState) -> Option<DeviceFinding> {
    let severity = evaluate_binary(entity_id, &device.reading());
    let phrase = match severity {
        Severity::Critical => CRITICAL_BINARY_PHRASE,
        Severity::Low => LOW_BINARY_PHRASE,
        Severity::Normal => return None,
    };
    let name = device.display_name(entity_id);
    log::info!("{:?} battery detected for {} (binary sensor)", severity, name);
    Some(DeviceFinding {
        entity_id: entity_id.to_owned(),
        name: name.to_owned(),
        severity,
        description: format!("{FINDING_BULLET}{name}: {phrase}"),
    })
}
