use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    ops::{Deref, DerefMut},
};

pub const ATTR_FRIENDLY_NAME: &str = "friendly_name";
pub const ATTR_UNIT_OF_MEASUREMENT: &str = "unit_of_measurement";
pub const ATTR_DEVICE_CLASS: &str = "device_class";

pub const STATE_UNAVAILABLE: &str = "unavailable";
pub const STATE_UNKNOWN: &str = "unknown";
pub const STATE_ON: &str = "on";

pub type Attributes = HashMap<String, serde_json::Value>;

/// The current reading of a device as reported by the state source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading<'a> {
    /// `unavailable`, `unknown` or no state at all
    Unavailable,
    Value(&'a str),
}

impl<'a> Reading<'a> {
    pub fn from_state(state: Option<&'a str>) -> Self {
        match state {
            None | Some(STATE_UNAVAILABLE) | Some(STATE_UNKNOWN) => Reading::Unavailable,
            Some(value) => Reading::Value(value),
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Reading::Value(STATE_ON))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceState {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl DeviceState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn reading(&self) -> Reading<'_> {
        Reading::from_state(self.state.as_deref())
    }

    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    pub fn device_class(&self) -> Option<&str> {
        self.attribute_str(ATTR_DEVICE_CLASS)
    }

    pub fn unit(&self) -> Option<&str> {
        self.attribute_str(ATTR_UNIT_OF_MEASUREMENT)
    }

    /// The friendly name if the device has one, the identifier otherwise.
    pub fn display_name<'a>(&'a self, entity_id: &'a str) -> &'a str {
        self.attribute_str(ATTR_FRIENDLY_NAME).unwrap_or(entity_id)
    }
}

/// All device states of one scan, keyed and ordered by entity identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot(BTreeMap<String, DeviceState>);

impl Deref for Snapshot {
    type Target = BTreeMap<String, DeviceState>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Snapshot {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, entity_id: impl Into<String>, state: DeviceState) -> Self {
        self.0.insert(entity_id.into(), state);
        self
    }
}

impl FromIterator<(String, DeviceState)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, DeviceState)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<HashMap<String, DeviceState>> for Snapshot {
    fn from(states: HashMap<String, DeviceState>) -> Self {
        states.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_sentinels() {
        assert_eq!(Reading::from_state(None), Reading::Unavailable);
        assert_eq!(Reading::from_state(Some("unknown")), Reading::Unavailable);
        assert_eq!(Reading::from_state(Some("unavailable")), Reading::Unavailable);
        assert_eq!(Reading::from_state(Some("42")), Reading::Value("42"));
        assert!(Reading::from_state(Some("on")).is_on());
        assert!(!Reading::from_state(Some("off")).is_on());
    }

    #[test]
    fn test_display_name_falls_back_to_identifier() {
        let named = DeviceState::new("5").with_attribute(ATTR_FRIENDLY_NAME, "Door sensor");
        assert_eq!(named.display_name("sensor.door"), "Door sensor");

        let unnamed = DeviceState::new("5");
        assert_eq!(unnamed.display_name("sensor.door"), "sensor.door");
    }

    #[test]
    fn test_snapshot_iterates_in_identifier_order() {
        let snapshot: Snapshot = HashMap::from([
            ("sensor.c".to_string(), DeviceState::new("1")),
            ("binary_sensor.z".to_string(), DeviceState::new("on")),
            ("sensor.a".to_string(), DeviceState::new("2")),
        ])
        .into();
        let keys: Vec<&str> = snapshot.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["binary_sensor.z", "sensor.a", "sensor.c"]);
    }
}
