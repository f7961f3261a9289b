use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Snapshot, StateCondition};

/// Gates delivery on the state of another entity, e.g. a person tracker being `home`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PresenceGate {
    pub entity: String,
    pub state: StateCondition,
}

impl PresenceGate {
    pub fn is_open(&self, snapshot: &Snapshot) -> bool {
        let state = snapshot.get(&self.entity).and_then(|d| d.state.as_deref());
        self.state.evaluate_option(state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Recipient {
    #[serde(default)]
    pub name: Option<String>,
    /// Name of the notify service, e.g. `mobile_app_pixel`
    #[serde(default)]
    pub notify: Option<String>,
    /// Seconds between two notifications, 0 disables suppression
    #[serde(default)]
    pub cooldown: u64,
    #[serde(default)]
    pub presence: Option<PresenceGate>,
}

impl Recipient {
    pub fn new(notify: impl Into<String>) -> Self {
        Self {
            notify: Some(notify.into()),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn cooldown(mut self, cooldown: u64) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn presence(mut self, presence: PresenceGate) -> Self {
        self.presence = Some(presence);
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// The delivery address, `None` for missing or blank entries.
    pub fn address(&self) -> Option<&str> {
        self.notify.as_deref().filter(|a| !a.trim().is_empty())
    }

    /// Recipients without a presence gate are always reachable.
    pub fn is_present(&self, snapshot: &Snapshot) -> bool {
        self.presence
            .as_ref()
            .map_or(true, |gate| gate.is_open(snapshot))
    }
}
