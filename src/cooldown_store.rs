use std::{collections::HashMap, ops::Deref, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    /// Never notified, or the cooldown has elapsed
    Ready,
    /// Last send is more recent than the recipient's cooldown
    Cooling { elapsed_secs: i64 },
    /// An acknowledgement holds notifications back until the given instant
    Ignored { until: DateTime<Utc> },
}

impl CooldownStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, CooldownStatus::Ready)
    }
}

/// Per delivery address, the instant of the last notification or the end of an ignore window.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct CooldownStore(HashMap<String, DateTime<Utc>>);

impl Deref for CooldownStore {
    type Target = HashMap<String, DateTime<Utc>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl CooldownStore {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Records `at` for `address`, returning the instant it replaces.
    pub fn store(&mut self, address: &str, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.0.insert(address.to_owned(), at)
    }

    /// A stored instant in the future always holds notifications back. Otherwise the
    /// recipient's own cooldown applies, and only when it is positive.
    pub fn status(&self, address: &str, cooldown_secs: u64, now: DateTime<Utc>) -> CooldownStatus {
        let Some(last) = self.0.get(address) else {
            return CooldownStatus::Ready;
        };
        if *last > now {
            return CooldownStatus::Ignored { until: *last };
        }
        let elapsed_secs = (now - *last).num_seconds();
        if cooldown_secs > 0 && elapsed_secs < cooldown_secs as i64 {
            CooldownStatus::Cooling { elapsed_secs }
        } else {
            CooldownStatus::Ready
        }
    }
}

pub type SharedCooldownStore = Arc<Mutex<CooldownStore>>;

pub fn new_shared_store() -> SharedCooldownStore {
    Arc::new(Mutex::new(CooldownStore::new()))
}
