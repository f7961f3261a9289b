use chrono::{DateTime, Days, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{dispatcher::IGNORE_VERB, local_time::resolve_local, CooldownStore, Recipient};

pub const IGNORE_DAYS: u64 = 3;

/// Inbound notification action, as sent back by the notification channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    #[serde(default)]
    pub action: String,
}

impl ActionEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

/// `<namespace>.<verb>.<address>`; the address keeps any further dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionToken<'a> {
    pub namespace: &'a str,
    pub verb: &'a str,
    pub address: &'a str,
}

impl<'a> ActionToken<'a> {
    pub fn parse(token: &'a str) -> Option<Self> {
        let mut parts = token.splitn(3, '.');
        let namespace = parts.next().filter(|s| !s.is_empty())?;
        let verb = parts.next().filter(|s| !s.is_empty())?;
        let address = parts.next().filter(|s| !s.is_empty())?;
        Some(Self {
            namespace,
            verb,
            address,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    Ignored {
        address: String,
        until: DateTime<Utc>,
    },
    /// Token is malformed, for another instance, carries an unknown verb or an address
    /// no recipient is configured with
    NotHandled,
}

/// Start of the local day in `tz`, `IGNORE_DAYS` days ahead.
pub fn ignore_until(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let today = now.with_timezone(tz).date_naive();
    let day = today
        .checked_add_days(Days::new(IGNORE_DAYS))
        .unwrap_or(today);
    resolve_local(tz, day.and_time(NaiveTime::MIN))
}

/// Applies an ignore action to the cooldown store. Only addresses of `recipients` are ever
/// stored, any other token leaves the store untouched.
pub fn handle_action(
    cooldowns: &mut CooldownStore,
    instance: &str,
    tz: &Tz,
    recipients: &[Recipient],
    event: &ActionEvent,
    now: DateTime<Utc>,
) -> AckOutcome {
    let Some(token) = ActionToken::parse(&event.action) else {
        log::trace!("Ignoring malformed action [{}]", event.action);
        return AckOutcome::NotHandled;
    };
    if token.namespace != instance {
        return AckOutcome::NotHandled;
    }
    if token.verb != IGNORE_VERB {
        log::debug!("Unknown action verb [{}] for {}", token.verb, token.address);
        return AckOutcome::NotHandled;
    }
    if !recipients.iter().any(|r| r.address() == Some(token.address)) {
        log::debug!("Ignore action for unknown address [{}]", token.address);
        return AckOutcome::NotHandled;
    }

    let until = ignore_until(now, tz);
    if let Some(last_sent) = cooldowns.store(token.address, until) {
        log::debug!(
            "Ignore window for {} replaces last send at {}",
            token.address,
            last_sent.with_timezone(tz).format("%Y-%m-%d %H:%M")
        );
    }
    log::info!(
        "IGNORE {} until {}",
        token.address,
        until.with_timezone(tz).format("%Y-%m-%d %H:%M")
    );
    AckOutcome::Ignored {
        address: token.address.to_owned(),
        until,
    }
}
