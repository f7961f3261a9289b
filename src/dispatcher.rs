use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{CooldownStatus, CooldownStore, DeliveryError, NotificationMessage, Recipient};

pub const IGNORE_VERB: &str = "ignore";
pub const IGNORE_ACTION_TITLE: &str = "Ignorera 3d";

/// A button attached to a notification; pressing it sends `action` back as an action event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

impl NotificationAction {
    pub fn ignore(instance: &str, address: &str) -> Self {
        Self {
            action: format!("{instance}.{IGNORE_VERB}.{address}"),
            title: IGNORE_ACTION_TITLE.to_owned(),
        }
    }
}

/// What a channel receives for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub actions: Vec<NotificationAction>,
}

pub trait NotificationChannel
where
    Self: Send + Sync,
{
    fn deliver(
        &self,
        address: &str,
        notification: &Notification<'_>,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub suppressed: usize,
    pub failed: usize,
    /// Recipients without a delivery address
    pub skipped: usize,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}

/// Sends `message` to every recipient whose cooldown allows it and records the send time.
///
/// Failures are logged and leave the recipient's cooldown untouched so the next scan retries.
pub async fn dispatch<C>(
    channel: &C,
    instance: &str,
    message: &NotificationMessage,
    recipients: &[Recipient],
    cooldowns: &mut CooldownStore,
    now: DateTime<Utc>,
) -> DispatchReport
where
    C: NotificationChannel,
{
    let mut report = DispatchReport::default();
    for recipient in recipients {
        let Some(address) = recipient.address() else {
            log::warn!(
                "Missing notify address for person: {}",
                recipient.display_name()
            );
            report.skipped += 1;
            continue;
        };

        match cooldowns.status(address, recipient.cooldown, now) {
            CooldownStatus::Ready => {}
            CooldownStatus::Cooling { elapsed_secs } => {
                log::debug!(
                    "Cooldown activated for {}, last msg sent {}s ago",
                    address,
                    elapsed_secs
                );
                report.suppressed += 1;
                continue;
            }
            CooldownStatus::Ignored { until } => {
                log::debug!("Notifications to {} ignored until {}", address, until);
                report.suppressed += 1;
                continue;
            }
        }

        let notification = Notification {
            title: message.title(),
            message: message.body(),
            actions: vec![NotificationAction::ignore(instance, address)],
        };
        match channel.deliver(address, &notification).await {
            Ok(()) => {
                cooldowns.store(address, now);
                report.sent += 1;
                log::debug!("Notification sent to {}", address);
            }
            Err(err) => {
                report.failed += 1;
                log::error!("Failed to send notification to {}: {}", address, err);
            }
        }
    }
    report
}
