use std::future::Future;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    acknowledgement::{handle_action, AckOutcome, ActionEvent},
    compose,
    dispatcher::{dispatch, DispatchReport, NotificationChannel},
    new_shared_store, Aggregator, BatteryCheckConfig, BatteryCheckError, BatteryReport,
    CooldownStore, Recipient, SharedCooldownStore, Snapshot, SourceError,
};

/// Provides the current state of all entities.
pub trait SnapshotSource
where
    Self: Send + Sync,
{
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, SourceError>> + Send;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub report: BatteryReport,
    /// `None` when there was nothing to report
    pub dispatch: Option<DispatchReport>,
    /// Recipients skipped because their presence gate was closed
    pub gated: usize,
}

pub struct BatteryCheck<S, C> {
    config: BatteryCheckConfig,
    aggregator: Aggregator,
    tz: Tz,
    source: S,
    channel: C,
    cooldowns: SharedCooldownStore,
}

impl<S, C> BatteryCheck<S, C>
where
    S: SnapshotSource,
    C: NotificationChannel,
{
    pub fn new(config: BatteryCheckConfig, source: S, channel: C) -> Self {
        Self::with_store(config, source, channel, new_shared_store())
    }

    /// Builds the engine around an existing cooldown store, logging every configuration warning.
    pub fn with_store(
        config: BatteryCheckConfig,
        source: S,
        channel: C,
        cooldowns: SharedCooldownStore,
    ) -> Self {
        log::info!("Loading BatteryCheck({})", config.name);
        for warning in config.validate() {
            log::warn!("{}", warning);
        }
        if !config.exclude.is_empty() {
            log::info!(
                "Excluding {} entities from battery monitoring: {:?}",
                config.exclude.len(),
                config.exclude
            );
        }
        Self {
            aggregator: config.aggregator(),
            tz: config.tz(),
            config,
            source,
            channel,
            cooldowns,
        }
    }

    pub fn from_yaml(yaml: &str, source: S, channel: C) -> Result<Self, BatteryCheckError> {
        let config = BatteryCheckConfig::from_yaml_str(yaml)?;
        Ok(Self::new(config, source, channel))
    }

    pub fn config(&self) -> &BatteryCheckConfig {
        &self.config
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn cooldowns(&self) -> &SharedCooldownStore {
        &self.cooldowns
    }

    pub async fn cooldown_snapshot(&self) -> CooldownStore {
        self.cooldowns.lock().await.clone()
    }

    pub async fn run_scan(&self) -> Result<ScanOutcome, BatteryCheckError> {
        self.run_scan_at(Utc::now()).await
    }

    pub async fn run_scan_at(&self, now: DateTime<Utc>) -> Result<ScanOutcome, BatteryCheckError> {
        log::info!("Running daily battery check...");
        let snapshot = self.source.fetch_snapshot().await?;
        let report = self.aggregator.aggregate(&snapshot);

        let Some(message) = compose(&report.critical, &report.low) else {
            log::info!("No low battery devices found");
            return Ok(ScanOutcome {
                report,
                ..Default::default()
            });
        };

        let (present, absent): (Vec<Recipient>, Vec<Recipient>) = self
            .config
            .persons
            .iter()
            .cloned()
            .partition(|r| r.is_present(&snapshot));
        for recipient in &absent {
            log::debug!("Presence gate closed for {}", recipient.display_name());
        }

        // held for the whole dispatch so acknowledgements are applied before or after it
        let dispatch_report = {
            let mut cooldowns = self.cooldowns.lock().await;
            dispatch(
                &self.channel,
                &self.config.name,
                &message,
                &present,
                &mut cooldowns,
                now,
            )
            .await
        };
        log::info!(
            "Sent consolidated battery notification with {} critical and {} low battery devices ({} sent, {} suppressed, {} failed)",
            message.critical_count(),
            message.low_count(),
            dispatch_report.sent,
            dispatch_report.suppressed,
            dispatch_report.failed
        );

        Ok(ScanOutcome {
            report,
            dispatch: Some(dispatch_report),
            gated: absent.len(),
        })
    }

    pub async fn on_action(&self, event: &ActionEvent) -> AckOutcome {
        self.on_action_at(event, Utc::now()).await
    }

    pub async fn on_action_at(&self, event: &ActionEvent, now: DateTime<Utc>) -> AckOutcome {
        let mut cooldowns = self.cooldowns.lock().await;
        handle_action(
            &mut cooldowns,
            &self.config.name,
            &self.tz,
            &self.config.persons,
            event,
            now,
        )
    }
}

#[cfg(feature = "scheduler")]
mod service {
    use tokio::sync::mpsc::Receiver;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::{DailySchedule, ScanTrigger};

    impl<S, C> BatteryCheck<S, C>
    where
        S: SnapshotSource,
        C: NotificationChannel,
    {
        pub fn schedule(&self) -> DailySchedule {
            DailySchedule::new(self.config.check_time(), self.tz)
        }

        /// Handles scan triggers and action events one at a time until cancelled or both
        /// channels are closed. A failed scan is logged and the loop keeps running.
        pub async fn run(
            &self,
            mut triggers: Receiver<ScanTrigger>,
            mut actions: Receiver<ActionEvent>,
            cancel: CancellationToken,
        ) {
            let mut triggers_open = true;
            let mut actions_open = true;
            while triggers_open || actions_open {
                tokio::select! {
                    trigger = triggers.recv(), if triggers_open => match trigger {
                        Some(trigger) => {
                            log::debug!("Scan triggered: {:?}", trigger);
                            if let Err(err) = self.run_scan().await {
                                log::error!("Battery check failed: {}", err);
                            }
                        }
                        None => triggers_open = false,
                    },
                    event = actions.recv(), if actions_open => match event {
                        Some(event) => {
                            self.on_action(&event).await;
                        }
                        None => actions_open = false,
                    },
                    _ = cancel.cancelled() => {
                        log::trace!("Battery check received stop signal. Exiting...");
                        return;
                    }
                }
            }
            log::trace!("Battery check channels closed. Exiting...");
        }
    }
}
