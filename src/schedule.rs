use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::local_time::resolve_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTrigger {
    Startup,
    Daily,
}

/// Fires once a day at a wall clock time in a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub time: NaiveTime,
    pub tz: Tz,
}

impl DailySchedule {
    pub fn new(time: NaiveTime, tz: Tz) -> Self {
        Self { time, tz }
    }

    fn at_date(&self, date: NaiveDate) -> DateTime<Utc> {
        resolve_local(&self.tz, date.and_time(self.time))
    }

    /// First run strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.with_timezone(&self.tz).date_naive();
        let candidate = self.at_date(today);
        if candidate > now {
            return candidate;
        }
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        self.at_date(tomorrow)
    }
}

/// Emits a `Startup` trigger right away and a `Daily` trigger at every scheduled time.
pub fn run_scheduler(
    schedule: DailySchedule,
    sender: mpsc::Sender<ScanTrigger>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::task::spawn(async move {
        if let Err(err) = sender.send(ScanTrigger::Startup).await {
            log::warn!("Error sending startup scan trigger: {}", err);
            return;
        }
        loop {
            let now = Utc::now();
            let next = schedule.next_after(now);
            let delay = (next - now).to_std().unwrap_or_default();
            log::debug!("Next battery check at {}", next.with_timezone(&schedule.tz));
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    log::trace!("Scheduler received stop signal. Exiting...");
                    break;
                }
            }
            if let Err(err) = sender.send(ScanTrigger::Daily).await {
                log::warn!("Error sending scheduled scan trigger: {}", err);
                break;
            }
        }
    })
}
