//! Daily alert scheduler evaluated in a fixed UTC offset.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use cron::Schedule;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::models::instrument::AssetClass;

static SCHEDULER: OnceLock<Arc<AlertScheduler>> = OnceLock::new();

/// Fire times further than this in the past are skipped after a stall.
pub const MISSED_FIRE_GRACE_SECS: i64 = 300;

/// One time-of-day trigger, e.g. equities at 08:55 labelled `PRE-MARKET`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub asset_class: AssetClass,
    pub hour: u32,
    pub minute: u32,
    pub session: String,
}

impl ScheduleEntry {
    pub fn new(asset_class: AssetClass, hour: u32, minute: u32, session: impl Into<String>) -> Self {
        Self {
            asset_class,
            hour,
            minute,
            session: session.into(),
        }
    }

    /// Parse `HH:MM=LABEL`.
    pub fn parse(asset_class: AssetClass, raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidSchedule {
            entry: raw.to_string(),
            reason: reason.to_string(),
        };

        let (time, session) = raw.split_once('=').ok_or_else(|| invalid("expected HH:MM=LABEL"))?;
        let (hour, minute) = time
            .trim()
            .split_once(':')
            .ok_or_else(|| invalid("expected HH:MM"))?;
        let hour: u32 = hour.parse().map_err(|_| invalid("hour is not a number"))?;
        let minute: u32 = minute.parse().map_err(|_| invalid("minute is not a number"))?;
        if hour > 23 || minute > 59 {
            return Err(invalid("time out of range"));
        }
        let session = session.trim();
        if session.is_empty() {
            return Err(invalid("session label is empty"));
        }

        Ok(Self::new(asset_class, hour, minute, session))
    }

    pub fn time_of_day(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    fn cron_expression(&self) -> String {
        format!("0 {} {} * * *", self.minute, self.hour)
    }
}

/// Work triggered by a schedule entry.
#[async_trait]
pub trait AlertJob: Send + Sync {
    async fn run(&self, entry: &ScheduleEntry);
}

struct ScheduledAlert {
    entry: ScheduleEntry,
    schedule: Schedule,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryStatus {
    pub asset_class: AssetClass,
    pub time: String,
    pub session: String,
    pub next_run: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub started: bool,
    pub utc_offset: String,
    pub entries: Vec<EntryStatus>,
}

/// Runs every entry in a single timer loop.
///
/// Entries fire sequentially. The loop resumes from the last fire time, so an
/// entry that came due while another was running fires right after it.
pub struct AlertScheduler {
    alerts: Vec<ScheduledAlert>,
    offset: FixedOffset,
    started: AtomicBool,
    handle: RwLock<Option<tokio::task::JoinHandle<()>>>,
}

impl AlertScheduler {
    pub fn new(entries: Vec<ScheduleEntry>, offset: FixedOffset) -> Result<Self, ConfigError> {
        let alerts = entries
            .into_iter()
            .map(|entry| {
                let expr = entry.cron_expression();
                let schedule = Schedule::from_str(&expr).map_err(|e| ConfigError::InvalidSchedule {
                    entry: entry.time_of_day(),
                    reason: format!("cron expression '{expr}': {e}"),
                })?;
                Ok(ScheduledAlert { entry, schedule })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        info!(
            entries = alerts.len(),
            offset = %offset,
            "AlertScheduler: created"
        );

        Ok(Self {
            alerts,
            offset,
            started: AtomicBool::new(false),
            handle: RwLock::new(None),
        })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.alerts.iter().map(|a| &a.entry)
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Earliest fire time strictly after `cursor` and every entry due then.
    pub fn next_due(
        &self,
        cursor: &DateTime<FixedOffset>,
    ) -> Option<(DateTime<FixedOffset>, Vec<ScheduleEntry>)> {
        let upcoming: Vec<(DateTime<FixedOffset>, &ScheduleEntry)> = self
            .alerts
            .iter()
            .filter_map(|a| a.schedule.after(cursor).next().map(|at| (at, &a.entry)))
            .collect();

        let next = upcoming.iter().map(|(at, _)| *at).min()?;
        let due = upcoming
            .into_iter()
            .filter(|(at, _)| *at == next)
            .map(|(_, entry)| entry.clone())
            .collect();
        Some((next, due))
    }

    pub fn status(&self) -> SchedulerStatus {
        let now = Utc::now().with_timezone(&self.offset);
        SchedulerStatus {
            started: self.is_started(),
            utc_offset: self.offset.to_string(),
            entries: self
                .alerts
                .iter()
                .map(|a| EntryStatus {
                    asset_class: a.entry.asset_class,
                    time: a.entry.time_of_day(),
                    session: a.entry.session.clone(),
                    next_run: a.schedule.after(&now).next(),
                })
                .collect(),
        }
    }

    /// Spawn the timer loop. Returns `false` if it was already running.
    pub async fn start(self: &Arc<Self>, job: Arc<dyn AlertJob>) -> bool {
        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let scheduler = Arc::clone(self);
        let handle = tokio::spawn(async move {
            info!("AlertScheduler: started");
            let mut cursor = Utc::now().with_timezone(&scheduler.offset);

            loop {
                let Some((next, due)) = scheduler.next_due(&cursor) else {
                    warn!("AlertScheduler: no upcoming entries, idling");
                    tokio::time::sleep(tokio::time::Duration::from_secs(3600)).await;
                    continue;
                };

                let now = Utc::now().with_timezone(&scheduler.offset);
                if next > now {
                    let duration = (next - now).to_std().unwrap_or_default();
                    tokio::time::sleep(duration).await;
                }

                for entry in &due {
                    info!(
                        asset_class = %entry.asset_class,
                        session = %entry.session,
                        "AlertScheduler: firing {}",
                        entry.time_of_day()
                    );
                    job.run(entry).await;
                }

                let now = Utc::now().with_timezone(&scheduler.offset);
                cursor = resume_cursor(next, now);
                if cursor > next {
                    warn!(
                        last_fired = %next,
                        resume_from = %cursor,
                        "AlertScheduler: fell behind, skipping stale entries"
                    );
                }
            }
        });

        *self.handle.write().await = Some(handle);
        true
    }

    pub async fn stop(&self) {
        if let Some(h) = self.handle.write().await.take() {
            h.abort();
            self.started.store(false, Ordering::SeqCst);
            info!("AlertScheduler: stopped");
        }
    }
}

/// Where the loop continues after firing at `last_fired`.
///
/// Normally `last_fired`, so entries that came due during a long run still
/// fire. After a suspend or stall, anything older than the grace window is
/// skipped instead of being sent as a burst of stale alerts.
pub fn resume_cursor(
    last_fired: DateTime<FixedOffset>,
    now: DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    last_fired.max(now - Duration::seconds(MISSED_FIRE_GRACE_SECS))
}

/// Start the process-wide scheduler once; later calls return the same instance.
pub async fn init(
    entries: Vec<ScheduleEntry>,
    offset: FixedOffset,
    job: Arc<dyn AlertJob>,
) -> Result<Arc<AlertScheduler>, ConfigError> {
    let scheduler = match SCHEDULER.get() {
        Some(existing) => Arc::clone(existing),
        None => {
            let candidate = Arc::new(AlertScheduler::new(entries, offset)?);
            Arc::clone(SCHEDULER.get_or_init(|| candidate))
        }
    };

    if !scheduler.start(job).await {
        info!("AlertScheduler: already running");
    }
    Ok(scheduler)
}

/// The process-wide scheduler, if [`init`] has run.
pub fn global() -> Option<Arc<AlertScheduler>> {
    SCHEDULER.get().cloned()
}
