//! Unit tests for the alert scheduler

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, FixedOffset, TimeZone, Timelike};
use scalptrix::core::scheduler::{self, resume_cursor, AlertJob, AlertScheduler, ScheduleEntry};
use scalptrix::models::instrument::AssetClass;

fn wib() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

fn default_entries() -> Vec<ScheduleEntry> {
    vec![
        ScheduleEntry::new(AssetClass::Equities, 8, 55, "PRE-MARKET"),
        ScheduleEntry::new(AssetClass::Equities, 10, 30, "SESSION 1"),
        ScheduleEntry::new(AssetClass::Crypto, 12, 0, "MIDDAY"),
        ScheduleEntry::new(AssetClass::Equities, 15, 30, "CLOSING"),
        ScheduleEntry::new(AssetClass::Crypto, 16, 30, "AFTERNOON"),
    ]
}

struct CountingJob(AtomicUsize);

#[async_trait]
impl AlertJob for CountingJob {
    async fn run(&self, _entry: &ScheduleEntry) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_next_due_in_fixed_offset() {
    let scheduler = AlertScheduler::new(default_entries(), wib()).unwrap();
    let cursor = wib().with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();

    let (at, due) = scheduler.next_due(&cursor).unwrap();
    assert_eq!((at.hour(), at.minute()), (10, 30));
    assert_eq!(at.offset().local_minus_utc(), 7 * 3600);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].session, "SESSION 1");
}

#[test]
fn test_next_due_is_strictly_after_cursor() {
    let scheduler = AlertScheduler::new(default_entries(), wib()).unwrap();
    let cursor = wib().with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

    let (at, due) = scheduler.next_due(&cursor).unwrap();
    assert_eq!((at.hour(), at.minute()), (15, 30));
    assert_eq!(due[0].asset_class, AssetClass::Equities);
}

#[test]
fn test_next_due_wraps_to_next_day() {
    let scheduler = AlertScheduler::new(default_entries(), wib()).unwrap();
    let cursor = wib().with_ymd_and_hms(2024, 3, 5, 17, 0, 0).unwrap();

    let (at, _) = scheduler.next_due(&cursor).unwrap();
    assert_eq!(at.day(), 6);
    assert_eq!((at.hour(), at.minute()), (8, 55));
}

#[test]
fn test_entries_at_same_time_fire_together() {
    let entries = vec![
        ScheduleEntry::new(AssetClass::Equities, 12, 0, "NOON EQ"),
        ScheduleEntry::new(AssetClass::Crypto, 12, 0, "NOON CRYPTO"),
    ];
    let scheduler = AlertScheduler::new(entries, wib()).unwrap();
    let cursor = wib().with_ymd_and_hms(2024, 3, 5, 11, 0, 0).unwrap();

    let (_, due) = scheduler.next_due(&cursor).unwrap();
    assert_eq!(due.len(), 2);
}

#[test]
fn test_resume_keeps_entries_due_during_a_long_run() {
    let scheduler = AlertScheduler::new(default_entries(), wib()).unwrap();
    let fired = wib().with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();

    let quick = wib().with_ymd_and_hms(2024, 3, 5, 10, 31, 0).unwrap();
    assert_eq!(resume_cursor(fired, quick), fired);

    // The 12:00 entry came due two minutes ago and still fires.
    let slow = wib().with_ymd_and_hms(2024, 3, 5, 12, 2, 0).unwrap();
    let (at, due) = scheduler.next_due(&resume_cursor(fired, slow)).unwrap();
    assert_eq!((at.hour(), at.minute()), (12, 0));
    assert_eq!(due[0].session, "MIDDAY");
}

#[test]
fn test_resume_skips_stale_entries_after_a_stall() {
    let scheduler = AlertScheduler::new(default_entries(), wib()).unwrap();
    let fired = wib().with_ymd_and_hms(2024, 3, 5, 8, 55, 0).unwrap();
    let now = wib().with_ymd_and_hms(2024, 3, 5, 16, 32, 0).unwrap();

    let cursor = resume_cursor(fired, now);
    assert!(cursor > fired);

    // 10:30, 12:00 and 15:30 are dropped; only the slot inside the grace window fires.
    let (at, due) = scheduler.next_due(&cursor).unwrap();
    assert_eq!((at.hour(), at.minute()), (16, 30));
    assert_eq!(due[0].session, "AFTERNOON");

    let (at, _) = scheduler.next_due(&at).unwrap();
    assert_eq!((at.day(), at.hour(), at.minute()), (6, 8, 55));
}

#[test]
fn test_status_lists_entries() {
    let scheduler = AlertScheduler::new(default_entries(), wib()).unwrap();
    let status = scheduler.status();

    assert!(!status.started);
    assert_eq!(status.utc_offset, "+07:00");
    assert_eq!(status.entries.len(), 5);
    assert_eq!(status.entries[0].time, "08:55");
    assert!(status.entries.iter().all(|e| e.next_run.is_some()));
}

#[tokio::test]
async fn test_start_is_idempotent() {
    let scheduler = Arc::new(AlertScheduler::new(default_entries(), wib()).unwrap());
    let job = Arc::new(CountingJob(AtomicUsize::new(0)));

    assert!(scheduler.start(job.clone()).await);
    assert!(!scheduler.start(job.clone()).await);
    assert!(scheduler.is_started());

    scheduler.stop().await;
    assert!(!scheduler.is_started());
    assert_eq!(job.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_global_init_returns_same_instance() {
    let job = Arc::new(CountingJob(AtomicUsize::new(0)));

    let first = scheduler::init(default_entries(), wib(), job.clone()).await.unwrap();
    let second = scheduler::init(Vec::new(), wib(), job.clone()).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.is_started());
    assert_eq!(second.entries().count(), 5);
    assert!(scheduler::global().is_some());
}
