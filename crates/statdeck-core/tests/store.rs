//! CounterStore / Series behavior: alignment, ingestion, retention, startup.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use statdeck_core::store::{MESSAGES_MODULE, PROCESS_MODULE};
use statdeck_core::{
    Color, CounterStore, DisplayMode, Point, Registration, StatEvent, StoreConfig, Timestamp,
};

const MINUTE: i64 = 60_000;
// multiple of five minutes
const T0: i64 = 1_700_000_100_000;

fn at(minutes: i64) -> Timestamp {
    Timestamp::from_millis(T0 + minutes * MINUTE)
}

fn store(window_count: usize) -> CounterStore {
    CounterStore::new(StoreConfig {
        granularity: Duration::from_secs(300),
        window_count,
    })
    .unwrap()
}

#[test]
fn alignment_is_epoch_anchored() {
    let g = Duration::from_secs(300);
    assert_eq!(at(0).align(g), at(0));
    assert_eq!(at(4).align(g), at(0));
    assert_eq!(at(5).align(g), at(5));
    assert_eq!(Timestamp::from_millis(299_999).align(g), Timestamp::EPOCH);
    // pre-epoch instants still floor downwards
    assert_eq!(Timestamp::from_millis(-1).align(g), Timestamp::from_millis(-300_000));
}

#[test]
fn same_window_resolves_same_bucket() {
    let mut s = store(100);
    s.register("Msgs", "Bot", Color::from("blue"), DisplayMode::Line);
    let series = s.find_exact_mut("Msgs", "Bot").unwrap();

    series.resolve_bucket(at(1)).add_count(2);
    series.resolve_bucket(at(4)).add_count(5);

    assert_eq!(series.bucket_count(), 1);
    assert_eq!(series.resolve_bucket(Timestamp::from_millis(T0 + 1)).count(), 7);
    assert_eq!(series.resolve_bucket(at(2)).start(), at(0));
}

#[test]
fn ingestion_is_additive_in_any_order() {
    let mut a = store(100);
    let mut b = store(100);
    for s in [&mut a, &mut b] {
        s.register("Msgs", "Bot", Color::default(), DisplayMode::Line);
    }

    for (d, m) in [(1, 0), (4, 1), (7, 3)] {
        assert!(a.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(d), at(m)));
    }
    for (d, m) in [(7, 3), (1, 4), (4, 2)] {
        assert!(b.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(d), at(m)));
    }

    assert_eq!(a.find_exact("Msgs", "Bot").unwrap().count_at(at(0)), Some(12));
    assert_eq!(b.find_exact("Msgs", "Bot").unwrap().count_at(at(0)), Some(12));
}

#[test]
fn unknown_series_is_dropped_not_created() {
    let mut s = store(100);
    assert!(!s.ingest_at(&StatEvent::new("Nope", "Bot"), at(0)));
    assert!(s.is_empty());
    assert!(s.find_exact("Nope", "Bot").is_none());
}

#[test]
fn negative_delta_lowers_count() {
    let mut s = store(100);
    s.register("Msgs", "Bot", Color::default(), DisplayMode::Line);
    s.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(5), at(0));
    s.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(-2), at(1));
    assert_eq!(s.find_exact("Msgs", "Bot").unwrap().count_at(at(0)), Some(3));
}

#[test]
fn identity_is_case_sensitive() {
    let mut s = store(100);
    s.register("Msgs", "Bot", Color::default(), DisplayMode::Line);
    assert!(s.find_exact("msgs", "Bot").is_none());
    assert!(s.find_exact("Msgs", "bot").is_none());
    assert!(!s.ingest_at(&StatEvent::new("msgs", "Bot"), at(0)));
}

#[test]
fn reregistration_updates_display_only() {
    let mut s = store(100);
    assert_eq!(
        s.register("Msgs", "Bot", Color::from("blue"), DisplayMode::Line),
        Registration::Created
    );
    s.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(4), at(0));

    assert_eq!(
        s.register("Msgs", "Bot", Color::from("red"), DisplayMode::Bar),
        Registration::Updated
    );
    assert_eq!(
        s.register("Msgs", "Bot", Color::from("green"), DisplayMode::Line),
        Registration::Updated
    );

    assert_eq!(s.len(), 1);
    let series = s.find_exact("Msgs", "Bot").unwrap();
    assert_eq!(series.color().as_str(), "green");
    assert_eq!(series.mode(), DisplayMode::Line);
    assert_eq!(series.bucket_count(), 1);
    assert_eq!(series.count_at(at(0)), Some(4));
}

#[test]
fn windowed_scenario_builds_points_and_materializes_reads() {
    let g = Duration::from_secs(300);
    let mut s = store(3);
    s.register("Msgs", "Bot", Color::default(), DisplayMode::Line);

    s.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(2), at(0));
    let series = s.find_exact("Msgs", "Bot").unwrap();
    assert_eq!(series.count_at(at(1)), Some(2));

    s.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(3), at(6));

    let series = s.find_exact_mut("Msgs", "Bot").unwrap();
    assert_eq!(series.count_at(at(-4)), None);
    assert_eq!(series.bucket_count(), 2);

    let points = series.build_points(at(6), 3, g);
    assert_eq!(
        points,
        vec![
            Point { offset_minutes: 0.0, value: 3 },
            Point { offset_minutes: -5.0, value: 2 },
            Point { offset_minutes: -10.0, value: 0 },
        ]
    );

    // the read left an empty bucket behind
    assert_eq!(series.bucket_count(), 3);
    assert_eq!(series.count_at(at(-4)), Some(0));
}

#[test]
fn housekeeping_bounds_retention() {
    let mut s = store(3);
    s.register("Msgs", "Bot", Color::default(), DisplayMode::Line);
    s.register("Errors", "Bot", Color::default(), DisplayMode::Bar);
    for m in (0..60).step_by(5) {
        s.ingest_at(&StatEvent::new("Msgs", "Bot"), at(m));
        s.ingest_at(&StatEvent::new("Errors", "Bot"), at(m + 2));
    }

    let now = at(57);
    s.house_keeping_at(now);

    let cutoff = now.saturating_sub(s.config().retention());
    for series in s.series() {
        assert!(series.bucket_count() > 0);
        for b in series.buckets() {
            assert!(b.start() >= cutoff, "{} kept {}", series.key(), b.start());
        }
    }
    // windows starting at 45, 50, 55 survive a cutoff of 42
    assert_eq!(s.find_exact("Msgs", "Bot").unwrap().bucket_count(), 3);

    // stable now: a second sweep changes nothing
    s.house_keeping_at(now);
    assert_eq!(s.find_exact("Msgs", "Bot").unwrap().bucket_count(), 3);
}

#[test]
fn housekeeping_keeps_bucket_on_cutoff() {
    let mut s = store(3);
    s.register("Msgs", "Bot", Color::default(), DisplayMode::Line);
    s.ingest_at(&StatEvent::new("Msgs", "Bot"), at(0));
    s.ingest_at(&StatEvent::new("Msgs", "Bot"), at(-5));

    // cutoff lands exactly on the window starting at 0
    s.house_keeping_at(at(15));
    let series = s.find_exact("Msgs", "Bot").unwrap();
    assert_eq!(series.count_at(at(0)), Some(1));
    assert_eq!(series.count_at(at(-5)), None);
}

#[test]
fn startup_seeds_default_series() {
    let s = CounterStore::started(StoreConfig::default(), at(0)).unwrap();
    assert_eq!(s.len(), 3);

    let startup = s.find_exact("Startup", PROCESS_MODULE).unwrap();
    assert_eq!(startup.mode(), DisplayMode::Bar);
    assert_eq!(startup.count_at(at(0)), Some(1));

    assert!(s.find_exact("Incoming Msgs", MESSAGES_MODULE).is_some());
    assert!(s.find_exact("Outgoing Msgs", MESSAGES_MODULE).is_some());
}

#[test]
fn config_is_validated() {
    let zero_windows = StoreConfig {
        granularity: Duration::from_secs(300),
        window_count: 0,
    };
    let err = CounterStore::new(zero_windows).unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_REQUEST");

    let tiny = StoreConfig {
        granularity: Duration::from_millis(10),
        window_count: 3,
    };
    assert!(CounterStore::new(tiny).is_err());

    assert_eq!(
        StoreConfig::default().retention(),
        Duration::from_secs(300 * 100)
    );
}
