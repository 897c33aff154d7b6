use std::sync::Arc;
use std::time::Duration;

use almanac::{Almanac, AlmanacError, CacheConfig, JoinPolicy, UnavailablePolicy};
use almanac_mock::MockBehavior;

use crate::helpers::{SlowCounter, dynamic, req, series};

fn cache(ttl: Duration) -> CacheConfig {
    CacheConfig {
        ttl,
        max_entries: 16,
    }
}

#[tokio::test]
async fn repeated_run_is_served_from_the_cache() {
    let (c, ctl) = dynamic();
    ctl.set_behavior("X", MockBehavior::Return(series("raw", &[("2020-01-01", 1.0)])))
        .await;
    ctl.set_behavior("Y", MockBehavior::Return(series("raw", &[("2020-02-01", 2.0)])))
        .await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .cache(cache(Duration::from_secs(60)))
        .build()
        .unwrap();

    let first = almanac
        .align()
        .series(&[req("A", "X"), req("B", "Y")])
        .unwrap()
        .run()
        .await
        .unwrap();
    // Same set, different order: same canonical key.
    let second = almanac
        .align()
        .series(&[req("B", "Y"), req("A", "X")])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(ctl.calls("X").await, 1);
    assert_eq!(ctl.calls("Y").await, 1);

    // A different window is a different key.
    let _ = almanac
        .align()
        .series(&[req("A", "X"), req("B", "Y")])
        .unwrap()
        .window(crate::helpers::window("2020-01", "2020-06"))
        .run()
        .await
        .unwrap();
    assert_eq!(ctl.calls("X").await, 2);
}

#[tokio::test]
async fn expired_entries_are_recomputed() {
    let (c, ctl) = dynamic();
    ctl.set_behavior("X", MockBehavior::Return(series("raw", &[("2020-01-01", 1.0)])))
        .await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .cache(cache(Duration::from_millis(50)))
        .build()
        .unwrap();

    let run = || async {
        almanac
            .align()
            .series(&[req("A", "X")])
            .unwrap()
            .run()
            .await
            .unwrap()
    };
    run().await;
    run().await;
    assert_eq!(ctl.calls("X").await, 1);

    tokio::time::sleep(Duration::from_millis(120)).await;
    run().await;
    assert_eq!(ctl.calls("X").await, 2);
}

#[tokio::test]
async fn zero_ttl_always_recomputes() {
    let (c, ctl) = dynamic();
    ctl.set_behavior("X", MockBehavior::Return(series("raw", &[("2020-01-01", 1.0)])))
        .await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Inner)
        .cache(cache(Duration::ZERO))
        .build()
        .unwrap();

    for _ in 0..3 {
        almanac
            .align()
            .series(&[req("A", "X")])
            .unwrap()
            .run()
            .await
            .unwrap();
    }
    assert_eq!(ctl.calls("X").await, 3);
}

#[tokio::test]
async fn failed_runs_are_not_cached() {
    let (c, ctl) = dynamic();
    ctl.set_behavior("X", MockBehavior::Fail(AlmanacError::Other("boom".into())))
        .await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .unavailable_policy(UnavailablePolicy::Fail)
        .cache(cache(Duration::from_secs(60)))
        .build()
        .unwrap();

    let err = almanac
        .align()
        .series(&[req("A", "X")])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, AlmanacError::Connector { .. }));

    ctl.set_behavior("X", MockBehavior::Return(series("raw", &[("2020-01-01", 1.0)])))
        .await;
    let report = almanac
        .align()
        .series(&[req("A", "X")])
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(report.table.len(), 1);
    assert_eq!(ctl.calls("X").await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_runs_compute_once() {
    let slow = SlowCounter::new(Duration::from_millis(100));
    let almanac = Arc::new(
        Almanac::builder()
            .with_connector(slow.clone())
            .join_policy(JoinPolicy::Outer)
            .cache(cache(Duration::from_secs(60)))
            .build()
            .unwrap(),
    );

    let mut handles = Vec::new();
    for _ in 0..8 {
        let almanac = Arc::clone(&almanac);
        handles.push(tokio::spawn(async move {
            almanac
                .align()
                .series(&[req("A", "X"), req("B", "Y")])
                .unwrap()
                .run()
                .await
                .unwrap()
        }));
    }
    let mut reports = Vec::new();
    for h in handles {
        reports.push(h.await.unwrap());
    }

    assert_eq!(slow.calls(), 2);
    assert!(reports.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[tokio::test]
async fn reports_degraded_by_a_provider_failure_are_not_kept() {
    let (c, ctl) = dynamic();
    ctl.set_behavior("X", MockBehavior::Return(series("raw", &[("2020-01-01", 1.0)])))
        .await;
    ctl.set_behavior(
        "Y",
        MockBehavior::Fail(AlmanacError::connector("dyn-mock", "HTTP 503: unavailable")),
    )
    .await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .unavailable_policy(UnavailablePolicy::MarkMissing)
        .cache(cache(Duration::from_secs(60)))
        .build()
        .unwrap();
    let run = || async {
        almanac
            .align()
            .series(&[req("A", "X"), req("B", "Y")])
            .unwrap()
            .run()
            .await
            .unwrap()
    };

    let degraded = run().await;
    assert_eq!(degraded.warnings.len(), 1);
    run().await;
    assert_eq!(ctl.calls("Y").await, 2);

    // Once the provider recovers the full report is cached as usual.
    ctl.set_behavior("Y", MockBehavior::Return(series("raw", &[("2020-01-01", 2.0)])))
        .await;
    let healthy = run().await;
    assert!(healthy.warnings.is_empty());
    let again = run().await;
    assert!(Arc::ptr_eq(&healthy, &again));
    assert_eq!(ctl.calls("Y").await, 3);
}

#[tokio::test]
async fn reports_with_only_unknown_symbols_stay_cached() {
    let (c, ctl) = dynamic();
    ctl.set_behavior("X", MockBehavior::Return(series("raw", &[("2020-01-01", 1.0)])))
        .await;
    ctl.set_behavior("Y", MockBehavior::Fail(AlmanacError::not_found("series Y")))
        .await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .unavailable_policy(UnavailablePolicy::MarkMissing)
        .cache(cache(Duration::from_secs(60)))
        .build()
        .unwrap();

    let first = almanac
        .align()
        .series(&[req("A", "X"), req("B", "Y")])
        .unwrap()
        .run()
        .await
        .unwrap();
    let second = almanac
        .align()
        .series(&[req("A", "X"), req("B", "Y")])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(first.warnings.len(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(ctl.calls("Y").await, 1);
}
