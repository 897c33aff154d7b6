use std::time::Duration;

use almanac::{Almanac, AlmanacError, JoinPolicy, UnavailablePolicy};
use almanac_mock::MockBehavior;

use crate::helpers::{dynamic, req, series};

#[tokio::test]
async fn hanging_provider_times_out_and_is_marked_missing() {
    let (c, ctl) = dynamic();
    ctl.set_behavior(
        "SYM_A",
        MockBehavior::Return(series("raw", &[("2020-01-15", 1.0)])),
    )
    .await;
    ctl.set_behavior("SLOW", MockBehavior::Hang).await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .provider_timeout(Duration::from_millis(30))
        .build()
        .unwrap();

    let report = almanac
        .align()
        .series(&[req("A", "SYM_A"), req("S", "SLOW")])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.warnings,
        vec![AlmanacError::provider_timeout("dyn-mock", "S")]
    );
    assert_eq!(report.table.len(), 1);
    assert_eq!(report.column("S").unwrap().present_cells, 0);
}

#[tokio::test]
async fn hanging_provider_fails_the_run_under_fail_policy() {
    let (c, ctl) = dynamic();
    ctl.set_behavior("SLOW", MockBehavior::Hang).await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Inner)
        .unavailable_policy(UnavailablePolicy::Fail)
        .provider_timeout(Duration::from_millis(30))
        .build()
        .unwrap();

    let err = almanac
        .align()
        .series(&[req("S", "SLOW")])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, AlmanacError::ProviderTimeout { .. }));
}

#[tokio::test]
async fn request_deadline_bounds_the_whole_fan_out() {
    let (c, ctl) = dynamic();
    ctl.set_behavior("SLOW", MockBehavior::Hang).await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .provider_timeout(Duration::from_secs(5))
        .request_timeout(Duration::from_millis(40))
        .build()
        .unwrap();

    let err = almanac
        .align()
        .series(&[req("S", "SLOW")])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert_eq!(err, AlmanacError::request_timeout("align"));
}

#[test]
fn zero_provider_timeout_is_rejected() {
    let (c, _ctl) = dynamic();
    let err = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .provider_timeout(Duration::ZERO)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, AlmanacError::InvalidArg(_)));
}
