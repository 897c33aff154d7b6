use almanac::{
    Almanac, AlmanacError, Availability, ConnectorKey, JoinPolicy, SeriesRequest,
    UnavailablePolicy,
};
use almanac_mock::MockBehavior;

use crate::helpers::{dynamic, m, req, series};

async fn with_failing_b(policy: UnavailablePolicy) -> Almanac {
    let (c, ctl) = dynamic();
    ctl.set_behavior(
        "SYM_A",
        MockBehavior::Return(series("raw", &[("2020-01-15", 1.0), ("2020-03-10", 3.0)])),
    )
    .await;
    ctl.set_behavior(
        "SYM_B",
        MockBehavior::Fail(AlmanacError::connector("dyn-mock", "HTTP 503: unavailable")),
    )
    .await;
    ctl.set_behavior(
        "SYM_C",
        MockBehavior::Missing("FRED_API_KEY is not set".into()),
    )
    .await;
    Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .unavailable_policy(policy)
        .build()
        .unwrap()
}

#[tokio::test]
async fn mark_missing_degrades_failures_and_records_warnings() {
    let almanac = with_failing_b(UnavailablePolicy::MarkMissing).await;
    let report = almanac
        .align()
        .series(&[req("A", "SYM_A"), req("B", "SYM_B"), req("C", "SYM_C")])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.table.len(), 3);
    assert_eq!(report.table.get(m("2020-02"), "A"), Some(1.0));

    let b = report.table.column("B").unwrap();
    assert!(b.values().iter().all(Option::is_none));
    match b.availability() {
        Availability::Missing { reason } => assert!(reason.contains("HTTP 503")),
        other => panic!("unexpected: {other:?}"),
    }

    // A connector-provided marker is data, not a failure.
    let c = report.column("C").unwrap();
    assert!(matches!(c.availability, Availability::Missing { .. }));
    assert_eq!(c.present_cells, 0);

    assert_eq!(
        report.warnings,
        vec![AlmanacError::connector("dyn-mock", "HTTP 503: unavailable")]
    );
    let missing: Vec<&str> = report
        .table
        .missing_columns()
        .map(|c| c.id().as_str())
        .collect();
    assert_eq!(missing, vec!["B", "C"]);
}

#[tokio::test]
async fn fail_policy_propagates_the_provider_error() {
    let almanac = with_failing_b(UnavailablePolicy::Fail).await;
    let err = almanac
        .align()
        .series(&[req("A", "SYM_A"), req("B", "SYM_B")])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AlmanacError::connector("dyn-mock", "HTTP 503: unavailable")
    );
}

#[tokio::test]
async fn fail_policy_still_accepts_connector_missing_markers() {
    let almanac = with_failing_b(UnavailablePolicy::Fail).await;
    let report = almanac
        .align()
        .series(&[req("A", "SYM_A"), req("C", "SYM_C")])
        .unwrap()
        .run()
        .await
        .unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.table.missing_columns().count(), 1);
}

#[tokio::test]
async fn unknown_provider_follows_the_unavailable_policy() {
    let ghost = SeriesRequest::new("G", ConnectorKey::new("nowhere"), "X");

    let almanac = with_failing_b(UnavailablePolicy::MarkMissing).await;
    let report = almanac
        .align()
        .series(&[req("A", "SYM_A"), ghost.clone()])
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(
        report.warnings,
        vec![AlmanacError::UnknownProvider {
            provider: "nowhere".into()
        }]
    );
    assert_eq!(report.column("G").unwrap().present_cells, 0);

    let almanac = with_failing_b(UnavailablePolicy::Fail).await;
    let err = almanac
        .align()
        .series(&[req("A", "SYM_A"), ghost])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, AlmanacError::UnknownProvider { .. }));
}

#[tokio::test]
async fn untagged_errors_are_attributed_to_the_connector() {
    let (c, ctl) = dynamic();
    ctl.set_behavior(
        "BAD",
        MockBehavior::Fail(AlmanacError::Data("unparseable date".into())),
    )
    .await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .build()
        .unwrap();
    let report = almanac
        .align()
        .series(&[req("X", "BAD")])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(report.table.is_empty());
    match &report.warnings[..] {
        [AlmanacError::Connector { connector, msg }] => {
            assert_eq!(connector, "dyn-mock");
            assert!(msg.contains("unparseable date"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn windowed_run_keeps_its_grid_when_every_series_is_unavailable() {
    let almanac = with_failing_b(UnavailablePolicy::MarkMissing).await;
    let report = almanac
        .align()
        .series(&[req("B", "SYM_B"), req("C", "SYM_C")])
        .unwrap()
        .window(crate::helpers::window("2020-01", "2020-06"))
        .run()
        .await
        .unwrap();

    assert_eq!(report.table.len(), 6);
    assert_eq!(report.table.months().first(), Some(&m("2020-01")));
    assert_eq!(report.table.missing_columns().count(), 2);
    assert_eq!(report.warnings.len(), 1);
}
