use almanac::{Almanac, Availability, FillPolicy, JoinPolicy};
use almanac_mock::MockBehavior;

use crate::helpers::{dynamic, m, req, series, window};

async fn scripted(join: JoinPolicy, fill: FillPolicy) -> Almanac {
    let (c, ctl) = dynamic();
    ctl.set_behavior(
        "SYM_A",
        MockBehavior::Return(series("raw", &[("2020-01-15", 1.0), ("2020-03-10", 3.0)])),
    )
    .await;
    ctl.set_behavior(
        "SYM_B",
        MockBehavior::Return(series("raw", &[("2020-02-03", 20.0)])),
    )
    .await;
    Almanac::builder()
        .with_connector(c)
        .join_policy(join)
        .fill_policy(fill)
        .build()
        .unwrap()
}

#[tokio::test]
async fn outer_join_forward_fills_both_series() {
    let almanac = scripted(JoinPolicy::Outer, FillPolicy::LastObserved).await;
    let report = almanac
        .align()
        .series(&[req("B", "SYM_B"), req("A", "SYM_A")])
        .unwrap()
        .run()
        .await
        .unwrap();

    let t = &report.table;
    assert_eq!(t.months(), &[m("2020-01"), m("2020-02"), m("2020-03")]);
    let ids: Vec<&str> = t.column_ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert_eq!(t.get(m("2020-01"), "A"), Some(1.0));
    assert_eq!(t.get(m("2020-01"), "B"), None);
    assert_eq!(t.get(m("2020-02"), "A"), Some(1.0));
    assert_eq!(t.get(m("2020-02"), "B"), Some(20.0));
    assert_eq!(t.get(m("2020-03"), "A"), Some(3.0));
    assert_eq!(t.get(m("2020-03"), "B"), Some(20.0));

    assert!(report.warnings.is_empty());
    let a = report.column("A").unwrap();
    assert_eq!(a.symbol, "SYM_A");
    assert_eq!(a.provider, "dyn-mock");
    assert_eq!(a.observations, 2);
    assert_eq!(a.present_cells, 3);
}

#[tokio::test]
async fn inner_join_keeps_only_the_shared_month() {
    let almanac = scripted(JoinPolicy::Inner, FillPolicy::LastObserved).await;
    let report = almanac
        .align()
        .series(&[req("A", "SYM_A"), req("B", "SYM_B")])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.table.months(), &[m("2020-02")]);
    assert_eq!(report.table.get(m("2020-02"), "A"), Some(1.0));
    assert_eq!(report.table.get(m("2020-02"), "B"), Some(20.0));
}

#[tokio::test]
async fn no_fill_leaves_gaps_absent() {
    let almanac = scripted(JoinPolicy::Outer, FillPolicy::None).await;
    let report = almanac
        .align()
        .series(&[req("A", "SYM_A"), req("B", "SYM_B")])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.table.get(m("2020-02"), "A"), None);
    assert_eq!(report.table.get(m("2020-03"), "B"), None);
    assert_eq!(report.column("A").unwrap().present_cells, 2);
}

#[tokio::test]
async fn empty_series_is_an_all_absent_column() {
    let (c, ctl) = dynamic();
    ctl.set_behavior(
        "SYM_A",
        MockBehavior::Return(series("raw", &[("2020-01-15", 1.0), ("2020-02-10", 2.0)])),
    )
    .await;
    ctl.set_behavior("NOTHING", MockBehavior::Return(series("raw", &[])))
        .await;
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Inner)
        .build()
        .unwrap();

    let report = almanac
        .align()
        .series(&[req("A", "SYM_A"), req("E", "NOTHING")])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.table.len(), 2);
    let e = report.table.column("E").unwrap();
    assert!(e.values().iter().all(Option::is_none));
    assert_eq!(e.availability(), &Availability::Empty);
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn window_fixes_the_grid() {
    let almanac = scripted(JoinPolicy::Outer, FillPolicy::LastObserved).await;
    let report = almanac
        .align()
        .series(&[req("A", "SYM_A"), req("B", "SYM_B")])
        .unwrap()
        .window(window("2020-02", "2020-05"))
        .run()
        .await
        .unwrap();

    let t = &report.table;
    assert_eq!(t.len(), 4);
    assert_eq!(t.months().first(), Some(&m("2020-02")));
    assert_eq!(t.months().last(), Some(&m("2020-05")));
    // The mock clips to the window, so A has nothing to carry into February.
    assert_eq!(t.get(m("2020-02"), "A"), None);
    assert_eq!(t.get(m("2020-05"), "A"), Some(3.0));
    assert_eq!(t.get(m("2020-05"), "B"), Some(20.0));
}
