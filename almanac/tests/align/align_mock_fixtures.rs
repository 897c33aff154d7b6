use std::time::Duration;

use almanac::{Almanac, AlmanacError, Availability, Cadence, JoinPolicy};

use crate::helpers::{fixtures, m, mock_req};

#[tokio::test]
async fn macro_basket_aligns_on_the_monthly_grid() {
    let almanac = Almanac::builder()
        .with_connector(fixtures())
        .join_policy(JoinPolicy::Outer)
        .build()
        .unwrap();

    let report = almanac
        .align()
        .series(&[
            mock_req("USDCHF", "CHF=X"),
            mock_req("US_CPI", "CPIAUCSL"),
            mock_req("CH_GDP", "NAEXKP01CHQ657S"),
            mock_req("NOTHING", "EMPTY"),
        ])
        .unwrap()
        .run()
        .await
        .unwrap();

    let t = &report.table;
    assert_eq!(t.len(), 24);
    assert_eq!(t.months().first(), Some(&m("2019-01")));
    assert_eq!(t.months().last(), Some(&m("2020-12")));
    let ids: Vec<&str> = t.column_ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["CH_GDP", "NOTHING", "USDCHF", "US_CPI"]);

    // Quarterly values are carried through the following two months and past the last quarter.
    assert_eq!(t.get(m("2019-02"), "CH_GDP"), Some(0.5));
    assert_eq!(t.get(m("2020-05"), "CH_GDP"), Some(-7.0));
    assert_eq!(t.get(m("2020-12"), "CH_GDP"), Some(0.3));
    assert_eq!(t.get(m("2019-01"), "US_CPI"), Some(252.0));

    let cadence = |id: &str| report.column(id).unwrap().cadence;
    assert_eq!(cadence("USDCHF"), Cadence::SubMonthly);
    assert_eq!(cadence("US_CPI"), Cadence::Monthly);
    assert_eq!(cadence("CH_GDP"), Cadence::Quarterly);
    assert_eq!(cadence("NOTHING"), Cadence::Unknown);

    assert_eq!(report.column("USDCHF").unwrap().present_cells, 24);
    assert_eq!(report.column("NOTHING").unwrap().availability, Availability::Empty);
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn reserved_symbols_degrade_to_missing_columns() {
    let almanac = Almanac::builder()
        .with_connector(fixtures())
        .join_policy(JoinPolicy::Inner)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let report = almanac
        .align()
        .series(&[
            mock_req("FED", "FEDFUNDS"),
            mock_req("BROKEN", "FAIL"),
            mock_req("SLOW", "TIMEOUT"),
            mock_req("GONE", "MISSING"),
            mock_req("TYPO", "NO_SUCH_SERIES"),
        ])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.table.len(), 24);
    assert_eq!(report.table.missing_columns().count(), 4);
    assert_eq!(report.warnings.len(), 3);
    assert!(report.warnings.contains(&AlmanacError::provider_timeout("almanac-mock", "SLOW")));
    assert!(
        report
            .warnings
            .iter()
            .any(|e| matches!(e, AlmanacError::NotFound { .. }))
    );
}
