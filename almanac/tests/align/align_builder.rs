use almanac::{Almanac, AlmanacConfig, AlmanacError, JoinPolicy};

use crate::helpers::{dynamic, req};

#[test]
fn build_requires_a_join_policy() {
    let (c, _ctl) = dynamic();
    let err = Almanac::builder().with_connector(c).build().err().unwrap();
    match err {
        AlmanacError::InvalidArg(msg) => assert!(msg.contains("join policy")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn build_requires_a_connector() {
    let err = Almanac::builder()
        .join_policy(JoinPolicy::Outer)
        .build()
        .err()
        .unwrap();
    match err {
        AlmanacError::InvalidArg(msg) => assert!(msg.contains("no connectors")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn config_supplies_the_join_policy() {
    let (c, _ctl) = dynamic();
    let almanac = Almanac::builder()
        .config(AlmanacConfig::new(JoinPolicy::Inner))
        .with_connector(c)
        .build()
        .unwrap();
    assert_eq!(almanac.config().join_policy, JoinPolicy::Inner);
    assert!(almanac.config().cache.is_none());
}

#[test]
fn duplicate_ids_are_rejected() {
    let (c, _ctl) = dynamic();
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .build()
        .unwrap();

    let err = almanac
        .align()
        .series(&[req("A", "X"), req("A", "Y")])
        .err()
        .unwrap();
    assert_eq!(err, AlmanacError::DuplicateSeries { id: "A".into() });

    let err = almanac
        .align()
        .add_series(req("A", "X"))
        .unwrap()
        .add_series(req("A", "Z"))
        .err()
        .unwrap();
    assert!(matches!(err, AlmanacError::DuplicateSeries { .. }));
}

#[tokio::test]
async fn empty_request_list_is_invalid() {
    let (c, _ctl) = dynamic();
    let almanac = Almanac::builder()
        .with_connector(c)
        .join_policy(JoinPolicy::Outer)
        .build()
        .unwrap();
    let err = almanac.align().run().await.unwrap_err();
    assert!(matches!(err, AlmanacError::InvalidArg(_)));
}
