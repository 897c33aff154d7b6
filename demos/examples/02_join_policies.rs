use almanac::{Almanac, JoinPolicy, SeriesRequest};
use almanac_demos::common::{get_connectors, init_tracing, usd_chf_basket};

async fn run(join: JoinPolicy, requests: &[SeriesRequest]) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Almanac::builder().join_policy(join);
    for c in get_connectors() {
        builder = builder.with_connector(c);
    }
    let almanac = builder.build()?;
    let report = almanac.align().series(requests)?.run().await?;

    let months = report.table.months();
    match (months.first(), months.last()) {
        (Some(first), Some(last)) => println!(
            "{join:?}: {} rows from {first} to {last}",
            report.table.len()
        ),
        _ => println!("{join:?}: no rows"),
    }
    for c in report.table.missing_columns() {
        println!("  missing column: {}", c.id());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Quarterly GDP against monthly FX: compare how the two joins shape the grid.
    let requests: Vec<SeriesRequest> = usd_chf_basket()
        .into_iter()
        .filter(|r| matches!(r.id.as_str(), "USDCHF" | "CH_GDP" | "US_CPI"))
        .collect();

    run(JoinPolicy::Outer, &requests).await?;
    run(JoinPolicy::Inner, &requests).await?;
    Ok(())
}
