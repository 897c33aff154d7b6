use almanac::{Almanac, JoinPolicy};
use almanac_demos::common::{get_connectors, usd_chf_basket};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,almanac=trace,almanac_fred=trace,almanac_yahoo=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let mut builder = Almanac::builder().join_policy(JoinPolicy::Outer);
    for c in get_connectors() {
        builder = builder.with_connector(c);
    }
    let almanac = builder.build()?;

    let report = almanac.align().series(&usd_chf_basket())?.run().await?;
    tracing::info!(
        rows = report.table.len(),
        columns = report.columns.len(),
        warnings = report.warnings.len(),
        "aligned"
    );
    Ok(())
}
