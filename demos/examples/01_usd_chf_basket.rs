use almanac::{Almanac, JoinPolicy};
use almanac_demos::common::{basket_window, get_connectors, init_tracing, usd_chf_basket};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // 1. Outer join keeps every month of the combined span and forward-fills.
    let mut builder = Almanac::builder().join_policy(JoinPolicy::Outer);
    for c in get_connectors() {
        builder = builder.with_connector(c);
    }
    let almanac = builder.build()?;

    let window = basket_window()?;
    let report = almanac
        .align()
        .series(&usd_chf_basket())?
        .window(window)
        .run()
        .await?;

    // 2. The table itself.
    println!("## Aligned table ({} months)", report.table.len());
    print!("{}", report.table.to_csv_string()?);

    // 3. What each column looked like before resampling.
    println!("\n## Columns");
    println!(
        "{:<12} | {:<16} | {:<12} | {:>6} | {:>6}",
        "Series", "Symbol", "Cadence", "Obs", "Cells"
    );
    for c in &report.columns {
        println!(
            "{:<12} | {:<16} | {:<12} | {:>6} | {:>6}",
            c.id.as_str(),
            c.symbol,
            format!("{:?}", c.cadence),
            c.observations,
            c.present_cells
        );
    }
    for w in &report.warnings {
        println!("warning: {w}");
    }

    // 4. Correlation of USD/CHF with everything else.
    let corr = report.table.correlation_matrix();
    println!("\n## Correlation with USDCHF");
    for id in corr.ids() {
        match corr.get("USDCHF", id.as_str()) {
            Some(r) => println!("{:<12} {r:>7.3}", id.as_str()),
            None => println!("{:<12} {:>7}", id.as_str(), "n/a"),
        }
    }

    // 5. Trendline of USD/CHF against the US policy rate.
    if let Some(fit) = report.table.trendline("US_RATE", "USDCHF") {
        println!(
            "\nUSDCHF = {:.4} * US_RATE + {:.4}  (r2 = {:.3}, n = {})",
            fit.slope, fit.intercept, fit.r_squared, fit.n
        );
    }

    Ok(())
}
