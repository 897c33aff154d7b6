use std::sync::Arc;
use std::time::{Duration, Instant};

use almanac::{Almanac, CacheConfig, JoinPolicy};
use almanac_demos::common::{get_connectors, init_tracing, usd_chf_basket};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut builder = Almanac::builder()
        .join_policy(JoinPolicy::Outer)
        .provider_timeout(Duration::from_secs(15))
        .cache(CacheConfig::default());
    for c in get_connectors() {
        builder = builder.with_connector(c);
    }
    let almanac = builder.build()?;
    let basket = usd_chf_basket();

    let started = Instant::now();
    let first = almanac.align().series(&basket)?.run().await?;
    println!("first run:  {:?}", started.elapsed());

    let started = Instant::now();
    let second = almanac.align().series(&basket)?.run().await?;
    println!("second run: {:?}", started.elapsed());

    println!("served from cache: {}", Arc::ptr_eq(&first, &second));
    Ok(())
}
