use anyhow::Context;
use bitmex_rest::core::config::DEFAULT_ENV_PREFIX;
use bitmex_rest::exchanges::bitmex::Quote;
use bitmex_rest::{BitmexBuilder, ExchangeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let authenticated = config.has_credentials();
    let client = BitmexBuilder::new(config).with_max_attempts(3).build()?;

    println!("Fetching XBTUSD quotes...");
    let quotes = client
        .get_quotes("XBTUSD", 5)
        .await
        .context("fetching quotes")?;
    // Quotes arrive newest first; fold them into one view of the book top
    let mut latest: Option<Quote> = None;
    for quote in &quotes {
        latest = Some(match latest {
            Some(acc) => acc.merge(quote)?,
            None => quote.clone(),
        });
    }
    if let Some(latest) = latest {
        println!(
            "Latest XBTUSD: bid {:?} x {:?} / ask {:?} x {:?} at {}",
            latest.bid_price, latest.bid_size, latest.ask_price, latest.ask_size, latest.timestamp
        );
    }

    if !authenticated {
        println!("No credentials configured; skipping account calls");
        return Ok(());
    }

    let positions = client
        .get_positions(None)
        .await
        .context("fetching positions")?;
    println!("Found {} positions", positions.len());
    for position in &positions {
        println!("  {}: {}", position.symbol, position.current_qty);
    }

    let orders = client
        .get_orders(None, true, Some(20))
        .await
        .context("fetching open orders")?;
    println!("Found {} open orders", orders.len());

    Ok(())
}

fn load_config() -> anyhow::Result<ExchangeConfig> {
    #[cfg(feature = "env-file")]
    let loaded = ExchangeConfig::from_env_file(DEFAULT_ENV_PREFIX);
    #[cfg(not(feature = "env-file"))]
    let loaded = ExchangeConfig::from_env(DEFAULT_ENV_PREFIX);

    match loaded {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!("Credentials unavailable ({}), using read-only testnet access", e);
            Ok(ExchangeConfig::read_only().testnet(true))
        }
    }
}
