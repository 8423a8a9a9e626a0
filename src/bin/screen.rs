//! One-shot screening
//!
//! Runs a single screening for `equities` or `crypto` (default: both) and
//! prints the result as JSON. Pass `--send` to deliver the alert as well.

use dotenvy::dotenv;
use scalptrix::config::AppConfig;
use scalptrix::core::bootstrap;
use scalptrix::logging;
use scalptrix::metrics::Metrics;
use scalptrix::models::instrument::AssetClass;
use std::env;
use std::sync::Arc;
use tracing::info;

fn parse_asset_classes(args: &[String]) -> Result<Vec<AssetClass>, String> {
    let named: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();
    if named.is_empty() {
        return Ok(vec![AssetClass::Equities, AssetClass::Crypto]);
    }
    named
        .into_iter()
        .map(|a| match a.as_str() {
            "equities" => Ok(AssetClass::Equities),
            "crypto" => Ok(AssetClass::Crypto),
            other => Err(format!("unknown asset class '{other}', expected equities or crypto")),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let send = args.iter().any(|a| a == "--send");
    let classes = parse_asset_classes(&args)?;

    let config = AppConfig::from_env()?;
    let metrics = Arc::new(Metrics::new()?);
    let components = bootstrap::build(&config, metrics)?;
    let pipeline = components.pipeline;

    for asset_class in classes {
        if send {
            let outcome = pipeline.run_alert(asset_class, "MANUAL").await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            let result = pipeline.screen(asset_class).await;
            info!(
                asset_class = %asset_class,
                method = result.method.id(),
                signals = result.signals.len(),
                "screening finished"
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
