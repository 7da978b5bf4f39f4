use anyhow::{bail, Context};
use businessnz::{nzbn::SearchQuery, BusinessNzApi, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: businessnz lookup <nzbn> | businessnz search <term>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let default_filter = if config.debug {
        "businessnz=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        message = "Using registry",
        base_url = %config.endpoints.base_url,
    );

    let api = BusinessNzApi::new(config).context("building http client")?;

    let mut args = std::env::args().skip(1);
    let output = match (args.next().as_deref(), args.next()) {
        (Some("lookup"), Some(nzbn)) => {
            let entity = api.nzbn().lookup(&nzbn).await?;
            serde_json::to_string_pretty(&entity)?
        }
        (Some("search"), Some(term)) => {
            let results = api.nzbn().search(&SearchQuery::new(term)).await?;
            serde_json::to_string_pretty(&results)?
        }
        _ => bail!(USAGE),
    };

    println!("{}", output);
    Ok(())
}
