#[macro_use]
mod macros;

pub mod arguments;
pub mod config;
pub mod error;
pub mod subgraph;
pub mod sushi;
pub mod tags;

pub use self::{config::Config, error::Error, tags::ContractTag};

use {
    crate::{
        arguments::Arguments,
        sushi::{PoolPageFetching, SushiSubgraphClient},
    },
    anyhow::Context,
    clap::Parser,
    tracing::Instrument,
};

/// Produces a tag for every LP token of the Sushi pools on `chain_id`.
///
/// The input is validated before anything goes over the network. All pools
/// are read from the latest block the subgraph has indexed, and any failure
/// along the way aborts the whole run.
pub async fn return_tags(
    config: &Config,
    chain_id: &str,
    api_key: &str,
) -> Result<Vec<ContractTag>, Error> {
    config.validate(chain_id, api_key)?;
    let endpoint = config.endpoint(chain_id, api_key)?;

    let client = SushiSubgraphClient::from_subgraph_url(
        endpoint,
        reqwest::Client::new(),
        config.request_timeout,
    );
    tags_from_subgraph(&client, chain_id)
        .instrument(tracing::info_span!("return_tags", chain_id))
        .await
}

async fn tags_from_subgraph(
    fetcher: &dyn PoolPageFetching,
    chain_id: &str,
) -> Result<Vec<ContractTag>, Error> {
    let block_number = fetcher.block_number().await?;
    let pools = sushi::fetch_all_pools(fetcher, block_number).await?;
    let tags = tags::contract_tags(chain_id, &pools);
    tracing::info!(
        block_number,
        pools = pools.len(),
        tags = tags.len(),
        "generated contract tags"
    );
    Ok(tags)
}

pub async fn start(args: impl Iterator<Item = String>) {
    let args = Arguments::parse_from(args);
    observe::tracing::initialize(&args.log_filter);
    tracing::info!("running contract-tags with validated arguments:\n{}", args);

    match run(args).await {
        Ok(tags) => println!("{tags}"),
        Err(err) => {
            tracing::error!(?err, "failed to generate contract tags");
            std::process::exit(1);
        }
    }
}

async fn run(args: Arguments) -> anyhow::Result<String> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).await?,
        None => Config::reference().context("invalid built-in chain table")?,
    };
    if let Some(timeout) = args.request_timeout {
        config.request_timeout = timeout;
    }

    let tags = return_tags(&config, &args.chain_id, &args.api_key).await?;
    Ok(serde_json::to_string_pretty(&tags)?)
}
