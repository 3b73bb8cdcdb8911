use anyhow::{Context, Result};
use clap::Parser;
use metricsfetcher::{
    args_parse::Args,
    metrics::{client::MetricsConfig, PrometheusClient},
    Fetcher, FetcherConfig, PublishOutcome, Publisher,
};
use metricsfetcher_store::{CoordinationStorage, MemoryStore, ZooKeeperStore};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!(error = format!("{:#}", e), "metricsfetcher failed");
        return Err(e);
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config: FetcherConfig = args.try_into().context("invalid configuration")?;

    let source = PrometheusClient::new(MetricsConfig {
        base_url: config.prometheus_url.clone(),
        timeout: config.query_timeout,
    })
    .context("Error creating Prometheus client")?;

    // A dry run never touches the store, so it does not need a session.
    let store = if config.dry_run {
        info!("dry run, zookeeper will not be contacted");
        CoordinationStorage::InMemory(MemoryStore::new())
    } else {
        CoordinationStorage::ZooKeeper(
            ZooKeeperStore::connect(&config.store_address, config.session_timeout)
                .await
                .context("Error creating zookeeper connection")?,
        )
    };

    let publisher = Publisher::new(
        store.clone(),
        config.store_address.chroot.clone(),
        config.compression,
    );
    let fetcher = Fetcher::new(source, publisher, config);

    let result = fetcher.run().await;

    if let Err(e) = store.close().await {
        error!(error = %e, "unable to close zookeeper session");
    }

    let summary = result.context("Failed to process data")?;
    match summary.outcome {
        PublishOutcome::DryRun { report } => print!("{}", report),
        PublishOutcome::Written { paths } => {
            info!(
                brokers = summary.brokers,
                topics = summary.topics,
                partitions = summary.partitions,
                paths = ?paths,
                "metrics published"
            );
        }
    }

    Ok(())
}
