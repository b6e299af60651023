//! HTTP front end for the partial-path index.
//!
//! Lifecycle: configure the store, build the initial index, start the
//! refresher, serve until interrupted, then stop the server and refresher.

pub mod config;
pub mod server;

use std::fs::File;
use std::sync::Arc;

use anyhow::Context;

use pkgpaths::{spawn_refresher, IndexStore, SourceDirClassifier};

use crate::config::{ExclusionSource, ServerConfig, DEFAULT_EXCLUSIONS};
use crate::server::Server;

/// Creates a store configured with the roots, exclusions and classifier of
/// `config`. The store is not built yet.
pub fn build_store(config: &ServerConfig) -> anyhow::Result<IndexStore> {
    let store = IndexStore::new(SourceDirClassifier::new(&config.extensions));
    store
        .set_roots(&config.roots)
        .context("invalid root directory")?;

    match &config.exclusions {
        ExclusionSource::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("unable to open exclusion file {}", path.display()))?;
            store
                .set_exclusions_from_reader(file)
                .with_context(|| format!("unable to read exclusion file {}", path.display()))?;
        }
        ExclusionSource::Default => {
            store.set_exclusions(DEFAULT_EXCLUSIONS.split_whitespace());
        }
    }
    Ok(store)
}

/// Runs the server until Ctrl-C.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let store = Arc::new(build_store(&config)?);
    log::info!(
        "indexing roots {:?} excluding {:?}",
        store.roots(),
        store.exclusions()
    );

    let initial = store.clone();
    tokio::task::spawn_blocking(move || initial.rebuild())
        .await
        .context("initial index build failed")?;

    let refresher = spawn_refresher(store.clone(), config.refresh_interval)
        .context("unable to start index refresher")?;

    let mut server = Server::bind(config.http_addr.as_str(), store)
        .await
        .with_context(|| format!("unable to listen on {}", config.http_addr))?;
    log::info!("listening on http://{}", server.addr());

    tokio::signal::ctrl_c()
        .await
        .context("unable to wait for shutdown signal")?;
    log::info!("shutting down");

    server.shutdown().map_err(anyhow::Error::msg)?;
    server.stopped().await;
    tokio::task::spawn_blocking(move || refresher.shutdown())
        .await
        .context("index refresher did not stop cleanly")?;
    Ok(())
}
