use clap::Parser;

use pkgpaths_server::config::{Cli, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_cli(Cli::parse())?;
    pkgpaths_server::run(config).await
}
