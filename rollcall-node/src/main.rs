use anyhow::{Context, Result};
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use rollcall::NodeAddress;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

mod sub;

#[derive(Subcommand, Debug)]
enum Sub {
    /// Run a membership process.
    Run(sub::run::CommandArgs),
    /// Ask a running process to add or remove a member.
    Submit(sub::submit::CommandArgs),
}

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    sub: Sub,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();
    match args.sub {
        Sub::Run(args) => {
            sub::run::run(args).await?;
        }
        Sub::Submit(args) => {
            sub::submit::run(args).await?;
        }
    }

    Ok(())
}

/// Resolve `host` to the address of its control port.
/// `host` may carry its own port.
async fn resolve(host: &str, port: u16) -> Result<NodeAddress> {
    if let Ok(addr) = host.parse::<SocketAddr>() {
        return Ok(NodeAddress::new(addr));
    }
    let mut addrs = if host.contains(':') {
        tokio::net::lookup_host(host).await.map(|a| a.collect::<Vec<_>>())
    } else {
        tokio::net::lookup_host((host, port)).await.map(|a| a.collect::<Vec<_>>())
    }
    .with_context(|| format!("failed to resolve {host}"))?
    .into_iter();
    let addr = addrs
        .next()
        .with_context(|| format!("{host} has no address"))?;
    Ok(NodeAddress::new(addr))
}
