//! filenode — binding-and-storage coordinator node.

use clap::Parser;
use filenode_server::{run_server, NodeConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "filenode")]
#[command(about = "Binding-and-storage coordinator for a content-addressed file storage node")]
#[command(version)]
struct Args {
    /// Path to a YAML config file. CLI flags and env vars below still
    /// override whatever it sets.
    #[arg(long, env = "FILENODE_CONFIG")]
    config: Option<std::path::PathBuf>,

    #[arg(short = 'H', long, env = "FILENODE_HOST")]
    host: Option<String>,

    #[arg(short, long, env = "FILENODE_PORT")]
    port: Option<u16>,

    #[arg(long, env = "FILENODE_BLOCKSTORE_URL")]
    blockstore_url: Option<String>,

    #[arg(long, env = "FILENODE_QUOTA_AUTHORITY_URL")]
    quota_authority_url: Option<String>,

    #[arg(long, env = "FILENODE_JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Disable authentication. Development only.
    #[arg(long, env = "FILENODE_NO_AUTH")]
    no_auth: bool,

    #[arg(long, env = "FILENODE_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("filenode_server={log_level},tower_http=info").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => NodeConfig::from_file(path)?,
        None => NodeConfig::default(),
    };

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.blockstore_url.is_some() {
        config.blockstore_url = args.blockstore_url;
    }
    if args.quota_authority_url.is_some() {
        config.quota_authority_url = args.quota_authority_url;
    }
    if args.jwt_secret.is_some() {
        config.jwt_secret = args.jwt_secret;
    }
    if args.no_auth {
        config.auth_enabled = false;
    }

    if !config.auth_enabled {
        tracing::warn!("authentication is DISABLED — for development only");
    }
    if config.blockstore_url.is_none() {
        tracing::warn!("no blockstore configured — using in-memory storage");
    }

    run_server(config).await
}
