use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use nowplaying_core::Pipeline;
use nowplaying_daemon::config::{
    BridgeConfig, DEFAULT_BRANCH, DEFAULT_ENDPOINT, DEFAULT_RECONNECT_DELAY_MS, DEFAULT_REMOTE,
    DEFAULT_STATUS_FILE,
};
use nowplaying_daemon::{FeedListener, GitSink};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "nowplaying-daemon",
    version,
    about = "Commit now-playing updates from a WebSocket feed to git"
)]
struct Cli {
    /// WebSocket feed URL.
    #[arg(long, env = "NOWPLAYING_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Working tree to commit the status file in. Created and initialized if missing.
    #[arg(long, env = "NOWPLAYING_REPO_DIR", default_value = ".")]
    repo_dir: PathBuf,

    /// Status file name inside the repo dir.
    #[arg(long, env = "NOWPLAYING_STATUS_FILE", default_value = DEFAULT_STATUS_FILE)]
    status_file: String,

    /// Remote to push to, if registered.
    #[arg(long, env = "NOWPLAYING_REMOTE", default_value = DEFAULT_REMOTE)]
    remote: String,

    /// Branch created on init and pushed.
    #[arg(long, env = "NOWPLAYING_BRANCH", default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Commit author name (defaults to git's configured identity).
    #[arg(long, env = "NOWPLAYING_AUTHOR_NAME")]
    author_name: Option<String>,

    /// Commit author email (defaults to git's configured identity).
    #[arg(long, env = "NOWPLAYING_AUTHOR_EMAIL")]
    author_email: Option<String>,

    /// Delay before reconnecting after the feed drops, in milliseconds.
    #[arg(
        long,
        env = "NOWPLAYING_RECONNECT_DELAY_MS",
        default_value_t = DEFAULT_RECONNECT_DELAY_MS
    )]
    reconnect_delay_ms: u64,

    /// Log level (env-filter syntax).
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // wss:// needs a process-wide crypto provider; an Err means one is already set
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cwd = std::env::current_dir()?;
    let config = BridgeConfig {
        endpoint: cli.endpoint,
        repo_dir: make_abs(&cwd, &cli.repo_dir),
        status_file: cli.status_file,
        remote: cli.remote,
        branch: cli.branch,
        author_name: cli.author_name,
        author_email: cli.author_email,
        reconnect_delay: Duration::from_millis(cli.reconnect_delay_ms),
    };
    info!("starting with config: {:?}", config);

    let mut pipeline = Pipeline::new(GitSink::new(&config));
    let listener = FeedListener::new(&config);

    tokio::select! {
        _ = listener.run(&mut pipeline) => {}
        _ = shutdown_signal() => {}
    }

    Ok(())
}

fn make_abs(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
