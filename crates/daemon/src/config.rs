use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "wss://music-display.mck.is/now-playing-ws";
pub const DEFAULT_STATUS_FILE: &str = "now-playing.txt";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// WebSocket feed to listen on.
    pub endpoint: String,
    /// Working tree the status file is committed in.
    pub repo_dir: PathBuf,
    /// Status file name, relative to `repo_dir`.
    pub status_file: String,
    pub remote: String,
    pub branch: String,

    pub author_name: Option<String>,
    pub author_email: Option<String>,

    pub reconnect_delay: Duration,
}

impl BridgeConfig {
    /// Defaults for everything except the repository location.
    pub fn default_for_repo(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            repo_dir: repo_dir.into(),
            status_file: DEFAULT_STATUS_FILE.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            author_name: None,
            author_email: None,
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
        }
    }

    pub fn status_path(&self) -> PathBuf {
        self.repo_dir.join(&self.status_file)
    }
}
