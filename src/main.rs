//! Headless host (default binary).
//!
//! Reads JSON commands from stdin, writes JSON events to stdout and logs to
//! stderr. See [`tetrislogic::adapter`] for the protocol.

use anyhow::Result;

use tetrislogic::adapter::{run, FileStore, HostConfig};
use tetrislogic::core::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = HostConfig::from_env();
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    match config.high_score_path.clone() {
        Some(path) => {
            eprintln!("[Host] High score file: {}", path.display());
            run(config, FileStore::new(path), stdin, stdout).await
        }
        None => run(config, MemoryStore::new(), stdin, stdout).await,
    }
}
