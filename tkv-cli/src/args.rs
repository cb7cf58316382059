use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "tkv-client", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the client application config directory.
    #[arg(long, value_parser = non_empty_path)]
    pub config: PathBuf,
}

fn non_empty_path(raw: &str) -> Result<PathBuf, String> {
    if raw.trim().is_empty() {
        return Err("config directory must not be empty".to_string());
    }
    Ok(PathBuf::from(raw))
}
