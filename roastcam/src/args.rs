use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Roastcam photo roast relay
#[derive(Debug, Parser)]
#[command(name = "roastcam", about = "Upload a photo, get roasted by Gemini")]
pub struct Args {
    /// Path to configuration file (defaults to ./roastcam.toml when present)
    #[arg(short, long, env = "ROASTCAM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "ROASTCAM_LISTEN")]
    pub listen: Option<SocketAddr>,
}
