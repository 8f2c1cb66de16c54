// src/cli.rs

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Rotates the Hanabi live wallpaper with a random video from a folder. Scans recursively by default.",
    long_about = None
)]
pub struct Cli {
    /// Folder containing the wallpaper videos (supports ~ expansion).
    #[clap(short, long)]
    pub folder: Option<String>,

    /// Seconds to wait between rotations.
    #[clap(short, long)]
    pub interval: Option<u64>,

    /// Recognized video extension (repeatable, e.g. -e mp4 -e webm).
    #[clap(short = 'e', long = "extension")]
    pub extensions: Vec<String>,

    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub non_recursive: bool,

    /// Rotate once and exit instead of looping forever.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub once: bool,

    /// Path to a JSON config file (defaults to the platform config directory).
    #[clap(long)]
    pub config: Option<String>,
}
