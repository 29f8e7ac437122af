use std::path::PathBuf;

use clap::Parser;

/// Monthly calendar diary for the terminal.
#[derive(Parser)]
#[command(name = "diary_calendar", version, about = "Monthly calendar diary for the terminal")]
pub struct Args {
    /// Directory holding the diary store and log file (defaults to the
    /// platform data directory).
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Explicit `--data-dir` wins; otherwise a `diary-calendar` directory
    /// under the platform data dir, falling back to the working directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("diary-calendar"),
        }
    }
}
