use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::constants::{DEFAULT_SERVER, FADE_DURATION, FADE_STEPS, LOCAL_CACHE, VIEW_TIME};
use crate::state::Timing;

/// Fullscreen image slideshow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Folder of images to show (default: the local cache, refreshed from the server)
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Index of the monitor to display on (default: first secondary monitor)
    #[arg(short = 'm', long = "monitor", value_name = "N")]
    pub monitor: Option<usize>,

    /// Playlist server base URL
    #[arg(short = 's', long = "server", value_name = "URL", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Directory downloaded images are cached in
    #[arg(long = "cache-dir", value_name = "DIR", default_value = LOCAL_CACHE)]
    pub cache_dir: PathBuf,

    /// Do not contact the server, show whatever is already in the folder
    #[arg(long = "offline")]
    pub offline: bool,

    /// Seconds each image stays fully visible
    #[arg(long = "view-time", value_name = "SECS", default_value_t = VIEW_TIME.as_secs_f64())]
    pub view_time: f64,

    /// Seconds a fade out (or in) takes
    #[arg(long = "fade-duration", value_name = "SECS", default_value_t = FADE_DURATION.as_secs_f64())]
    pub fade_duration: f64,

    /// Opacity updates per fade
    #[arg(long = "fade-steps", value_name = "N", default_value_t = FADE_STEPS,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub fade_steps: u32,

    /// Write the log to a file instead of stderr
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase logging verbosity (default: info, -v: debug, -vv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    /// The folder the slideshow reads from.
    pub fn image_folder(&self) -> PathBuf {
        self.folder.clone().unwrap_or_else(|| self.cache_dir.clone())
    }

    /// Only the cache is ever cleared and refilled; a user folder is shown as is.
    pub fn should_fetch(&self) -> bool {
        !self.offline && self.folder.as_ref().is_none_or(|folder| same_dir(folder, &self.cache_dir))
    }

    pub fn timing(&self) -> Timing {
        Timing {
            view_time: seconds(self.view_time),
            fade_duration: seconds(self.fade_duration),
            fade_steps: self.fade_steps,
        }
    }
}

/// Resolves both paths when they exist; otherwise compares them with `.` segments
/// and trailing separators ignored, since the cache may not be created yet.
fn same_dir(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(a), fs::canonicalize(b)) {
        return a == b;
    }
    let lexical = |path: &Path| -> PathBuf {
        path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
    };
    lexical(a) == lexical(b)
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or(Duration::ZERO)
}
