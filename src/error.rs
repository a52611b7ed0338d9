use std::path::PathBuf;
use thiserror::Error;

/// Conditions that stop the slideshow before the display loop starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("folder not found at '{}'", .0.display())]
    FolderNotFound(PathBuf),

    #[error("no supported images found in '{}'", .0.display())]
    NoImages(PathBuf),

    #[error("invalid monitor index {index} ({count} monitor(s) detected)")]
    MonitorOutOfRange { index: usize, count: usize },

    #[error("no monitors detected")]
    NoMonitors,

    #[error("no images to show")]
    EmptyDeck,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("invalid playlist: {0}")]
    Playlist(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("refusing to store unsafe filename '{0}'")]
    UnsafeFilename(String),
}
