use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use ureq::Agent;

use crate::constants::HTTP_TIMEOUT;
use crate::error::FetchError;

/// One item of the server playlist. Fields other than `filepath` are ignored.
#[derive(Debug, Deserialize)]
pub struct PlaylistEntry {
    pub filepath: Option<String>,
}

/// Mirrors the server playlist into a local cache directory.
pub struct Fetcher {
    server: String,
    cache_dir: PathBuf,
    agent: Agent,
}

impl Fetcher {
    pub fn new(server: &str, cache_dir: impl Into<PathBuf>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(HTTP_TIMEOUT))
            .build()
            .into();

        Self {
            server: server.trim_end_matches('/').to_string(),
            cache_dir: cache_dir.into(),
            agent,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Empties the cache directory, creating it first if needed.
    pub fn clear_cache(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let mut removed = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            removed += 1;
        }

        debug!("Cleared {} stale entries from {}", removed, self.cache_dir.display());
        Ok(())
    }

    /// Filenames listed by the server. Any failure is logged and yields an empty list.
    pub fn fetch_playlist(&self) -> Vec<String> {
        match self.request_playlist() {
            Ok(entries) => entries
                .into_iter()
                .filter_map(|entry| {
                    if entry.filepath.is_none() {
                        warn!("Skipping playlist entry without a filepath");
                    }
                    entry.filepath
                })
                .collect(),
            Err(e) => {
                warn!("Could not fetch playlist from {}: {}", self.server, e);
                Vec::new()
            }
        }
    }

    fn request_playlist(&self) -> Result<Vec<PlaylistEntry>, FetchError> {
        let url = format!("{}/api/playlist", self.server);
        let mut response = self.agent.get(&url).call()?;
        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Downloads a single file into the cache. Failures are logged and swallowed.
    pub fn download_image(&self, filename: &str) -> bool {
        match self.try_download(filename) {
            Ok(path) => {
                debug!("Cached {}", path.display());
                true
            }
            Err(e) => {
                warn!("Could not download {}: {}", filename, e);
                false
            }
        }
    }

    fn try_download(&self, filename: &str) -> Result<PathBuf, FetchError> {
        if !is_safe_filename(filename) {
            return Err(FetchError::UnsafeFilename(filename.to_string()));
        }

        let url = format!("{}/api/download/{}", self.server, encode_path_segment(filename));
        let response = self.agent.get(&url).call()?;

        // Write next to the target and rename, so a broken transfer never leaves a half image behind
        let dest_path = self.cache_dir.join(filename);
        let part_path = self.cache_dir.join(format!("{}.part", filename));

        let written = fs::File::create(&part_path).and_then(|mut dest| {
            let mut reader = response.into_body().into_reader();
            io::copy(&mut reader, &mut dest)
        });

        match written.and_then(|_| fs::rename(&part_path, &dest_path)) {
            Ok(()) => Ok(dest_path),
            Err(e) => {
                let _ = fs::remove_file(&part_path);
                Err(e.into())
            }
        }
    }

    /// Fetches the playlist and downloads every entry in order. Returns how many files were stored.
    pub fn download_playlist(&self) -> usize {
        let filenames = self.fetch_playlist();
        info!("Playlist lists {} file(s)", filenames.len());

        let stored = filenames
            .iter()
            .filter(|filename| self.download_image(filename))
            .count();

        info!("Downloaded {}/{} file(s) into {}", stored, filenames.len(), self.cache_dir.display());
        stored
    }
}

/// A bare file name: no directories, no parent references, not absolute.
fn is_safe_filename(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
