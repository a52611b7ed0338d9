use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use exif::{In, Reader, Tag, Value};
use image::DynamicImage;
use log::debug;

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::error::StartupError;

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

// --- Helper: Load and Sort Image Paths ---
pub fn load_image_paths(dir_path: &Path) -> Result<Vec<PathBuf>> {
    if !dir_path.is_dir() {
        return Err(StartupError::FolderNotFound(dir_path.to_path_buf()).into());
    }

    let mut paths = Vec::new();
    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory {}", dir_path.display()))?;

    for entry in entries {
        let path = entry.context("Failed to read directory entry")?.path();
        if path.is_file() && is_supported_image(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if paths.is_empty() {
        Err(StartupError::NoImages(dir_path.to_path_buf()).into())
    } else {
        Ok(paths)
    }
}

/// EXIF orientation of a JPEG, 1 (upright) when absent or unreadable.
fn exif_orientation(image_path: &Path, file_bytes: &[u8]) -> u16 {
    let extension = image_path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    if extension != "jpg" && extension != "jpeg" {
        return 1;
    }

    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY).map(|f| &f.value) {
            Some(Value::Short(values)) if !values.is_empty() => values[0],
            _ => 1,
        },
        Err(e) => {
            // Most JPEGs without an EXIF block land here; not worth more than debug
            debug!("No EXIF data for {}: {}", image_path.display(), e);
            1
        }
    }
}

/// Bakes an EXIF orientation (1-8) into the pixels.
pub fn apply_orientation(image: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

// --- Load Image, Apply EXIF Rotation ---
pub fn load_image_with_exif_rotation(image_path: &Path) -> Result<DynamicImage> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("Failed to read file {}", image_path.display()))?;

    let orientation = exif_orientation(image_path, &file_bytes);

    let image = image::load_from_memory(&file_bytes)
        .with_context(|| format!("Failed to decode image data for {}", image_path.display()))?;

    if orientation != 1 {
        debug!("Applying EXIF orientation {} to {}", orientation, image_path.display());
    }
    Ok(apply_orientation(image, orientation))
}
