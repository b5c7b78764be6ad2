use std::path::Path;

use anyhow::{Context, Result};
use llmapi::utils::{detect_mime_type, encode_image_to_base64};
use tokio::fs;
use tokio::fs::try_exists;

use crate::constants::IMAGE_EXTENSIONS;
use crate::error::CaptionerError;
use crate::models::ImageFile;

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Lists the captionable images directly inside `dir`, sorted by file name.
pub async fn scan_image_folder(dir: &Path) -> Result<Vec<ImageFile>, CaptionerError> {
    let read_error = |source: std::io::Error| CaptionerError::ReadFolder {
        path: dir.to_path_buf(),
        source,
    };

    if !try_exists(dir).await.map_err(read_error)? {
        return Err(CaptionerError::FolderNotFound(dir.to_path_buf()));
    }

    let mut entries = fs::read_dir(dir).await.map_err(read_error)?;
    let mut images = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let path = entry.path();
        if !has_image_extension(&path) {
            continue;
        }

        // Follows symlinks, so a linked image still counts.
        let is_file = fs::metadata(&path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if !is_file {
            log::debug!("ignoring non-file entry {}", path.display());
            continue;
        }

        images.push(ImageFile::new(path));
    }

    if images.is_empty() {
        return Err(CaptionerError::NoImages(dir.to_path_buf()));
    }

    images.sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));
    Ok(images)
}

/// Returns the file as base64 plus a MIME type derived from its extension.
pub fn encode_image(path: &Path) -> Result<(String, String)> {
    let data = encode_image_to_base64(path)?;
    Ok((data, detect_mime_type(path)))
}

pub async fn caption_exists(image: &ImageFile) -> Result<bool> {
    let path = image.caption_path();
    try_exists(&path)
        .await
        .with_context(|| format!("Failed to check caption file '{}'", path.display()))
}

pub async fn write_caption_file(image: &ImageFile, caption: &str) -> Result<()> {
    let path = image.caption_path();
    fs::write(&path, caption)
        .await
        .with_context(|| format!("Unable to write caption file '{}'", path.display()))
}
