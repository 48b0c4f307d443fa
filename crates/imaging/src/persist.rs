//! Writing pages to disk.
//!
//! Pages are encoded fully in memory, written to a `.partial` sibling and
//! renamed into place, so a page file either exists complete or not at all.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use pageshot_common::error::{PageshotError, PageshotResult};

/// Resolve an encoding format from a file extension (`png`, `.jpg`, ...).
pub fn format_for_extension(extension: &str) -> PageshotResult<ImageFormat> {
    let ext = extension.trim_start_matches('.');
    ImageFormat::from_extension(ext)
        .filter(|format| format.writing_enabled())
        .ok_or_else(|| PageshotError::config(format!("Unsupported image extension: {ext}")))
}

/// Encode `image` as `format` and atomically place it at `path`.
/// Returns the number of bytes written.
pub fn save_page(image: &DynamicImage, path: &Path, format: ImageFormat) -> PageshotResult<u64> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|e| PageshotError::encode(format!("Failed to encode {}: {e}", path.display())))?;

    let partial = partial_path(path);
    if let Err(e) = std::fs::write(&partial, &bytes) {
        remove_partial(&partial);
        return Err(PageshotError::write(&partial, e));
    }
    if let Err(e) = std::fs::rename(&partial, path) {
        remove_partial(&partial);
        return Err(PageshotError::write(path, e));
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Page written");
    Ok(bytes.len() as u64)
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.partial"))
}

fn remove_partial(partial: &Path) {
    if let Err(e) = std::fs::remove_file(partial) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %partial.display(), error = %e, "Could not remove partial page");
        }
    }
}
