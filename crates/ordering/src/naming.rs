//! Filenames produced by PageShot.

use std::path::Path;

/// Filename for a captured page: `{base}_{page:04}.{ext}`.
///
/// Pages past 9999 simply grow wider; zero padding is a minimum.
pub fn page_file_name(base: &str, page: u32, extension: &str) -> String {
    format!("{base}_{page:04}.{}", extension.trim_start_matches('.'))
}

/// Default document name for a source folder: the folder's own name with a
/// `.pdf` extension, or `output.pdf` when the folder has no usable name.
pub fn default_document_name(folder: &Path) -> String {
    folder
        .components()
        .next_back()
        .and_then(|component| match component {
            std::path::Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .map(|name| format!("{name}.pdf"))
        .unwrap_or_else(|| "output.pdf".to_string())
}
