//! Document assembly: scan → normalize → sequence → encode.

use std::path::{Path, PathBuf};

use image::RgbImage;
use pageshot_common::error::{PageshotError, PageshotResult};
use pageshot_imaging::{normalize, PageImage};
use pageshot_ordering::{default_document_name, list_images, FileSet};

use crate::pdf::{PdfWriter, DEFAULT_DPI};

/// A request to build one document from a folder of images.
#[derive(Debug, Clone)]
pub struct AssembleRequest {
    /// Folder holding the page images.
    pub source_dir: PathBuf,

    /// Output PDF. Defaults to `<source_dir>/<folder name>.pdf`.
    pub output: Option<PathBuf>,

    /// Extension of the images to collect.
    pub extension: String,

    /// Resolution recorded for every page.
    pub dpi: f32,
}

impl AssembleRequest {
    /// A request with the default extension (`png`) and resolution.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output: None,
            extension: "png".to_string(),
            dpi: DEFAULT_DPI,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Outcome of a successful assembly.
#[derive(Debug, Clone)]
pub struct AssembleReport {
    /// Where the document was written.
    pub output: PathBuf,

    /// Source images, in page order.
    pub sources: Vec<PathBuf>,

    /// Size of the written document.
    pub bytes_written: u64,
}

impl AssembleReport {
    pub fn pages(&self) -> usize {
        self.sources.len()
    }
}

/// Progress callback for assembly.
pub type ProgressCallback = Box<dyn Fn(AssembleProgress) + Send>;

/// Assembly progress report.
#[derive(Debug, Clone)]
pub struct AssembleProgress {
    /// Current stage.
    pub stage: AssembleStage,

    /// Pages handled in this stage so far.
    pub done: usize,

    /// Total pages.
    pub total: usize,
}

/// Stages of assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssembleStage {
    Reading,
    Encoding,
    Writing,
    Complete,
}

/// Where the document for `request` will be written.
pub fn resolve_output_path(request: &AssembleRequest) -> PathBuf {
    request.output.clone().unwrap_or_else(|| {
        request
            .source_dir
            .join(default_document_name(&request.source_dir))
    })
}

/// Build a PDF from every matching image in the source folder.
///
/// Nothing is created unless every page decodes. A failure while writing is
/// reported but may leave a truncated file behind.
pub fn assemble(
    request: &AssembleRequest,
    progress: Option<ProgressCallback>,
) -> PageshotResult<AssembleReport> {
    let report = |stage: AssembleStage, done: usize, total: usize| {
        if let Some(cb) = progress.as_ref() {
            cb(AssembleProgress { stage, done, total });
        }
    };

    if !request.source_dir.is_dir() {
        return Err(PageshotError::DirectoryNotFound {
            path: request.source_dir.clone(),
        });
    }

    let files = list_images(&request.source_dir, &request.extension);
    if files.is_empty() {
        return Err(PageshotError::NoImages {
            dir: request.source_dir.clone(),
            extension: request.extension.trim_start_matches('.').to_string(),
        });
    }

    let output = resolve_output_path(request);
    let total = files.len();
    tracing::info!(
        source = %request.source_dir.display(),
        output = %output.display(),
        pages = total,
        "Assembling document"
    );

    let pages = load_pages(&files, &report)?;

    let mut writer = PdfWriter::new(request.dpi);
    for (index, page) in pages.iter().enumerate() {
        writer.add_page(page)?;
        report(AssembleStage::Encoding, index + 1, total);
    }
    drop(pages);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PageshotError::write(parent, e))?;
    }

    report(AssembleStage::Writing, 0, total);
    let bytes_written = writer.save(&output)?;
    report(AssembleStage::Complete, total, total);

    tracing::info!(output = %output.display(), pages = total, bytes_written, "Document written");

    Ok(AssembleReport {
        output,
        sources: files.paths().collect(),
        bytes_written,
    })
}

/// Decode and normalize every page in order. The first failure drops all
/// pages decoded so far and is returned as is.
fn load_pages(
    files: &FileSet,
    report: &impl Fn(AssembleStage, usize, usize),
) -> PageshotResult<Vec<RgbImage>> {
    let total = files.len();
    let mut pages = Vec::with_capacity(total);
    for (index, path) in files.paths().enumerate() {
        let page = read_page(&path).inspect_err(|_| {
            tracing::debug!(path = %path.display(), decoded = index, "Aborting assembly");
        })?;
        pages.push(page);
        report(AssembleStage::Reading, index + 1, total);
    }
    Ok(pages)
}

fn read_page(path: &Path) -> PageshotResult<RgbImage> {
    let page = PageImage::open(path)?;
    tracing::debug!(path = %path.display(), mode = ?page.color_mode(), "Page decoded");
    Ok(normalize(page))
}
