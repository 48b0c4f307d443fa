//! Capture run configuration.

use std::path::PathBuf;
use std::time::Duration;

use image::ImageFormat;
use pageshot_common::config::CaptureDefaults;
use pageshot_common::error::{PageshotError, PageshotResult};
use pageshot_common::secs_at_least;
use pageshot_imaging::format_for_extension;
use pageshot_ordering::page_file_name;

use crate::region::CaptureRegion;

/// Shortest allowed pause between iterations.
pub const MIN_INTERVAL: Duration = Duration::from_millis(50);

const DEFAULT_BASE_NAME: &str = "capture";

/// Everything a capture run needs. A run takes its own copy when it starts,
/// so later edits to the caller's value do not affect it.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Screen rectangle to capture.
    pub region: CaptureRegion,

    /// Existing directory pages are written to.
    pub output_dir: PathBuf,

    /// Filename stem (`{base}_{page:04}.{ext}`).
    pub base_name: String,

    /// Number of the first page.
    pub start_page: u32,

    /// Pause after each page.
    pub interval: Duration,

    /// Pause before the first capture.
    pub start_delay: Duration,

    /// Page file extension.
    pub extension: String,

    /// Stop normally after this many pages.
    pub max_pages: Option<u32>,
}

impl CaptureConfig {
    /// A configuration with the stock defaults: base name `capture`, first
    /// page 1, one second interval, five second start delay, PNG pages.
    pub fn new(region: CaptureRegion, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            region,
            output_dir: output_dir.into(),
            base_name: DEFAULT_BASE_NAME.to_string(),
            start_page: 1,
            interval: Duration::from_secs(1),
            start_delay: Duration::from_secs(5),
            extension: "png".to_string(),
            max_pages: None,
        }
    }

    /// A configuration seeded from the application defaults.
    pub fn from_defaults(region: CaptureRegion, defaults: &CaptureDefaults) -> Self {
        Self {
            region,
            output_dir: defaults.output_dir.clone(),
            base_name: defaults.base_name.clone(),
            start_page: defaults.start_page,
            interval: secs_at_least(defaults.interval_secs, MIN_INTERVAL),
            start_delay: secs_at_least(defaults.start_delay_secs, Duration::ZERO),
            extension: defaults.image_extension.clone(),
            max_pages: None,
        }
    }

    /// Apply the value clamps: interval at least [`MIN_INTERVAL`], blank base
    /// name replaced by `capture`, extension without a leading dot.
    pub fn sanitized(mut self) -> Self {
        self.interval = self.interval.max(MIN_INTERVAL);
        let trimmed = self.base_name.trim();
        self.base_name = if trimmed.is_empty() {
            DEFAULT_BASE_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        self.extension = self.extension.trim_start_matches('.').to_ascii_lowercase();
        self
    }

    /// Check the preconditions for starting a run.
    pub fn validate(&self) -> PageshotResult<()> {
        if !self.output_dir.is_dir() {
            return Err(PageshotError::config(format!(
                "output folder {} does not exist",
                self.output_dir.display()
            )));
        }
        if self.start_page == 0 {
            return Err(PageshotError::config("start page must be at least 1"));
        }
        if self.max_pages == Some(0) {
            return Err(PageshotError::config("page limit must be at least 1"));
        }
        if self.base_name.contains(['/', '\\']) {
            return Err(PageshotError::config(format!(
                "base name {:?} must not contain path separators",
                self.base_name
            )));
        }
        // Fields are public and may have changed since construction.
        CaptureRegion::new(
            self.region.left,
            self.region.top,
            self.region.width,
            self.region.height,
        )?;
        self.format()?;
        Ok(())
    }

    /// Encoding used for page files.
    pub fn format(&self) -> PageshotResult<ImageFormat> {
        format_for_extension(&self.extension)
    }

    /// Path of the file for page number `page`.
    pub fn page_path(&self, page: u32) -> PathBuf {
        self.output_dir
            .join(page_file_name(&self.base_name, page, &self.extension))
    }
}
