//! PageShot Document
//!
//! Builds one PDF from a directory of page images.
//!
//! ```text
//!  scan dir ─► natural order ─► decode + normalize every page ─► PdfWriter ─► file
//!                               (any failure aborts, nothing is written)
//! ```

pub mod assemble;
pub mod pdf;

pub use assemble::{
    assemble, resolve_output_path, AssembleProgress, AssembleReport, AssembleRequest,
    AssembleStage, ProgressCallback,
};
pub use pdf::{PdfWriter, DEFAULT_DPI};
