//! PageShot Ordering
//!
//! Decides which files make up a document and in what order:
//!
//! - [`natural`]: human-friendly filename comparison (`page2` before `page10`)
//! - [`scan`]: non-recursive directory listing filtered by extension
//! - [`naming`]: zero-padded page filenames and default document names

pub mod naming;
pub mod natural;
pub mod scan;

pub use naming::{default_document_name, page_file_name};
pub use natural::{natural_cmp, natural_key, natural_sort, Chunk};
pub use scan::{list_images, FileSet};
