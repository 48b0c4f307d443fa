//! PageShot Imaging
//!
//! Turns arbitrary image files into document-ready pages and writes captured
//! pages to disk.
//!
//! ```text
//!  file bytes ──► PageImage ──► apply orientation ──► normalize ──► RgbImage
//!                 (raster +                            (gray, gray+alpha,
//!                  orientation)                         palette, RGBA → RGB)
//! ```

pub mod normalize;
pub mod page;
pub mod persist;

pub use normalize::{flatten_gray_alpha, flatten_rgba, normalize};
pub use page::{ColorMode, IndexedRaster, PageImage, Raster};
pub use persist::{format_for_extension, save_page};
