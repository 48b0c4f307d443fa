//! Minimal multi-page PDF encoder: one opaque RGB image per page.
//!
//! Each page is sized so the image renders at the configured resolution
//! (`points = pixels * 72 / dpi`).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use pageshot_common::error::{PageshotError, PageshotResult};

/// Resolution recorded for every page unless configured otherwise.
pub const DEFAULT_DPI: f32 = 300.0;

const POINTS_PER_INCH: f32 = 72.0;

/// Accumulates pages and writes them as one PDF document.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    dpi: f32,
}

impl PdfWriter {
    /// Create an empty document. Non-positive or non-finite resolutions fall
    /// back to [`DEFAULT_DPI`].
    pub fn new(dpi: f32) -> Self {
        let dpi = if dpi.is_finite() && dpi > 0.0 {
            dpi
        } else {
            DEFAULT_DPI
        };
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            dpi,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Page size in points for an image of the given pixel size.
    pub fn page_size_points(&self, width: u32, height: u32) -> (f32, f32) {
        let scale = POINTS_PER_INCH / self.dpi;
        (width as f32 * scale, height as f32 * scale)
    }

    /// Append a page showing `image` edge to edge.
    pub fn add_page(&mut self, image: &RgbImage) -> PageshotResult<()> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PageshotError::encode("Cannot add an empty page to a PDF"));
        }

        let data = deflate(image.as_raw())?;
        let image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "FlateDecode",
            },
            data,
        );
        let image_id = self.doc.add_object(image_stream);

        let (page_w, page_h) = self.page_size_points(width, height);
        let ops = format!("q\n{page_w:.4} 0 0 {page_h:.4} 0 0 cm\n/Im0 Do\nQ\n");
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, ops.into_bytes()));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page_w.into()),
                Object::Real(page_h.into()),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        self.kids.push(page_id.into());

        tracing::trace!(page = self.kids.len(), width, height, "PDF page added");
        Ok(())
    }

    /// Finish the document and write it to `out`.
    pub fn write_to<W: Write>(mut self, out: &mut W) -> PageshotResult<()> {
        if self.kids.is_empty() {
            return Err(PageshotError::encode("A PDF needs at least one page"));
        }

        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => std::mem::take(&mut self.kids),
            "Count" => count,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal("PageShot"),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        self.doc
            .save_to(out)
            .map_err(|e| PageshotError::encode(format!("Failed to serialize PDF: {e}")))?;
        Ok(())
    }

    /// Finish the document and write it to `path`.
    pub fn save(self, path: &Path) -> PageshotResult<u64> {
        let file = File::create(path).map_err(|e| PageshotError::write(path, e))?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out).map_err(|e| match e {
            PageshotError::Encode { message } => PageshotError::write(path, message),
            other => other,
        })?;
        out.flush().map_err(|e| PageshotError::write(path, e))?;

        let bytes = std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| PageshotError::write(path, e))?;
        Ok(bytes)
    }
}

fn deflate(raw: &[u8]) -> PageshotResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| PageshotError::encode(format!("Failed to compress page: {e}")))
}
