//! Decoded page rasters.

use std::io::Cursor;
use std::path::Path;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, Rgba, RgbaImage};
use pageshot_common::error::{PageshotError, PageshotResult};

/// Color representation of a page, as far as normalization cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Single luminance channel.
    Gray,
    /// Luminance plus alpha.
    GrayAlpha,
    /// Indices into a color table.
    Indexed,
    /// Three opaque channels, 8 bits each.
    Rgb,
    /// Direct color with alpha.
    Rgba,
    /// Anything else (high bit depth RGB, float RGB, ...).
    Other,
}

/// Palette image: one byte per pixel indexing an RGBA color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRaster {
    width: u32,
    height: u32,
    palette: Vec<[u8; 4]>,
    indices: Vec<u8>,
}

impl IndexedRaster {
    /// Build a palette image. Fails when the index buffer does not match the
    /// dimensions or refers past the end of the palette.
    pub fn new(
        width: u32,
        height: u32,
        palette: Vec<[u8; 4]>,
        indices: Vec<u8>,
    ) -> PageshotResult<Self> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(PageshotError::encode(format!(
                "Indexed raster has {} indices for {width}x{height} pixels",
                indices.len()
            )));
        }
        if let Some(max) = indices.iter().copied().max() {
            if max as usize >= palette.len() {
                return Err(PageshotError::encode(format!(
                    "Palette index {max} out of range for {} colors",
                    palette.len()
                )));
            }
        }
        Ok(Self {
            width,
            height,
            palette,
            indices,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Expand the palette to direct color with alpha.
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let index = self.indices[y as usize * self.width as usize + x as usize];
            Rgba(self.palette[index as usize])
        })
    }
}

/// Pixel storage of a page.
#[derive(Debug, Clone)]
pub enum Raster {
    /// Direct pixel data as produced by the image decoder.
    Direct(DynamicImage),
    /// Palette data supplied by a caller.
    Indexed(IndexedRaster),
}

/// A decoded page together with the orientation correction its metadata asks
/// for. The correction is applied by [`crate::normalize`], not on decode.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub raster: Raster,
    pub orientation: Orientation,
}

impl PageImage {
    /// Wrap an already decoded image with no orientation correction.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            raster: Raster::Direct(image),
            orientation: Orientation::NoTransforms,
        }
    }

    /// Wrap a palette image with no orientation correction.
    pub fn indexed(raster: IndexedRaster) -> Self {
        Self {
            raster: Raster::Indexed(raster),
            orientation: Orientation::NoTransforms,
        }
    }

    /// Set the orientation correction.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Decode an image file, reading its orientation metadata.
    pub fn open(path: &Path) -> PageshotResult<Self> {
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| PageshotError::decode(path, e))?;
        Self::decode(reader, path)
    }

    /// Decode in-memory image bytes (e.g. the output of a screenshot tool).
    pub fn from_bytes(bytes: &[u8]) -> PageshotResult<Self> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PageshotError::decode("<memory>", e))?;
        Self::decode(reader, Path::new("<memory>"))
    }

    fn decode<R>(reader: ImageReader<R>, origin: &Path) -> PageshotResult<Self>
    where
        R: std::io::BufRead + std::io::Seek,
    {
        let mut decoder = reader
            .into_decoder()
            .map_err(|e| PageshotError::decode(origin, e))?;

        let orientation = match decoder.orientation() {
            Ok(orientation) => orientation,
            Err(e) => {
                tracing::debug!(path = %origin.display(), error = %e, "Ignoring unreadable orientation metadata");
                Orientation::NoTransforms
            }
        };

        let image =
            DynamicImage::from_decoder(decoder).map_err(|e| PageshotError::decode(origin, e))?;

        Ok(Self {
            raster: Raster::Direct(image),
            orientation,
        })
    }

    pub fn width(&self) -> u32 {
        match &self.raster {
            Raster::Direct(image) => image.width(),
            Raster::Indexed(indexed) => indexed.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match &self.raster {
            Raster::Direct(image) => image.height(),
            Raster::Indexed(indexed) => indexed.height(),
        }
    }

    /// Classify the color representation.
    pub fn color_mode(&self) -> ColorMode {
        match &self.raster {
            Raster::Indexed(_) => ColorMode::Indexed,
            Raster::Direct(image) => match image {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_) => ColorMode::Gray,
                DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
                    ColorMode::GrayAlpha
                }
                DynamicImage::ImageRgb8(_) => ColorMode::Rgb,
                DynamicImage::ImageRgba8(_)
                | DynamicImage::ImageRgba16(_)
                | DynamicImage::ImageRgba32F(_) => ColorMode::Rgba,
                _ => ColorMode::Other,
            },
        }
    }
}
