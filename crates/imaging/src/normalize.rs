//! Color-mode normalization.
//!
//! Every page leaves here as fully opaque 8-bit RGB. Orientation is applied
//! first, then:
//!
//! | input            | treatment                                         |
//! |------------------|---------------------------------------------------|
//! | RGB              | returned as is                                    |
//! | gray + alpha     | luminance over white, then gray promoted to RGB   |
//! | gray             | promoted to RGB (R = G = B = luminance)           |
//! | palette / RGBA   | palette expanded to RGBA, composited over white   |
//! | anything else    | converted to RGB, transparency ignored            |

use image::{DynamicImage, GrayAlphaImage, Rgb, RgbImage, RgbaImage};

use crate::page::{ColorMode, PageImage, Raster};

/// Normalize a page into an opaque three-channel raster.
pub fn normalize(page: PageImage) -> RgbImage {
    let mode = page.color_mode();
    let PageImage {
        raster,
        orientation,
    } = page;

    tracing::trace!(?mode, ?orientation, "Normalizing page");

    match raster {
        Raster::Indexed(indexed) => {
            let mut rgba = DynamicImage::ImageRgba8(indexed.to_rgba());
            rgba.apply_orientation(orientation);
            flatten_rgba(&rgba.into_rgba8())
        }
        Raster::Direct(mut image) => {
            image.apply_orientation(orientation);
            normalize_direct(image, mode)
        }
    }
}

fn normalize_direct(image: DynamicImage, mode: ColorMode) -> RgbImage {
    match (mode, image) {
        (_, DynamicImage::ImageRgb8(rgb)) => rgb,
        (_, DynamicImage::ImageRgba8(rgba)) => flatten_rgba(&rgba),
        (ColorMode::GrayAlpha, image) => flatten_gray_alpha(&image.to_luma_alpha8()),
        (ColorMode::Rgba, image) => flatten_rgba(&image.to_rgba8()),
        (_, image) => image.to_rgb8(),
    }
}

/// Composite luminance over white using alpha as the blend weight and
/// promote the result to RGB.
pub fn flatten_gray_alpha(image: &GrayAlphaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [luma, alpha] = image.get_pixel(x, y).0;
        let v = over_white(luma, alpha);
        Rgb([v, v, v])
    })
}

/// Composite RGBA over opaque white and drop the alpha channel.
pub fn flatten_rgba(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

#[inline]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32;
    let a = alpha as u32;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::IndexedRaster;
    use image::metadata::Orientation;
    use image::{GrayImage, ImageBuffer, Luma, LumaA, Rgb32FImage, Rgba};

    type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

    #[test]
    fn test_over_white_endpoints() {
        assert_eq!(over_white(0, 255), 0);
        assert_eq!(over_white(0, 0), 255);
        assert_eq!(over_white(200, 255), 200);
        assert_eq!(over_white(0, 128), 127);
    }

    #[test]
    fn test_rgb_is_identity() {
        let rgb = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 7]));
        let out = normalize(PageImage::new(DynamicImage::ImageRgb8(rgb.clone())));
        assert_eq!(out, rgb);
    }

    #[test]
    fn test_gray_promotes_to_rgb() {
        let gray = GrayImage::from_pixel(2, 2, Luma([90]));
        let out = normalize(PageImage::new(DynamicImage::ImageLuma8(gray)));
        assert!(out.pixels().all(|p| p.0 == [90, 90, 90]));
    }

    #[test]
    fn test_gray_alpha_composites_over_white() {
        let mut image = GrayAlphaImage::new(2, 1);
        image.put_pixel(0, 0, LumaA([0, 0]));
        image.put_pixel(1, 0, LumaA([40, 255]));
        let out = normalize(PageImage::new(DynamicImage::ImageLumaA8(image)));
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([40, 40, 40]));
    }

    #[test]
    fn test_rgba_composites_over_white() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 0]));
        image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let out = normalize(PageImage::new(DynamicImage::ImageRgba8(image)));
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_rgba16_goes_through_alpha_path() {
        let image = Rgba16Image::from_pixel(1, 1, image::Rgba([0, 0, 0, 0]));
        let out = normalize(PageImage::new(DynamicImage::ImageRgba16(image)));
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_float_rgb_falls_back_to_eight_bit() {
        let image = Rgb32FImage::from_pixel(2, 1, Rgb([1.0, 0.0, 0.5]));
        let page = PageImage::new(DynamicImage::ImageRgb32F(image));
        assert_eq!(page.color_mode(), ColorMode::Other);

        let out = normalize(page);
        let [r, g, b] = out.get_pixel(1, 0).0;
        assert_eq!((r, g), (255, 0));
        assert!((127..=128).contains(&b));
    }

    #[test]
    fn test_indexed_flattens_transparent_entries() {
        let palette = vec![[0, 128, 0, 255], [9, 9, 9, 0]];
        let raster = IndexedRaster::new(2, 1, palette, vec![0, 1]).unwrap();
        let out = normalize(PageImage::indexed(raster));
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 128, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_orientation_applied_before_conversion() {
        let mut gray = GrayImage::new(2, 1);
        gray.put_pixel(0, 0, Luma([10]));
        gray.put_pixel(1, 0, Luma([20]));
        let page = PageImage::new(DynamicImage::ImageLuma8(gray))
            .with_orientation(Orientation::Rotate90);

        let out = normalize(page);
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(out.get_pixel(0, 0), &Rgb([10, 10, 10]));
        assert_eq!(out.get_pixel(0, 1), &Rgb([20, 20, 20]));
    }

    #[test]
    fn test_flip_orientation_on_rgb() {
        let rgb = RgbImage::from_fn(2, 1, |x, _| Rgb([x as u8, 0, 0]));
        let page = PageImage::new(DynamicImage::ImageRgb8(rgb))
            .with_orientation(Orientation::FlipHorizontal);
        let out = normalize(page);
        assert_eq!(out.get_pixel(0, 0), &Rgb([1, 0, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([0, 0, 0]));
    }
}
