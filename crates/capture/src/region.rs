//! Screen rectangles.

use std::fmt;
use std::str::FromStr;

use pageshot_common::error::{PageshotError, PageshotResult};

/// Smallest accepted width or height, in pixels.
pub const MIN_REGION_SIDE: u32 = 4;

/// An axis-aligned rectangle in screen pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Create a region, rejecting anything smaller than
    /// [`MIN_REGION_SIDE`] on either side.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> PageshotResult<Self> {
        if width < MIN_REGION_SIDE || height < MIN_REGION_SIDE {
            return Err(PageshotError::invalid_region(format!(
                "selection too small ({width}x{height}); each side must be at least {MIN_REGION_SIDE} px"
            )));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Region spanned by two opposite corners of a drag, in any order.
    pub fn from_corners(start: (i32, i32), end: (i32, i32)) -> PageshotResult<Self> {
        let left = start.0.min(end.0);
        let top = start.1.min(end.1);
        let width = start.0.abs_diff(end.0);
        let height = start.1.abs_diff(end.1);
        Self::new(left, top, width, height)
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }
}

impl fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}x{}",
            self.left, self.top, self.width, self.height
        )
    }
}

impl FromStr for CaptureRegion {
    type Err = PageshotError;

    /// Accepts `LEFT,TOP,WIDTHxHEIGHT` or `LEFT,TOP,WIDTH,HEIGHT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let (left, top, width, height) = match parts.as_slice() {
            [left, top, size] => {
                let (w, h) = size.split_once(['x', 'X']).ok_or_else(|| {
                    PageshotError::invalid_region(format!("expected WIDTHxHEIGHT, got {size:?}"))
                })?;
                (*left, *top, w.trim(), h.trim())
            }
            [left, top, width, height] => (*left, *top, *width, *height),
            _ => {
                return Err(PageshotError::invalid_region(format!(
                    "expected LEFT,TOP,WIDTHxHEIGHT, got {s:?}"
                )))
            }
        };

        Self::new(
            parse_field(left, "left")?,
            parse_field(top, "top")?,
            parse_field(width, "width")?,
            parse_field(height, "height")?,
        )
    }
}

fn parse_field<T: FromStr>(value: &str, name: &str) -> PageshotResult<T>
where
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| PageshotError::invalid_region(format!("bad {name} {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        let a: CaptureRegion = "100,200,640x480".parse().unwrap();
        let b: CaptureRegion = "100, 200, 640, 480".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "100,200,640x480");

        let negative: CaptureRegion = "-1920,0,800X600".parse().unwrap();
        assert_eq!(negative.left, -1920);
    }

    #[test]
    fn test_parse_errors() {
        assert!("100,200".parse::<CaptureRegion>().is_err());
        assert!("a,b,cxd".parse::<CaptureRegion>().is_err());
        assert!("0,0,640".parse::<CaptureRegion>().is_err());
        assert!("0,0,-5x10".parse::<CaptureRegion>().is_err());
    }

    #[test]
    fn test_too_small_rejected() {
        let err = CaptureRegion::new(0, 0, 3, 100).unwrap_err();
        assert!(err.is_configuration());
        assert!(CaptureRegion::new(0, 0, 4, 4).is_ok());
    }

    #[test]
    fn test_from_corners_any_direction() {
        let region = CaptureRegion::from_corners((300, 50), (100, 250)).unwrap();
        assert_eq!(region, CaptureRegion::new(100, 50, 200, 200).unwrap());
        assert_eq!(region.right(), 300);
        assert_eq!(region.bottom(), 250);
        assert!(CaptureRegion::from_corners((10, 10), (12, 40)).is_err());
    }
}
