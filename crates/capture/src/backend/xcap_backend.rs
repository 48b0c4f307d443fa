//! In-process capture with the xcap library.

use image::DynamicImage;
use pageshot_common::error::{PageshotError, PageshotResult};
use xcap::Monitor;

use super::ScreenCapturer;
use crate::region::CaptureRegion;

/// Captures from the monitor containing the region's top-left corner.
pub struct XcapCapturer;

#[async_trait::async_trait]
impl ScreenCapturer for XcapCapturer {
    async fn capture(&mut self, region: &CaptureRegion) -> PageshotResult<DynamicImage> {
        let region = *region;
        tokio::task::spawn_blocking(move || grab(region))
            .await
            .map_err(|e| PageshotError::capture(format!("Capture task failed: {e}")))?
    }

    fn name(&self) -> &str {
        "xcap"
    }
}

fn grab(region: CaptureRegion) -> PageshotResult<DynamicImage> {
    let monitor = Monitor::from_point(region.left, region.top)
        .map_err(|e| PageshotError::capture(format!("Failed to get monitor at point: {e}")))?;

    let origin_x = monitor
        .x()
        .map_err(|e| PageshotError::capture(format!("Failed to read monitor origin: {e}")))?;
    let origin_y = monitor
        .y()
        .map_err(|e| PageshotError::capture(format!("Failed to read monitor origin: {e}")))?;

    let x = u32::try_from(region.left - origin_x)
        .map_err(|_| PageshotError::invalid_region("region starts left of its monitor"))?;
    let y = u32::try_from(region.top - origin_y)
        .map_err(|_| PageshotError::invalid_region("region starts above its monitor"))?;

    let image = monitor
        .capture_region(x, y, region.width, region.height)
        .map_err(|e| PageshotError::capture(format!("Failed to capture screen: {e}")))?;

    Ok(DynamicImage::ImageRgba8(image))
}
