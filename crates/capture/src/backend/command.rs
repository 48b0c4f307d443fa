//! Collaborators backed by external desktop tools.

use std::process::Output;

use image::DynamicImage;
use pageshot_common::error::{PageshotError, PageshotResult};
use pageshot_imaging::PageImage;
use tokio::process::Command;

use super::{keysym, PageTurner, ScreenCapturer};
use crate::region::CaptureRegion;

/// Captures through `grim -g "X,Y WxH" -` (wlroots compositors).
pub struct GrimCapturer;

#[async_trait::async_trait]
impl ScreenCapturer for GrimCapturer {
    async fn capture(&mut self, region: &CaptureRegion) -> PageshotResult<DynamicImage> {
        let geometry = format!(
            "{},{} {}x{}",
            region.left, region.top, region.width, region.height
        );
        let output = run_tool("grim", &["-g", &geometry, "-t", "png", "-"])
            .await
            .map_err(PageshotError::capture)?;
        decode_screenshot("grim", &output.stdout)
    }

    fn name(&self) -> &str {
        "grim"
    }
}

/// Captures through ImageMagick `import` on the X11 root window.
pub struct ImportCapturer;

#[async_trait::async_trait]
impl ScreenCapturer for ImportCapturer {
    async fn capture(&mut self, region: &CaptureRegion) -> PageshotResult<DynamicImage> {
        let crop = format!(
            "{}x{}{:+}{:+}",
            region.width, region.height, region.left, region.top
        );
        let output = run_tool(
            "import",
            &["-silent", "-window", "root", "-crop", &crop, "+repage", "png:-"],
        )
        .await
        .map_err(PageshotError::capture)?;
        decode_screenshot("import", &output.stdout)
    }

    fn name(&self) -> &str {
        "import"
    }
}

/// Presses a key with `xdotool key` (X11).
pub struct XdotoolTurner {
    keysym: String,
}

impl XdotoolTurner {
    pub fn new(key: &str) -> Self {
        Self {
            keysym: keysym(key),
        }
    }
}

#[async_trait::async_trait]
impl PageTurner for XdotoolTurner {
    async fn advance(&mut self) -> PageshotResult<()> {
        run_tool("xdotool", &["key", "--clearmodifiers", &self.keysym])
            .await
            .map(|_| ())
            .map_err(PageshotError::input)
    }

    fn name(&self) -> &str {
        "xdotool"
    }
}

/// Presses a key with `wtype -k` (Wayland virtual keyboard).
pub struct WtypeTurner {
    keysym: String,
}

impl WtypeTurner {
    pub fn new(key: &str) -> Self {
        Self {
            keysym: keysym(key),
        }
    }
}

#[async_trait::async_trait]
impl PageTurner for WtypeTurner {
    async fn advance(&mut self) -> PageshotResult<()> {
        run_tool("wtype", &["-k", &self.keysym])
            .await
            .map(|_| ())
            .map_err(PageshotError::input)
    }

    fn name(&self) -> &str {
        "wtype"
    }
}

/// Sends nothing. Used for dry runs where pages are turned by hand.
pub struct NoopTurner;

#[async_trait::async_trait]
impl PageTurner for NoopTurner {
    async fn advance(&mut self) -> PageshotResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Run a tool to completion, turning spawn failures and non-zero exits into
/// a message naming the tool.
async fn run_tool(tool: &str, args: &[&str]) -> Result<Output, String> {
    let output = Command::new(tool)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| format!("Failed to execute {tool}: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "{tool} exited with {}: {}",
            output.status,
            stderr.trim()
        ));
    }
    Ok(output)
}

fn decode_screenshot(tool: &str, bytes: &[u8]) -> PageshotResult<DynamicImage> {
    if bytes.is_empty() {
        return Err(PageshotError::capture(format!("{tool} produced no image data")));
    }
    let page = PageImage::from_bytes(bytes)
        .map_err(|e| PageshotError::capture(format!("{tool} output unreadable: {e}")))?;
    match page.raster {
        pageshot_imaging::Raster::Direct(image) => Ok(image),
        pageshot_imaging::Raster::Indexed(indexed) => {
            Ok(DynamicImage::ImageRgba8(indexed.to_rgba()))
        }
    }
}
