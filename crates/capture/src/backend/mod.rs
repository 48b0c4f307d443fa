//! Screen-capture and input-simulation collaborators.

use std::path::PathBuf;

use image::DynamicImage;
use pageshot_common::error::{PageshotError, PageshotResult};

use crate::region::CaptureRegion;

pub mod command;
#[cfg(feature = "xcap")]
pub mod xcap_backend;

pub use command::{GrimCapturer, ImportCapturer, NoopTurner, WtypeTurner, XdotoolTurner};

/// Takes a snapshot of a screen rectangle.
#[async_trait::async_trait]
pub trait ScreenCapturer: Send {
    /// Capture `region` as it looks right now.
    async fn capture(&mut self, region: &CaptureRegion) -> PageshotResult<DynamicImage>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Sends the "next page" input to whatever window has focus.
#[async_trait::async_trait]
pub trait PageTurner: Send {
    /// Press and release the advance key once.
    async fn advance(&mut self) -> PageshotResult<()>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Display server type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    X11,
    Unknown,
}

/// Detect the current display server from the session environment.
pub fn detect_display_server() -> DisplayServer {
    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        DisplayServer::Wayland
    } else if std::env::var("DISPLAY").is_ok() {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}

/// Which screen-capture implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureBackendKind {
    /// Pick from the display server.
    #[default]
    Auto,
    /// `grim` (wlroots Wayland compositors).
    Grim,
    /// ImageMagick `import` (X11).
    Import,
    /// The in-process xcap library.
    Xcap,
}

/// Build the screen capturer for `kind`.
pub fn screen_capturer(kind: CaptureBackendKind) -> PageshotResult<Box<dyn ScreenCapturer>> {
    match kind {
        CaptureBackendKind::Auto => match detect_display_server() {
            DisplayServer::Wayland => Ok(Box::new(GrimCapturer)),
            DisplayServer::X11 => Ok(Box::new(ImportCapturer)),
            DisplayServer::Unknown => Err(PageshotError::unsupported(
                "No display server detected (neither WAYLAND_DISPLAY nor DISPLAY is set)",
            )),
        },
        CaptureBackendKind::Grim => Ok(Box::new(GrimCapturer)),
        CaptureBackendKind::Import => Ok(Box::new(ImportCapturer)),
        CaptureBackendKind::Xcap => xcap_capturer(),
    }
}

#[cfg(feature = "xcap")]
fn xcap_capturer() -> PageshotResult<Box<dyn ScreenCapturer>> {
    Ok(Box::new(xcap_backend::XcapCapturer))
}

#[cfg(not(feature = "xcap"))]
fn xcap_capturer() -> PageshotResult<Box<dyn ScreenCapturer>> {
    Err(PageshotError::unsupported(
        "xcap capture backend not compiled in; rebuild with --features xcap",
    ))
}

/// Build the page turner that presses `key` on the current display server.
pub fn page_turner(key: &str) -> PageshotResult<Box<dyn PageTurner>> {
    match detect_display_server() {
        DisplayServer::Wayland => Ok(Box::new(WtypeTurner::new(key))),
        DisplayServer::X11 => Ok(Box::new(XdotoolTurner::new(key))),
        DisplayServer::Unknown => Err(PageshotError::unsupported(
            "No display server detected for input simulation",
        )),
    }
}

/// Locate an executable on `PATH`.
pub fn find_in_path(tool: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file())
}

/// Key symbol understood by xdotool and wtype for a friendly key name.
pub fn keysym(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "right" => "Right".to_string(),
        "left" => "Left".to_string(),
        "up" => "Up".to_string(),
        "down" => "Down".to_string(),
        "space" => "space".to_string(),
        "enter" | "return" => "Return".to_string(),
        "pagedown" | "page_down" | "pgdn" => "Next".to_string(),
        "pageup" | "page_up" | "pgup" => "Prior".to_string(),
        _ => name.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keysym_mapping() {
        assert_eq!(keysym("right"), "Right");
        assert_eq!(keysym(" RIGHT "), "Right");
        assert_eq!(keysym("pagedown"), "Next");
        assert_eq!(keysym("F5"), "F5");
    }

    #[test]
    fn test_explicit_backends_do_not_need_display() {
        assert_eq!(
            screen_capturer(CaptureBackendKind::Grim).unwrap().name(),
            "grim"
        );
        assert_eq!(
            screen_capturer(CaptureBackendKind::Import).unwrap().name(),
            "import"
        );
    }
}
