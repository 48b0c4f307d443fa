//! Build a PDF from a folder of images.

use std::path::{Path, PathBuf};

use pageshot_common::config::AssembleDefaults;
use pageshot_document::{assemble, AssembleProgress, AssembleRequest, AssembleStage};

pub fn run(
    dir: PathBuf,
    output: Option<PathBuf>,
    ext: Option<String>,
    dpi: Option<f32>,
    open: bool,
    defaults: &AssembleDefaults,
) -> anyhow::Result<()> {
    let request = AssembleRequest {
        source_dir: dir,
        output,
        extension: ext.unwrap_or_else(|| defaults.image_extension.clone()),
        dpi: dpi.unwrap_or(defaults.dpi),
    };

    println!("Assembling {}", request.source_dir.display());

    let report = assemble(
        &request,
        Some(Box::new(|progress: AssembleProgress| match progress.stage {
            AssembleStage::Reading => {
                tracing::debug!(page = progress.done, total = progress.total, "Read page")
            }
            AssembleStage::Writing => println!("Writing {} page(s)...", progress.total),
            _ => {}
        })),
    )?;

    println!("Saved PDF: {}", report.output.display());
    println!("  Pages: {}", report.pages());
    println!("  Size: {} bytes", report.bytes_written);

    if open {
        open_with_viewer(&report.output);
    }
    Ok(())
}

/// Optional effect: show the finished document in the desktop viewer.
/// Failures are logged and never fail the command.
fn open_with_viewer(path: &Path) {
    let mut command = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        std::process::Command::new("xdg-open")
    };

    if let Err(e) = command.arg(path).spawn() {
        tracing::warn!(path = %path.display(), error = %e, "Could not open PDF viewer");
    }
}
