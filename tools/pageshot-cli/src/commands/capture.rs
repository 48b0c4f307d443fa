//! Run the capture loop until Ctrl+C or the page limit.

use std::path::PathBuf;
use std::time::Duration;

use pageshot_capture::backend::{page_turner, screen_capturer, CaptureBackendKind, NoopTurner};
use pageshot_capture::{CaptureConfig, CaptureRegion, CaptureRun, PageTurner, RunState, StopReason};
use pageshot_common::config::CaptureDefaults;
use pageshot_common::secs_at_least;

/// Command-line overrides for one capture run.
pub struct CaptureOptions {
    pub region: CaptureRegion,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub start_page: Option<u32>,
    pub interval: Option<f64>,
    pub delay: Option<f64>,
    pub key: Option<String>,
    pub advance: bool,
    pub max_pages: Option<u32>,
    pub backend: CaptureBackendKind,
}

impl CaptureOptions {
    fn into_config(self, defaults: &CaptureDefaults) -> CaptureConfig {
        let mut config = CaptureConfig::from_defaults(self.region, defaults);
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(name) = self.name {
            config.base_name = name;
        }
        if let Some(start_page) = self.start_page {
            config.start_page = start_page;
        }
        if let Some(interval) = self.interval {
            config.interval = secs_at_least(interval, pageshot_capture::MIN_INTERVAL);
        }
        if let Some(delay) = self.delay {
            config.start_delay = secs_at_least(delay, Duration::ZERO);
        }
        config.max_pages = self.max_pages;
        config
    }
}

pub async fn run(options: CaptureOptions, defaults: &CaptureDefaults) -> anyhow::Result<()> {
    let key = options
        .key
        .clone()
        .unwrap_or_else(|| defaults.advance_key.clone());
    let advance = options.advance;
    let backend = options.backend;
    let config = options.into_config(defaults);

    let capturer = screen_capturer(backend)?;
    let turner: Box<dyn PageTurner> = if advance {
        page_turner(&key)?
    } else {
        Box::new(NoopTurner)
    };

    println!("Starting capture run");
    println!("  Region: {}", config.region);
    println!("  Output: {}", config.output_dir.display());
    println!("  First file: {}", config.page_path(config.start_page).display());
    println!("  Interval: {:.2}s", config.interval.as_secs_f64());
    println!(
        "  Advance key: {}",
        if advance { key.as_str() } else { "(none)" }
    );
    println!("  Capture backend: {}", capturer.name());
    println!();

    let run = CaptureRun::spawn(config.clone(), capturer, turner)?;

    if !config.start_delay.is_zero() {
        println!(
            "Starting in {:.1} seconds... switch to the reader window now.",
            config.start_delay.as_secs_f64()
        );
    }
    println!("Press Ctrl+C to stop.");
    println!();

    let mut updates = run.subscribe();
    let printer = tokio::spawn(async move {
        let mut printed = 0;
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().clone();
            if status.pages_captured > printed {
                printed = status.pages_captured;
                if let Some(file) = status.last_file {
                    println!("Saved {} (next page {})", file.display(), status.next_page);
                }
            }
        }
    });

    let mut done = run.subscribe();
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            println!();
            println!("Stopping after the current page...");
            run.stop();
        }
        _ = done.wait_for(|status| status.state == RunState::Idle) => {}
    }

    let result = run.join().await;
    // The status sender is gone once the run has ended, which ends the printer.
    if let Err(e) = printer.await {
        tracing::debug!(error = %e, "Progress printer ended abnormally");
    }

    let summary = result?;
    println!();
    match summary.stop_reason {
        StopReason::Cancelled => println!("Capture stopped."),
        StopReason::PageLimit => println!("Page limit reached."),
    }
    println!(
        "  {} page(s) in {:.1}s, next page number: {}",
        summary.pages_captured(),
        summary.elapsed.as_secs_f64(),
        summary.next_page
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let options = CaptureOptions {
            region: CaptureRegion::new(0, 0, 10, 10).unwrap(),
            output: Some(PathBuf::from("/books")),
            name: Some("novel".to_string()),
            start_page: Some(40),
            interval: Some(0.0),
            delay: None,
            key: None,
            advance: true,
            max_pages: Some(5),
            backend: CaptureBackendKind::Auto,
        };
        let defaults = CaptureDefaults::default();
        let config = options.into_config(&defaults);

        assert_eq!(config.output_dir, PathBuf::from("/books"));
        assert_eq!(config.base_name, "novel");
        assert_eq!(config.start_page, 40);
        assert_eq!(config.interval, pageshot_capture::MIN_INTERVAL);
        assert_eq!(config.start_delay, Duration::from_secs(5));
        assert_eq!(config.max_pages, Some(5));
    }
}
