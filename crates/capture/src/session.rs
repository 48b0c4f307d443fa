//! Capture run management.
//!
//! A run moves through `Starting → Capturing → Stopping → Idle`. Stop is
//! cooperative: it is checked before every iteration and interrupts the start
//! delay and the inter-page wait, so a stop takes effect within one in-flight
//! capture iteration. A page file is written atomically or not at all.

use std::path::PathBuf;
use std::time::Duration;

use image::DynamicImage;
use pageshot_common::clock::RunClock;
use pageshot_common::error::{PageshotError, PageshotResult};
use pageshot_imaging::{normalize, save_page, PageImage};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backend::{PageTurner, ScreenCapturer};
use crate::config::CaptureConfig;

/// State of a capture run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run in progress (not yet started, or finished).
    Idle,
    /// Waiting out the start delay.
    Starting,
    /// Capturing pages.
    Capturing,
    /// Stop observed, winding down.
    Stopping,
}

/// Read-only snapshot of a run, published after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatus {
    pub state: RunState,

    /// Page number the next capture will use.
    pub next_page: u32,

    /// Pages written so far in this run.
    pub pages_captured: u32,

    /// Most recently written page.
    pub last_file: Option<PathBuf>,

    /// Set when the run ended with an error.
    pub error: Option<String>,
}

/// Why a run ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop signal was observed.
    Cancelled,
    /// The configured page limit was reached.
    PageLimit,
}

/// Outcome of a run that ended without error.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Files written, in capture order.
    pub files: Vec<PathBuf>,

    /// Page number a follow-up run should start at.
    pub next_page: u32,

    pub stop_reason: StopReason,

    /// Wall-clock start (RFC 3339).
    pub started_at: String,

    pub elapsed: Duration,
}

impl RunSummary {
    pub fn pages_captured(&self) -> usize {
        self.files.len()
    }
}

/// Handle to a capture run executing on a background task.
pub struct CaptureRun {
    stop_tx: watch::Sender<bool>,
    status_rx: watch::Receiver<RunStatus>,
    task: JoinHandle<PageshotResult<RunSummary>>,
}

impl CaptureRun {
    /// Validate `config` and start a run on a new task. The capturer and
    /// turner are moved into the task and dropped when it ends.
    ///
    /// Returns a configuration error without starting anything when the
    /// output folder is missing or a value is out of range.
    pub fn spawn(
        config: CaptureConfig,
        capturer: Box<dyn ScreenCapturer>,
        turner: Box<dyn PageTurner>,
    ) -> PageshotResult<Self> {
        let config = config.sanitized();
        config.validate()?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(RunStatus {
            state: RunState::Starting,
            next_page: config.start_page,
            pages_captured: 0,
            last_file: None,
            error: None,
        });

        tracing::info!(
            region = %config.region,
            output = %config.output_dir.display(),
            base = %config.base_name,
            start_page = config.start_page,
            interval_ms = config.interval.as_millis() as u64,
            capturer = capturer.name(),
            turner = turner.name(),
            "Starting capture run"
        );

        let worker = CaptureWorker {
            next_page: config.start_page,
            config,
            capturer,
            turner,
            stop_rx,
            status_tx,
            files: Vec::new(),
        };
        let task = tokio::spawn(worker.run());

        Ok(Self {
            stop_tx,
            status_rx,
            task,
        })
    }

    /// Ask the run to stop. Idempotent.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Latest status snapshot.
    pub fn status(&self) -> RunStatus {
        self.status_rx.borrow().clone()
    }

    /// Receiver that is notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<RunStatus> {
        self.status_rx.clone()
    }

    /// Whether the background task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to end.
    pub async fn join(self) -> PageshotResult<RunSummary> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(PageshotError::capture(format!("Capture task failed: {e}"))),
        }
    }
}

/// The loop itself. Owns the collaborators and the only mutable run state.
struct CaptureWorker {
    config: CaptureConfig,
    capturer: Box<dyn ScreenCapturer>,
    turner: Box<dyn PageTurner>,
    stop_rx: watch::Receiver<bool>,
    status_tx: watch::Sender<RunStatus>,
    next_page: u32,
    files: Vec<PathBuf>,
}

impl CaptureWorker {
    async fn run(mut self) -> PageshotResult<RunSummary> {
        let clock = RunClock::start();
        let result = self.run_loop().await;

        let error = result.as_ref().err().map(|e| e.to_string());
        // The error itself travels back through join.
        match &error {
            Some(_) => tracing::debug!(pages = self.files.len(), "Capture run aborted"),
            None => tracing::info!(
                pages = self.files.len(),
                duration_secs = clock.elapsed_secs(),
                "Capture run finished"
            ),
        }
        self.publish(RunState::Idle, error);

        let stop_reason = result?;
        Ok(RunSummary {
            files: self.files,
            next_page: self.next_page,
            stop_reason,
            started_at: clock.epoch_wall().to_string(),
            elapsed: clock.elapsed(),
        })
    }

    async fn run_loop(&mut self) -> PageshotResult<StopReason> {
        self.publish(RunState::Starting, None);
        if !self.config.start_delay.is_zero() {
            tracing::info!(
                delay_secs = self.config.start_delay.as_secs_f64(),
                "Waiting before first capture"
            );
            if self.wait_or_stop(self.config.start_delay).await {
                return Ok(self.stopping());
            }
        }

        self.publish(RunState::Capturing, None);
        loop {
            if self.stop_requested() {
                return Ok(self.stopping());
            }

            self.capture_page().await?;

            if let Some(limit) = self.config.max_pages {
                if self.files.len() >= limit as usize {
                    tracing::info!(limit, "Page limit reached");
                    return Ok(StopReason::PageLimit);
                }
            }

            if self.wait_or_stop(self.config.interval).await {
                return Ok(self.stopping());
            }
        }
    }

    /// One iteration: capture, persist, advance, count.
    async fn capture_page(&mut self) -> PageshotResult<()> {
        let page = self.next_page;
        let shot = self.capturer.capture(&self.config.region).await?;
        let flat = DynamicImage::ImageRgb8(normalize(PageImage::new(shot)));

        let path = self.config.page_path(page);
        let format = self.config.format()?;
        let target = path.clone();
        let bytes = tokio::task::spawn_blocking(move || save_page(&flat, &target, format))
            .await
            .map_err(|e| PageshotError::capture(format!("Page writer task failed: {e}")))??;

        self.turner.advance().await?;

        self.next_page = page
            .checked_add(1)
            .ok_or_else(|| PageshotError::capture("page counter overflow"))?;
        self.files.push(path.clone());
        tracing::info!(page, path = %path.display(), bytes, "Page captured");
        self.publish(RunState::Capturing, None);
        Ok(())
    }

    fn stop_requested(&self) -> bool {
        // A dropped handle counts as a stop.
        *self.stop_rx.borrow() || self.stop_rx.has_changed().is_err()
    }

    /// Sleep for `duration` unless a stop arrives first. Returns true when
    /// the run should stop.
    async fn wait_or_stop(&mut self, duration: Duration) -> bool {
        if self.stop_requested() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            // Resolves with Err when the handle is dropped; both mean stop.
            _ = self.stop_rx.wait_for(|stop| *stop) => true,
        }
    }

    fn stopping(&mut self) -> StopReason {
        tracing::info!(next_page = self.next_page, "Stop requested");
        self.publish(RunState::Stopping, None);
        StopReason::Cancelled
    }

    fn publish(&self, state: RunState, error: Option<String>) {
        self.status_tx.send_replace(RunStatus {
            state,
            next_page: self.next_page,
            pages_captured: self.files.len() as u32,
            last_file: self.files.last().cloned(),
            error,
        });
    }
}
