use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, Rgba, RgbaImage};
use pageshot_capture::{
    CaptureConfig, CaptureRegion, CaptureRun, PageTurner, RunState, ScreenCapturer, StopReason,
};
use pageshot_common::error::{PageshotError, PageshotResult};

/// Returns a solid translucent frame; optionally fails on the n-th call (1-based).
struct FakeScreen {
    calls: Arc<AtomicUsize>,
    fail_on: Option<usize>,
}

#[async_trait::async_trait]
impl ScreenCapturer for FakeScreen {
    async fn capture(&mut self, region: &CaptureRegion) -> PageshotResult<DynamicImage> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(n) {
            return Err(PageshotError::capture("screen went away"));
        }
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            region.width,
            region.height,
            Rgba([10, 20, 30, 128]),
        )))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct FakeKeys {
    presses: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait::async_trait]
impl PageTurner for FakeKeys {
    async fn advance(&mut self) -> PageshotResult<()> {
        if self.fail {
            return Err(PageshotError::input("no focus"));
        }
        self.presses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct Harness {
    calls: Arc<AtomicUsize>,
    presses: Arc<AtomicUsize>,
}

impl Harness {
    fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            presses: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn spawn(
        &self,
        config: CaptureConfig,
        fail_capture_on: Option<usize>,
        fail_keys: bool,
    ) -> PageshotResult<CaptureRun> {
        CaptureRun::spawn(
            config,
            Box::new(FakeScreen {
                calls: self.calls.clone(),
                fail_on: fail_capture_on,
            }),
            Box::new(FakeKeys {
                presses: self.presses.clone(),
                fail: fail_keys,
            }),
        )
    }
}

fn config(dir: &Path) -> CaptureConfig {
    let mut config = CaptureConfig::new(CaptureRegion::new(100, 100, 16, 12).unwrap(), dir);
    config.start_delay = Duration::ZERO;
    config.interval = Duration::from_millis(50);
    config
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn writes_numbered_pages_and_turns_each_one() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new();

    let mut config = config(dir.path());
    config.base_name = "novel".to_string();
    config.start_page = 7;
    config.max_pages = Some(3);

    let run = harness.spawn(config, None, false).unwrap();
    let summary = tokio::time::timeout(Duration::from_secs(10), run.join())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.stop_reason, StopReason::PageLimit);
    assert_eq!(summary.pages_captured(), 3);
    assert_eq!(summary.next_page, 10);
    assert_eq!(
        files_in(dir.path()),
        ["novel_0007.png", "novel_0008.png", "novel_0009.png"]
    );
    assert_eq!(harness.presses.load(Ordering::SeqCst), 3);

    let page = image::open(dir.path().join("novel_0007.png")).unwrap();
    assert_eq!((page.width(), page.height()), (16, 12));
    assert!(!page.color().has_alpha());
}

#[tokio::test]
async fn stop_during_interval_prevents_next_capture() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new();

    let mut config = config(dir.path());
    config.interval = Duration::from_secs(30);

    let run = harness.spawn(config, None, false).unwrap();
    let mut status = run.subscribe();
    status
        .wait_for(|s| s.pages_captured == 1)
        .await
        .unwrap();

    run.stop();
    let summary = tokio::time::timeout(Duration::from_secs(5), run.join())
        .await
        .expect("stop should interrupt the interval wait")
        .unwrap();

    assert_eq!(summary.stop_reason, StopReason::Cancelled);
    assert_eq!(harness.calls.load(Ordering::SeqCst), 1);
    assert_eq!(files_in(dir.path()), ["capture_0001.png"]);
    assert_eq!(status.borrow().state, RunState::Idle);
    assert_eq!(status.borrow().next_page, 2);
}

#[tokio::test]
async fn stop_during_start_delay_captures_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new();

    let mut config = config(dir.path());
    config.start_delay = Duration::from_secs(30);

    let run = harness.spawn(config, None, false).unwrap();
    assert_eq!(run.status().state, RunState::Starting);
    run.stop();

    let summary = tokio::time::timeout(Duration::from_secs(5), run.join())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.pages_captured(), 0);
    assert_eq!(harness.calls.load(Ordering::SeqCst), 0);
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn capture_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new();

    let run = harness.spawn(config(dir.path()), Some(2), false).unwrap();
    let status = run.subscribe();
    let err = tokio::time::timeout(Duration::from_secs(5), run.join())
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, PageshotError::Capture { .. }));
    assert_eq!(files_in(dir.path()), ["capture_0001.png"]);

    let last = status.borrow().clone();
    assert_eq!(last.state, RunState::Idle);
    assert!(last.error.unwrap().contains("screen went away"));
}

#[tokio::test]
async fn input_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new();

    let run = harness.spawn(config(dir.path()), None, true).unwrap();
    let err = tokio::time::timeout(Duration::from_secs(5), run.join())
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, PageshotError::Input { .. }));
    assert_eq!(harness.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn a_new_run_can_follow_a_failed_one() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new();

    let failed = harness.spawn(config(dir.path()), Some(1), false).unwrap();
    assert!(failed.join().await.is_err());

    let mut next = config(dir.path());
    next.max_pages = Some(1);
    let summary = harness.spawn(next, None, false).unwrap().join().await.unwrap();
    assert_eq!(summary.pages_captured(), 1);
}

#[tokio::test]
async fn configuration_is_snapshotted_at_start() {
    let dir = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let harness = Harness::new();

    let mut config = config(dir.path());
    config.max_pages = Some(2);
    let run = harness.spawn(config.clone(), None, false).unwrap();

    config.output_dir = other.path().to_path_buf();
    config.base_name = "changed".to_string();

    run.join().await.unwrap();
    assert_eq!(files_in(dir.path()).len(), 2);
    assert!(files_in(other.path()).is_empty());
}
