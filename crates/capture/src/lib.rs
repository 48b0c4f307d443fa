//! PageShot Capture
//!
//! Repeatedly screenshots a fixed screen rectangle, saves each shot as a
//! numbered page, and sends a key press to turn the page in the reader.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 capture task                  │
//! │  ┌───────────────┐        ┌────────────────┐  │
//! │  │ ScreenCapturer│        │  PageTurner    │  │
//! │  └───────┬───────┘        └───────▲────────┘  │
//! │          │ region shot            │ "right"   │
//! │          ▼                        │           │
//! │   normalize ─► {base}_{page:04}.png ─► next   │
//! └──────────┬────────────────────────────────────┘
//!            │ watch<RunStatus>      ▲ watch<bool> (stop)
//!            ▼                       │
//!        CaptureRun handle (front end)
//! ```
//!
//! The run's configuration is copied into the task when it starts. The
//! collaborators are moved into the task and never shared.

pub mod backend;
pub mod config;
pub mod region;
pub mod session;

pub use backend::{PageTurner, ScreenCapturer};
pub use config::{CaptureConfig, MIN_INTERVAL};
pub use region::{CaptureRegion, MIN_REGION_SIDE};
pub use session::{CaptureRun, RunState, RunStatus, RunSummary, StopReason};
