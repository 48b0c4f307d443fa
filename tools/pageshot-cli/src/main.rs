//! PageShot CLI — capture e-reader pages and bind them into a PDF.
//!
//! Usage:
//!   pageshot capture --region L,T,WxH   Screenshot a region and turn pages until Ctrl+C
//!   pageshot assemble <DIR>             Build a PDF from the images in a folder
//!   pageshot list <DIR>                 Show the images a PDF would contain, in order
//!   pageshot check                      Check for capture and input tools

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use pageshot_capture::backend::CaptureBackendKind;
use pageshot_capture::CaptureRegion;
use pageshot_common::config::AppConfig;
use pageshot_common::PageshotError;

mod commands;

#[derive(Parser)]
#[command(
    name = "pageshot",
    about = "Capture e-reader pages and assemble them into a PDF",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/pageshot/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Repeatedly capture a screen region and advance the reader
    Capture {
        /// Region to capture: LEFT,TOP,WIDTHxHEIGHT
        #[arg(short, long, value_parser = parse_region)]
        region: CaptureRegion,

        /// Output directory (must exist)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base filename for pages
        #[arg(short, long)]
        name: Option<String>,

        /// Number of the first page
        #[arg(long)]
        start_page: Option<u32>,

        /// Seconds between pages
        #[arg(long)]
        interval: Option<f64>,

        /// Seconds to wait before the first capture
        #[arg(long)]
        delay: Option<f64>,

        /// Key that advances the reader
        #[arg(long)]
        key: Option<String>,

        /// Do not send any key presses
        #[arg(long)]
        no_advance: bool,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Screen capture backend
        #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
        backend: BackendArg,
    },

    /// Build one PDF from the images in a folder
    Assemble {
        /// Folder containing the page images
        dir: PathBuf,

        /// Output PDF (defaults to <DIR>/<folder name>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image extension to collect
        #[arg(long)]
        ext: Option<String>,

        /// Page resolution
        #[arg(long)]
        dpi: Option<f32>,

        /// Open the PDF when done
        #[arg(long)]
        open: bool,
    },

    /// List the images in a folder in page order
    List {
        /// Folder to scan
        dir: PathBuf,

        /// Image extension to collect
        #[arg(long)]
        ext: Option<String>,
    },

    /// Check for the external capture and input tools
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Auto,
    Grim,
    Import,
    Xcap,
}

impl From<BackendArg> for CaptureBackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => CaptureBackendKind::Auto,
            BackendArg::Grim => CaptureBackendKind::Grim,
            BackendArg::Import => CaptureBackendKind::Import,
            BackendArg::Xcap => CaptureBackendKind::Xcap,
        }
    }
}

fn parse_region(s: &str) -> Result<CaptureRegion, String> {
    s.parse().map_err(|e: PageshotError| e.to_string())
}

/// Exit status for a failed command: 2 when the request was rejected before
/// any work started, 1 otherwise.
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<PageshotError>() {
        Some(e) if e.is_configuration() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    pageshot_common::logging::init_logging(&config.logging, cli.verbose);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    }
}

async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Capture {
            region,
            output,
            name,
            start_page,
            interval,
            delay,
            key,
            no_advance,
            max_pages,
            backend,
        } => {
            let options = commands::capture::CaptureOptions {
                region,
                output,
                name,
                start_page,
                interval,
                delay,
                key,
                advance: !no_advance,
                max_pages,
                backend: backend.into(),
            };
            commands::capture::run(options, &config.capture).await
        }
        Commands::Assemble {
            dir,
            output,
            ext,
            dpi,
            open,
        } => commands::assemble::run(dir, output, ext, dpi, open, &config.assemble),
        Commands::List { dir, ext } => commands::list::run(dir, ext, &config.assemble),
        Commands::Check => commands::check::run(),
    }
}
