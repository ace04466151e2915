//! gemini-export command line
//!
//! Exports the Gemini conversation from a browser tab or a saved page.

use anyhow::Context;
use clap::Parser;
use gemini_export::browser::{self, BrowserSession, ConnectionOptions, LaunchOptions, LivePage};
use gemini_export::delivery::{self, FileDelivery};
use gemini_export::transcript::{PageSelectors, StaticPage, TranscriptExtractor};
use gemini_export::{ExportFormat, ExportRequest, ExportResponse, ExportStatus, Exporter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gemini-export")]
#[command(version)]
#[command(about = "Export a Gemini conversation to HTML, JSON, or Markdown", long_about = None)]
struct Cli {
    /// Output format: html, json, or md
    #[arg(long, short = 'f', default_value = "html")]
    format: ExportFormat,

    /// Read a saved page instead of a live browser tab
    #[arg(long, short = 'i', value_name = "FILE")]
    input: Option<PathBuf>,

    /// Source URL recorded for a saved page
    #[arg(long, value_name = "URL", requires = "input")]
    source_url: Option<String>,

    /// WebSocket endpoint of a running browser to attach to
    #[arg(long, value_name = "URL", conflicts_with = "input")]
    ws_endpoint: Option<String>,

    /// Conversation URL to open before exporting
    #[arg(long, value_name = "URL", conflicts_with = "input")]
    url: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// Browser profile directory (must be signed in to Gemini)
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Directory to save into
    #[arg(long, short = 'o', value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Exact file name to save as (default: <title>_<date>_<time>.<ext>)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn open_session(cli: &Cli) -> anyhow::Result<BrowserSession> {
    if let Some(endpoint) = &cli.ws_endpoint {
        return BrowserSession::connect(ConnectionOptions::new(endpoint))
            .context("Failed to connect. Is the browser running with remote debugging enabled?");
    }

    let mut options = LaunchOptions::new().headless(!cli.headed);
    if let Some(path) = &cli.chrome_path {
        options = options.chrome_path(path);
    }
    if let Some(dir) = &cli.user_data_dir {
        options = options.user_data_dir(dir);
    }
    Ok(BrowserSession::launch(options)?)
}

async fn export_live(
    cli: &Cli,
    extractor: TranscriptExtractor,
    sender: delivery::DeliverySender,
) -> anyhow::Result<ExportResponse> {
    let session = open_session(cli)?;

    let tab = match &cli.url {
        Some(url) => {
            browser::ensure_supported_url(url)?;
            session.navigate(url)?
        }
        None => session
            .find_tab(browser::GEMINI_ORIGIN)
            .or_else(|_| session.get_active_tab())?,
    };
    browser::ensure_supported_url(&tab.get_url())?;

    let page = LivePage::with_selectors(tab, extractor.selectors());
    let exporter = Exporter::new(page, extractor, sender);
    Ok(exporter.handle(ExportRequest::new(cli.format)).await?)
}

async fn export_saved(
    cli: &Cli,
    input: &Path,
    extractor: TranscriptExtractor,
    sender: delivery::DeliverySender,
) -> anyhow::Result<ExportResponse> {
    let source_url = cli
        .source_url
        .clone()
        .unwrap_or_else(|| format!("file://{}", input.display()));
    let page = StaticPage::from_file(input, source_url)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let exporter = Exporter::new(page, extractor, sender);
    Ok(exporter.handle(ExportRequest::new(cli.format)).await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut file_delivery = FileDelivery::new(&cli.output_dir);
    if let Some(output) = &cli.output {
        file_delivery = file_delivery.with_file_name(output);
    }
    let (sender, relay) = delivery::spawn(file_delivery);
    let extractor = TranscriptExtractor::new(PageSelectors::default())?;

    eprintln!("Exporting...");
    let mut response = match &cli.input {
        Some(input) => export_saved(&cli, input, extractor, sender).await?,
        None => export_live(&cli, extractor, sender).await?,
    };

    if response.status == ExportStatus::NothingToExport {
        eprintln!("No conversation found on this page.");
        return Ok(());
    }

    if let Some(pending) = response.pending() {
        match pending.wait().await {
            Ok(receipt) => {
                eprintln!(
                    "Saved {} turns from \"{}\" to {}",
                    response.turns,
                    response.title.as_deref().unwrap_or_default(),
                    receipt.path.display()
                );
            }
            Err(e) => {
                eprintln!("Export failed: could not save the file ({})", e);
                std::process::exit(1);
            }
        }
    }

    relay.await?;
    Ok(())
}
