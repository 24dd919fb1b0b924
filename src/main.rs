use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use olyph_widget::api::{ApiError, HttpApi, ReportFormat};
use olyph_widget::config::{ConfigError, WidgetConfig, validate_url};
use olyph_widget::terminal::{TerminalView, dispatch};
use olyph_widget::widget::ChatWidget;
use olyph_widget::widget::timer::Scheduler;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

/// Flags override the `OLYPH_*` environment; unset flags keep its values.
#[derive(Parser, Debug)]
#[command(name = "olyph-widget", about = "Olyph AI support chat in the terminal")]
struct Cli {
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    survey_form_url: Option<String>,

    #[arg(long)]
    followup_delay_secs: Option<u64>,

    #[arg(long)]
    quick_reply_lifetime_secs: Option<u64>,

    #[arg(long)]
    report_format: Option<ReportFormat>,

    /// Where downloaded reports are written.
    #[arg(long, env = "OLYPH_DOWNLOAD_DIR", default_value = ".")]
    download_dir: PathBuf,
}

impl Cli {
    fn apply(&self, mut config: WidgetConfig) -> Result<WidgetConfig, ConfigError> {
        if let Some(url) = &self.base_url {
            config.base_url = validate_url("--base-url", url.clone())?.trim_end_matches('/').to_string();
        }
        if let Some(url) = &self.survey_form_url {
            config.survey_form_url = validate_url("--survey-form-url", url.clone())?;
        }
        if let Some(secs) = self.followup_delay_secs {
            config.followup_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.quick_reply_lifetime_secs {
            config.quick_reply_lifetime = Duration::from_secs(secs);
        }
        if let Some(format) = self.report_format {
            config.report_format = format;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("olyph_widget=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "olyph-widget failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), HostError> {
    let config = cli.apply(WidgetConfig::from_env()?)?;
    let api = HttpApi::new(&config)?;
    tracing::info!(base_url = %config.base_url, "widget starting");

    let (scheduler, mut events) = Scheduler::channel();
    let view = TerminalView::new(std::io::stdout(), cli.download_dir);
    let mut widget = ChatWidget::new(config, view, Arc::new(api), scheduler);
    widget.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !dispatch(&mut widget, &line).await {
                    break;
                }
            }
            Some(event) = events.recv() => widget.handle_event(event),
        }
    }
    tracing::info!("widget stopped");
    Ok(())
}
