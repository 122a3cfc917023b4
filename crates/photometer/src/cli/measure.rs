use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use photometer::{
    CaptureOutcome, Config, ImageSource, MeasurementResult, Notifier, PersistentLog,
    QueuedImages, RequestKind, ResponseFormatter, ResultOrchestrator, Severity,
    SharedResultState,
};
use photometer_fetch::{ProcessedImageFetcher, ReqwestClient, UploadClient};
use tracing::debug;

use crate::ui::spinner::LoadingSpinnerBuilder;

#[derive(Clone, Debug, Args)]
pub struct MeasureArg {
    /// Images to measure, one capture each, in order.
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Which model(s) to ask for: absorbance, concentration or both.
    #[arg(long, short)]
    pub kind: Option<RequestKind>,

    /// Do not draw the loading spinner.
    #[arg(long)]
    pub quiet: bool,
}

/// Prints notifications to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => eprintln!("{}", style(message).cyan()),
            Severity::Error => eprintln!("{}", style(message).red().bold()),
        }
    }
}

impl MeasureArg {
    pub fn run(self, config: &Config) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        runtime.block_on(self.measure(config))
    }

    async fn measure(self, config: &Config) -> Result<()> {
        let kind = self.kind.unwrap_or(config.request_kind);
        let client = Arc::new(ReqwestClient::new()?);
        let log = Arc::new(PersistentLog::new(super::open_store(config)?));

        let orchestrator = ResultOrchestrator::new(
            UploadClient::new(client.clone(), config.upload_options()),
            ProcessedImageFetcher::new(client, config.processed_image_dir()?)
                .base_url(config.processed_image_base.clone())
                .timeout(config.fetch_timeout()),
            ResponseFormatter::new(kind).concentration_unit(config.concentration_unit.clone()),
            log,
            SharedResultState::new(),
            Arc::new(ConsoleNotifier),
        );
        let source = QueuedImages::new(self.images);
        let mut states = orchestrator.subscribe();
        let spinner = LoadingSpinnerBuilder::default()
            .with_prefix("Measuring")
            .hidden(self.quiet);

        let mut failures = 0usize;
        while let Some(image) = source.pick().await {
            let spinner = spinner.clone().build();
            spinner.message(image.display().to_string());

            let capture = orchestrator.capture(image);
            tokio::pin!(capture);
            let outcome = loop {
                tokio::select! {
                    outcome = &mut capture => break outcome,
                    Ok(()) = states.changed() => {
                        if states.borrow_and_update().result().is_some() {
                            spinner.message("fetching processed image");
                        }
                    }
                }
            };
            spinner.clear();

            match outcome {
                CaptureOutcome::Displayed(_) => match orchestrator.shared().consume() {
                    Some(result) => print_result(&result),
                    None => debug!("displayed result already replaced"),
                },
                CaptureOutcome::Failed(_) => failures += 1,
                CaptureOutcome::Superseded => {}
            }
        }

        if failures > 0 {
            anyhow::bail!("{failures} measurement(s) failed");
        }
        Ok(())
    }
}

fn print_result(result: &MeasurementResult) {
    let label = |name: &str| style(format!("{name:>14}")).cyan().bold();

    println!("{} {}", label("Image"), result.raw_image_path().display());
    if let Some(concentration) = result.concentration_text() {
        println!("{} {concentration}", label("Concentration"));
    }
    if let Some(absorbance) = result.absorbance_text() {
        println!("{} {absorbance}", label("Absorbance"));
    }
    println!("{} {}", label("RGB"), result.rgb_text());
    println!("{} {}", label("Color"), result.color_type());
    if let Some(path) = result.processed_image_path() {
        println!("{} {}", label("Processed"), path.display());
    }
    println!();
}
