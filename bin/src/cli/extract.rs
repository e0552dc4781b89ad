use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pipeline::{
    batch::{Batch, BatchEvent, BatchEvents, BatchOutcome, IndexOutcome},
    report,
    tabula_wrapper::{
        ExtractionMode, TemplateTableReader, singlethreaded::SingleThreadedTabulaExtractor,
    },
};
use simple_bar::ProgressBar;

use crate::config::FileConfig;

/// Extracts every templated table from a PDF into a single-sheet XLSX report.
#[derive(Args, Debug)]
pub struct Command {
    /// Path to input PDF.
    pdf: PathBuf,

    /// Path to a YAML file with default values for any of the options below.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory containing the Tabula templates.
    ///
    /// Templates are named `{index}_table_name.{ext}` and `{index}_table_data.{ext}`, with
    /// `{index}.{ext}` accepted in place of the data template.
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Extension of the template files, without the leading dot.
    #[arg(long)]
    template_extension: Option<String>,

    /// Highest table index to look for templates for.
    #[arg(long)]
    max_index: Option<u32>,

    /// Path to write the XLSX report to.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// How Tabula finds tables within each template region: stream, lattice, guess, or template
    /// to use the method saved in each template.
    #[arg(long)]
    mode: Option<ExtractionMode>,

    /// Path to Tabula JAR file.
    #[arg(long)]
    tabula_libpath: Option<String>,

    /// Hide the progress bar.
    #[arg(long, default_value = "false")]
    no_progress: bool,
}

impl Command {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            template_dir: self.template_dir.clone(),
            template_extension: self.template_extension.clone(),
            max_index: self.max_index,
            output: self.output.clone(),
            mode: self.mode,
            tabula_libpath: self.tabula_libpath.clone(),
        }
    }
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    let file_config = match &cmd.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = file_config
        .overridden_by(cmd.overrides())
        .resolve(cmd.pdf.clone())?;

    log::info!("Processing PDF: {:?}", settings.batch.pdf_path);

    let vm = tabula::TabulaVM::new(&settings.tabula_libpath, false)
        .with_context(|| "initialising Tabula")?;
    let env = vm.attach().with_context(|| "attaching to TabulaVM")?;
    let reader = TemplateTableReader::new(
        SingleThreadedTabulaExtractor::new(env),
        settings.batch.extraction_mode,
    );

    let mut events = EventDisplayer::new(!cmd.no_progress);
    let outcome = Batch::new(&settings.batch, &reader).run(&mut events);

    if outcome.tables.is_empty() {
        log::warn!("No tables were successfully extracted");
        return Ok(());
    }

    if report::save_report(&outcome.tables, &settings.output) {
        log_summary(&outcome);
    }

    Ok(())
}

fn log_summary(outcome: &BatchOutcome) {
    let mut no_template = 0;
    let mut no_data = 0;
    let mut failed = 0;
    for index_outcome in outcome.indices.values() {
        match index_outcome {
            IndexOutcome::Added => {}
            IndexOutcome::NoTemplate => no_template += 1,
            IndexOutcome::NoData => no_data += 1,
            IndexOutcome::Failed(_) => failed += 1,
        }
    }
    log::info!(
        "Extracted {} tables ({no_template} without templates, {no_data} without data, {failed} failed)",
        outcome.tables.len()
    );
}

struct EventDisplayer {
    show_progress: bool,
    progress_bar: Option<ProgressBar>,
}

impl EventDisplayer {
    fn new(show_progress: bool) -> Self {
        EventDisplayer {
            show_progress,
            progress_bar: None,
        }
    }
}

impl BatchEvents for EventDisplayer {
    fn on_event(&mut self, event: BatchEvent<'_>) {
        match event {
            BatchEvent::Progress { total, .. } => {
                if !self.show_progress {
                    return;
                }

                self.progress_bar
                    .get_or_insert_with(|| ProgressBar::cargo_style(total as u32, 80, true))
                    .update();
            }
            BatchEvent::Completed { num_tables } => {
                eprintln!("Extraction complete, {num_tables} tables found.");
            }
        }
    }
}
