//! Batch extraction of every indexed table from a single PDF.


use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    extract::{self, ExtractOutcome, TableReader},
    table::NamedTable,
    tabula_wrapper::ExtractionMode,
    template::{DEFAULT_TEMPLATE_EXTENSION, TemplateDir},
};

/// Number of table indices probed when not otherwise configured.
pub const DEFAULT_MAX_INDEX: u32 = 69;

/// Specifies the inputs of a [Batch].
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    pub pdf_path: PathBuf,
    pub template_dir: PathBuf,
    /// Extension of template files, without the leading dot.
    pub template_extension: String,
    /// Highest table index to probe for templates. Indices start at 1.
    pub max_index: u32,
    pub extraction_mode: ExtractionMode,
}

impl BatchConfig {
    pub fn new<P, T>(pdf_path: P, template_dir: T) -> Self
    where
        P: Into<PathBuf>,
        T: Into<PathBuf>,
    {
        Self {
            pdf_path: pdf_path.into(),
            template_dir: template_dir.into(),
            template_extension: DEFAULT_TEMPLATE_EXTENSION.to_string(),
            max_index: DEFAULT_MAX_INDEX,
            extraction_mode: ExtractionMode::default(),
        }
    }

    pub fn template_dir(&self) -> TemplateDir {
        TemplateDir::new(&self.template_dir, &self.template_extension)
    }
}

/// What happened to a single table index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IndexOutcome {
    /// A table was added to the results.
    Added,
    /// No data template exists for the index, so nothing was extracted.
    NoTemplate,
    /// The data template produced no usable data.
    NoData,
    /// Extracting the data failed, with the given reason.
    Failed(String),
}

/// Describes the outcome of a whole batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Extracted tables, in ascending index order.
    pub tables: Vec<NamedTable>,
    pub indices: BTreeMap<u32, IndexOutcome>,
}

/// Batch event emitted to track progress.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// Processing of a single index has finished.
    Progress {
        index: u32,
        outcome: &'a IndexOutcome,
        completed: usize,
        total: usize,
    },
    /// Indicates that the batch has completed and that no more events will follow.
    Completed { num_tables: usize },
}

/// Trait to implement to receive notifications about batch events.
pub trait BatchEvents {
    fn on_event(&mut self, event: BatchEvent<'_>);
}

/// [BatchEvents] implementation that discards all events.
pub struct NoEvents;

impl BatchEvents for NoEvents {
    fn on_event(&mut self, _event: BatchEvent<'_>) {}
}

/// Extracts the tables of a single PDF, one table index at a time.
pub struct Batch<'a> {
    config: &'a BatchConfig,
    reader: &'a dyn TableReader,
}

impl<'a> Batch<'a> {
    pub fn new(config: &'a BatchConfig, reader: &'a dyn TableReader) -> Self {
        Self { config, reader }
    }

    /// Processes every index from 1 to `max_index` inclusive, in order.
    ///
    /// No index affects the processing of any other index; failures are recorded in the
    /// returned [BatchOutcome] rather than stopping the batch.
    pub fn run(&self, events: &mut dyn BatchEvents) -> BatchOutcome {
        let templates = self.config.template_dir();
        let total = self.config.max_index as usize;
        let mut outcome = BatchOutcome::default();

        log::info!(
            "Processing {} templates from {:?}...",
            self.config.max_index,
            templates.dir()
        );

        for (i, index) in (1..=self.config.max_index).enumerate() {
            log::info!("Processing template {index}");
            let (index_outcome, table) = self.process_index(&templates, index);
            if let Some(table) = table {
                outcome.tables.push(table);
            }

            events.on_event(BatchEvent::Progress {
                index,
                outcome: &index_outcome,
                completed: i + 1,
                total,
            });
            outcome.indices.insert(index, index_outcome);
        }

        events.on_event(BatchEvent::Completed {
            num_tables: outcome.tables.len(),
        });
        outcome
    }

    fn process_index(
        &self,
        templates: &TemplateDir,
        index: u32,
    ) -> (IndexOutcome, Option<NamedTable>) {
        let resolved = templates.resolve(index);

        let Some(data_template) = resolved.data else {
            log::info!("Skipping template {index} - no template file found");
            return (IndexOutcome::NoTemplate, None);
        };

        let pdf_path = &self.config.pdf_path;
        let name = resolved
            .name
            .and_then(|name_template| {
                extract::extract_table_name(self.reader, pdf_path, &name_template).extracted()
            })
            .unwrap_or_else(|| format!("Table {index}"));
        log::info!("Table name: {name}");

        match extract::extract_table_data(self.reader, pdf_path, &data_template.path) {
            ExtractOutcome::Extracted(table) => {
                log::info!(
                    "Extracted table with shape: ({}, {})",
                    table.height(),
                    table.width()
                );
                log_preview(&table);
                (IndexOutcome::Added, Some(NamedTable::new(name, table)))
            }
            ExtractOutcome::Empty => {
                log::info!("No valid table data extracted for template {index}");
                (IndexOutcome::NoData, None)
            }
            ExtractOutcome::Failed(err) => (IndexOutcome::Failed(format!("{err:#}")), None),
        }
    }
}

/// Number of rows shown when previewing an extracted table.
const PREVIEW_ROWS: usize = 3;

fn log_preview(table: &crate::table::Table) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    for row in table.rows().iter().take(PREVIEW_ROWS) {
        let cells: Vec<String> = row.iter().map(|cell| cell.render()).collect();
        log::debug!("  {}", cells.join(" | "));
    }
}
