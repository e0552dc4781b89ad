//! Extraction of table names and data through a [TableReader], isolating failures to the single
//! call that produced them.


use std::path::Path;

use anyhow::Result;

use crate::{clean::clean, table::Table};

/// Reads the tables within the region(s) described by a template.
pub trait TableReader {
    /// Reads table(s) from a PDF, based on the template.
    /// * `pdf_path` Path to PDF to read from.
    /// * `template_path` Path to the template file describing the region(s) to read.
    fn read_tables(&self, pdf_path: &Path, template_path: &Path) -> Result<Vec<Table>>;
}

/// Outcome of a single extraction step.
#[derive(Debug)]
pub enum ExtractOutcome<T> {
    /// A usable value was extracted.
    Extracted(T),
    /// Extraction succeeded, but produced nothing usable.
    Empty,
    /// Extraction failed.
    Failed(anyhow::Error),
}

impl<T> ExtractOutcome<T> {
    /// Returns the extracted value, if any.
    pub fn extracted(self) -> Option<T> {
        match self {
            ExtractOutcome::Extracted(value) => Some(value),
            ExtractOutcome::Empty | ExtractOutcome::Failed(_) => None,
        }
    }

    fn and_then<U, F>(self, f: F) -> ExtractOutcome<U>
    where
        F: FnOnce(T) -> ExtractOutcome<U>,
    {
        match self {
            ExtractOutcome::Extracted(value) => f(value),
            ExtractOutcome::Empty => ExtractOutcome::Empty,
            ExtractOutcome::Failed(err) => ExtractOutcome::Failed(err),
        }
    }
}

/// NOTE: the equality comparison does not compare the underlying errors of
/// [ExtractOutcome::Failed], regarding any two failures as equal.
impl<T: PartialEq> PartialEq for ExtractOutcome<T> {
    fn eq(&self, other: &Self) -> bool {
        use ExtractOutcome::*;
        match (self, other) {
            (Extracted(value_self), Extracted(value_other)) => value_self == value_other,
            (Empty, Empty) => true,
            (Failed(_), Failed(_)) => true,
            _ => false,
        }
    }
}

/// Reads all tables described by `template_path`.
///
/// A failure of the underlying reader is logged and returned as [ExtractOutcome::Failed] rather
/// than propagated.
pub fn extract(
    reader: &dyn TableReader,
    pdf_path: &Path,
    template_path: &Path,
) -> ExtractOutcome<Vec<Table>> {
    log::debug!("Reading {pdf_path:?} using template {template_path:?}");
    match reader.read_tables(pdf_path, template_path) {
        Ok(tables) if tables.is_empty() => {
            log::info!("No tables found using template {template_path:?}");
            ExtractOutcome::Empty
        }
        Ok(tables) => ExtractOutcome::Extracted(tables),
        Err(err) => {
            log::warn!("Error extracting using template {template_path:?}: {err:#}");
            ExtractOutcome::Failed(err)
        }
    }
}

/// Extracts a table name: the trimmed text of the first column header of the first table.
pub fn extract_table_name(
    reader: &dyn TableReader,
    pdf_path: &Path,
    template_path: &Path,
) -> ExtractOutcome<String> {
    extract(reader, pdf_path, template_path).and_then(|tables| {
        let name = tables
            .first()
            .and_then(|table| table.headers().first())
            .map(|header| header.display().trim())
            .unwrap_or_default();
        if name.is_empty() {
            ExtractOutcome::Empty
        } else {
            ExtractOutcome::Extracted(name.to_string())
        }
    })
}

/// Extracts and cleans table data.
///
/// Only the first table read from the template is used. A template is expected to describe
/// exactly one table, so any further tables are logged and discarded.
pub fn extract_table_data(
    reader: &dyn TableReader,
    pdf_path: &Path,
    template_path: &Path,
) -> ExtractOutcome<Table> {
    extract(reader, pdf_path, template_path).and_then(|tables| {
        let num_tables = tables.len();
        if num_tables > 1 {
            log::debug!(
                "Ignoring {} additional table(s) from template {template_path:?}",
                num_tables - 1
            );
        }

        match tables.into_iter().next().map(clean) {
            Some(table) if !table.is_empty() => {
                log::debug!("Table shape: ({}, {})", table.height(), table.width());
                ExtractOutcome::Extracted(table)
            }
            _ => ExtractOutcome::Empty,
        }
    })
}
