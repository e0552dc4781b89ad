use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};

use crate::{extract::TableReader, table::Table};

/// Canned response of a [FakeTableReader] for a template.
pub enum FakeResponse {
    Tables(Vec<Table>),
    Error(&'static str),
}

/// [TableReader] that returns canned responses keyed by template path, recording each call.
pub struct FakeTableReader {
    responses: HashMap<PathBuf, FakeResponse>,
    calls: RefCell<Vec<PathBuf>>,
}

impl FakeTableReader {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn respond<P: Into<PathBuf>>(&mut self, template_path: P, response: FakeResponse) {
        self.responses.insert(template_path.into(), response);
    }

    /// Template paths that were read from, in call order.
    pub fn calls_snapshot(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl TableReader for FakeTableReader {
    fn read_tables(&self, _pdf_path: &Path, template_path: &Path) -> Result<Vec<Table>> {
        self.calls.borrow_mut().push(template_path.to_owned());
        match self.responses.get(template_path) {
            Some(FakeResponse::Tables(tables)) => Ok(tables.clone()),
            Some(FakeResponse::Error(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!("no response configured for {template_path:?}")),
        }
    }
}

/// Creates a [Table] of text cells whose first row holds the headers.
pub fn text_table(rows: &[&[&str]]) -> Table {
    Table::from_extracted_text(
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}
