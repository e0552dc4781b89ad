//! Reads tables from a PDF using Tabula templates.

pub mod singlethreaded;
#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{extract::TableReader, table::Table};

/// Required trait for making a single extraction call to Tabula for table(s) extraction.
pub trait TabulaExtractor {
    fn extract_tables(&self, request: TabulaExtractionRequest) -> Result<JsonTableSet>;
}

/// Single request to a [TabulaExtractor] to extract tables from a region of a PDF page.
#[derive(Clone, Debug, PartialEq)]
pub struct TabulaExtractionRequest {
    pub pdf_path: PathBuf,
    pub page: i32,
    pub area: TemplateArea,
    pub method: TemplateExtractionMethod,
}

/// Region of a page in Tabula's coordinate system, where the origin is the top left of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Extraction algorithm named by a template entry.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TemplateExtractionMethod {
    Guess,
    Lattice,
    Stream,
}

/// Selects the extraction algorithm used for every template entry.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    PartialEq,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExtractionMode {
    /// Always use stream extraction, regardless of the template.
    #[default]
    Stream,
    /// Always use lattice extraction, regardless of the template.
    Lattice,
    /// Always let Tabula guess, regardless of the template.
    Guess,
    /// Use the extraction method named by each template entry.
    Template,
}

impl ExtractionMode {
    fn method_for(self, entry: &TemplateEntry) -> TemplateExtractionMethod {
        match self {
            ExtractionMode::Stream => TemplateExtractionMethod::Stream,
            ExtractionMode::Lattice => TemplateExtractionMethod::Lattice,
            ExtractionMode::Guess => TemplateExtractionMethod::Guess,
            ExtractionMode::Template => entry.extraction_method,
        }
    }
}

/// Contents of a Tabula template file, as saved by the Tabula web application.
#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub struct Template(pub Vec<TemplateEntry>);

impl Template {
    /// Loads a template from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening Tabula template {path:?}"))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("parsing Tabula template {path:?}"))
    }
}

/// A single region to extract, from a Tabula template.
#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct TemplateEntry {
    pub page: i32,
    pub extraction_method: TemplateExtractionMethod,
    /// Position of the left side of the rectangle.
    pub x1: f32,
    /// Position of the right side of the rectangle.
    pub x2: f32,
    /// Position of the top side of the rectangle.
    pub y1: f32,
    /// Position of the bottom side of the rectangle.
    pub y2: f32,
    pub width: f32,
    pub height: f32,
}

impl TemplateEntry {
    fn area(&self) -> TemplateArea {
        TemplateArea {
            left: self.x1,
            top: self.y1,
            right: self.x2,
            bottom: self.y2,
        }
    }
}

/// A sequence of extracted tables from a PDF file.
#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub struct JsonTableSet(pub Vec<JsonTable>);

/// A single extracted table from a PDF file.
#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct JsonTable {
    pub extraction_method: String,
    pub page_number: i32,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub right: f32,
    pub bottom: f32,
    pub data: Vec<JsonRow>,
}

/// A single extracted table row from a PDF file.
#[derive(Deserialize, Debug)]
pub struct JsonRow(pub Vec<JsonCell>);

/// A single extracted table cell from a PDF file.
#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct JsonCell {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
}

impl From<JsonTable> for Table {
    fn from(value: JsonTable) -> Self {
        Table::from_extracted_text(
            value
                .data
                .into_iter()
                .map(|row| row.0.into_iter().map(|cell| cell.text).collect())
                .collect(),
        )
    }
}

/// [TableReader] that loads Tabula templates and extracts every region they describe.
pub struct TemplateTableReader<E> {
    extractor: E,
    mode: ExtractionMode,
}

impl<E> TemplateTableReader<E>
where
    E: TabulaExtractor,
{
    pub fn new(extractor: E, mode: ExtractionMode) -> Self {
        Self { extractor, mode }
    }
}

impl<E> TableReader for TemplateTableReader<E>
where
    E: TabulaExtractor,
{
    fn read_tables(&self, pdf_path: &Path, template_path: &Path) -> Result<Vec<Table>> {
        let template = Template::load(template_path)?;

        let mut tables = Vec::new();
        for (entry_index, entry) in template.0.iter().enumerate() {
            let request = TabulaExtractionRequest {
                pdf_path: pdf_path.to_owned(),
                page: entry.page,
                area: entry.area(),
                method: self.mode.method_for(entry),
            };
            let table_set = self.extractor.extract_tables(request).with_context(|| {
                format!("extracting region {entry_index} on page {}", entry.page)
            })?;
            tables.extend(table_set.0.into_iter().map(Table::from));
        }

        log::debug!(
            "Found {} table(s) using template {template_path:?}",
            tables.len()
        );
        Ok(tables)
    }
}
