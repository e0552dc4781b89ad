//! Assembly of named tables into a single-sheet spreadsheet report.


use std::path::Path;

use anyhow::{Context, Result, anyhow};
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::table::{Cell, Header, NamedTable};

/// Name of the single sheet in the report.
pub const SHEET_NAME: &str = "Data";
/// Blank rows left between the end of one table and the start of the next.
pub const TABLE_GAP_ROWS: u32 = 5;
/// Upper limit of an auto-sized column width.
pub const MAX_COLUMN_WIDTH: u32 = 50;
/// Added to the longest text in a column to give its width.
const COLUMN_WIDTH_PADDING: u32 = 2;

/// ARGB fill of table title cells.
const TITLE_FILL: &str = "FF00FF00";
/// ARGB fill of column header cells.
const HEADER_FILL: &str = "FFFFFF00";

/// Visual style of a cell in the report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CellStyle {
    Plain,
    /// Bold on a green fill.
    Title,
    /// Bold on a yellow fill.
    Header,
}

/// Value of a cell in the report.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// The cell is styled but holds no value.
    Blank,
}

impl CellValue {
    fn rendered_len(&self) -> u32 {
        let len = match self {
            CellValue::Text(text) => text.chars().count(),
            CellValue::Number(value) => Cell::Number(*value).render().chars().count(),
            CellValue::Blank => 0,
        };
        len as u32
    }
}

/// A single cell placed in the report. Rows and columns start at 1.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedCell {
    pub row: u32,
    pub column: u32,
    pub value: CellValue,
    pub style: CellStyle,
}

/// Complete cell layout of the report sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetLayout {
    /// Cells in the order they were placed.
    pub cells: Vec<PlacedCell>,
    /// Width of each column, starting with column 1.
    pub column_widths: Vec<u32>,
}

impl SheetLayout {
    /// Lays out `tables` top to bottom, in order.
    ///
    /// For each table: a title row followed by a blank row (omitted when the name is empty), a
    /// header row, then the data rows. Consecutive tables are separated by [TABLE_GAP_ROWS] blank
    /// rows.
    pub fn new(tables: &[NamedTable]) -> Self {
        let mut layout = Self::default();
        let mut current_row: u32 = 1;

        for (table_index, named) in tables.iter().enumerate() {
            log::info!("Adding table {}: {}", table_index + 1, named.name);

            if !named.name.is_empty() {
                layout.place(
                    current_row,
                    1,
                    CellValue::Text(named.name.clone()),
                    CellStyle::Title,
                );
                current_row += 2;
            }

            for (column, header) in (1..).zip(named.table.headers()) {
                let value = match header {
                    Header::Named(name) => CellValue::Text(name.clone()),
                    Header::Unnamed => CellValue::Blank,
                };
                layout.place(current_row, column, value, CellStyle::Header);
            }
            current_row += 1;

            for row in named.table.rows() {
                for (column, cell) in (1..).zip(row.iter()) {
                    let value = match cell {
                        Cell::Text(text) => CellValue::Text(text.clone()),
                        Cell::Number(value) => CellValue::Number(*value),
                        Cell::Missing => continue,
                    };
                    layout.place(current_row, column, value, CellStyle::Plain);
                }
                current_row += 1;
            }

            if table_index + 1 < tables.len() {
                current_row += TABLE_GAP_ROWS;
            }
        }

        layout.size_columns();
        layout
    }

    fn place(&mut self, row: u32, column: u32, value: CellValue, style: CellStyle) {
        self.cells.push(PlacedCell {
            row,
            column,
            value,
            style,
        });
    }

    fn size_columns(&mut self) {
        let num_columns = self.cells.iter().map(|cell| cell.column).max().unwrap_or(0);
        let mut max_lens = vec![0u32; num_columns as usize];
        for cell in &self.cells {
            let max_len = &mut max_lens[(cell.column - 1) as usize];
            *max_len = (*max_len).max(cell.value.rendered_len());
        }
        self.column_widths = max_lens
            .into_iter()
            .map(|max_len| (max_len + COLUMN_WIDTH_PADDING).min(MAX_COLUMN_WIDTH))
            .collect();
    }

    /// Builds a workbook containing the layout on a single sheet named [SHEET_NAME].
    pub fn to_workbook(&self) -> Result<Spreadsheet> {
        let mut book = umya_spreadsheet::new_file_empty_worksheet();
        let sheet = book
            .new_sheet(SHEET_NAME)
            .map_err(|err| anyhow!("creating sheet {SHEET_NAME:?}: {err}"))?;
        self.fill_sheet(sheet);
        Ok(book)
    }

    fn fill_sheet(&self, sheet: &mut Worksheet) {
        for placed in &self.cells {
            let coordinate = (placed.column, placed.row);
            let cell = sheet.get_cell_mut(coordinate);
            match &placed.value {
                CellValue::Text(text) => {
                    cell.set_value(text.clone());
                }
                CellValue::Number(value) => {
                    cell.set_value_number(*value);
                }
                CellValue::Blank => {}
            }

            let fill = match placed.style {
                CellStyle::Plain => continue,
                CellStyle::Title => TITLE_FILL,
                CellStyle::Header => HEADER_FILL,
            };
            let style = sheet.get_style_mut(coordinate);
            style.set_background_color(fill);
            style.get_font_mut().set_bold(true);
        }

        for (column, width) in (1..).zip(&self.column_widths) {
            sheet
                .get_column_dimension_mut(&column_letters(column))
                .set_width(f64::from(*width));
        }
    }
}

/// Returns the spreadsheet letters of a column, where column 1 is `A`.
fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let remainder = (column - 1) % 26;
        letters.push(char::from(b'A' + remainder as u8));
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Lays out `tables` and writes them as an XLSX file at `output_path`.
pub fn write_report(tables: &[NamedTable], output_path: &Path) -> Result<()> {
    let book = SheetLayout::new(tables).to_workbook()?;
    umya_spreadsheet::writer::xlsx::write(&book, output_path)
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("writing spreadsheet to {output_path:?}"))
}

/// Writes the report as [write_report] does, logging any failure instead of returning it.
///
/// Returns `true` if the report was written.
pub fn save_report(tables: &[NamedTable], output_path: &Path) -> bool {
    match write_report(tables, output_path) {
        Ok(()) => {
            log::info!(
                "Successfully saved {} tables to: {output_path:?}",
                tables.len()
            );
            true
        }
        Err(err) => {
            log::error!("Error saving to Excel: {err:#}");
            false
        }
    }
}
