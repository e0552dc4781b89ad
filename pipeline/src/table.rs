//! In-memory representation of extracted tables.


use std::ops::{Deref, DerefMut};

/// Placeholder text that stands for a missing value. Blank text is also read as missing.
const MISSING_MARKER: &str = "nan";

/// A single value within a [Table].
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// No value was present.
    Missing,
}

impl Cell {
    /// Returns `true` if the cell holds no meaningful value, i.e. it is [Cell::Missing] or text
    /// that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) => false,
            Cell::Missing => true,
        }
    }

    /// Renders the cell as it would be displayed in the report.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => render_number(*value),
            Cell::Missing => String::new(),
        }
    }

    /// Interprets a raw text value extracted from a PDF, mapping blank text and the
    /// [MISSING_MARKER] to [Cell::Missing]. Any other text, such as `N/A`, is kept.
    fn from_extracted_text(text: String) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == MISSING_MARKER {
            Cell::Missing
        } else {
            Cell::Text(text)
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

fn render_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Column header of a [Table].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Header {
    Named(String),
    /// The column has no header text.
    Unnamed,
}

impl Header {
    /// Text to display for the header, which is empty for [Header::Unnamed].
    pub fn display(&self) -> &str {
        match self {
            Header::Named(name) => name,
            Header::Unnamed => "",
        }
    }

    fn from_extracted_text(text: String) -> Self {
        if text.trim().is_empty() {
            Header::Unnamed
        } else {
            Header::Named(text)
        }
    }
}

impl From<&str> for Header {
    fn from(value: &str) -> Self {
        Header::Named(value.to_string())
    }
}

/// Kind of values held in a column, as inferred from its cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnKind {
    Text,
    /// Every non-missing cell is a [Cell::Number].
    Numeric,
}

/// A single row of [Cell]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row(pub Vec<Cell>);

impl Deref for Row {
    type Target = Vec<Cell>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Row {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<C, S> From<C> for Row
where
    C: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    fn from(value: C) -> Self {
        Row(value.into_iter().map(Into::into).collect())
    }
}

/// A table with column headers and rows of data.
///
/// Every row has exactly as many cells as there are headers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    headers: Vec<Header>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates a [Table] from headers and rows, padding so that every row and the headers have
    /// the same width.
    pub fn new(mut headers: Vec<Header>, mut rows: Vec<Row>) -> Self {
        let width = rows
            .iter()
            .map(|row| row.len())
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        headers.resize(width, Header::Unnamed);
        for row in &mut rows {
            row.resize(width, Cell::Missing);
        }
        Self { headers, rows }
    }

    /// Creates a [Table] with unnamed headers.
    pub fn from_rows<C, R>(rows: C) -> Self
    where
        C: IntoIterator<Item = R>,
        R: Into<Row>,
    {
        Self::new(Vec::new(), rows.into_iter().map(Into::into).collect())
    }

    /// Creates a [Table] from the text of extracted rows, where the first row holds the column
    /// headers.
    ///
    /// Blank cells become [Cell::Missing], and any column whose remaining values all parse as
    /// finite numbers becomes numeric.
    pub fn from_extracted_text(rows: Vec<Vec<String>>) -> Self {
        let mut rows = rows.into_iter();
        let headers = match rows.next() {
            Some(header_row) => header_row
                .into_iter()
                .map(Header::from_extracted_text)
                .collect(),
            None => return Self::default(),
        };
        let rows = rows
            .map(|row| Row(row.into_iter().map(Cell::from_extracted_text).collect()))
            .collect();

        let mut table = Self::new(headers, rows);
        for column in 0..table.width() {
            table.infer_numeric_column(column);
        }
        table
    }

    fn infer_numeric_column(&mut self, column: usize) {
        let parsed: Option<Vec<Cell>> = self
            .rows
            .iter()
            .map(|row| match &row[column] {
                Cell::Text(text) => text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .map(Cell::Number),
                other => Some(other.clone()),
            })
            .collect();
        if let Some(parsed) = parsed {
            for (row, cell) in self.rows.iter_mut().zip(parsed) {
                row[column] = cell;
            }
        }
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows, excluding the headers.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Infers the [ColumnKind] of the column at `column`. A column without any values is
    /// [ColumnKind::Text].
    pub fn column_kind(&self, column: usize) -> ColumnKind {
        let mut has_number = false;
        for row in &self.rows {
            match &row[column] {
                Cell::Text(_) => return ColumnKind::Text,
                Cell::Number(_) => has_number = true,
                Cell::Missing => {}
            }
        }
        if has_number {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }

    /// Keeps only the rows for which `keep` returns `true`.
    pub(crate) fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&Row) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Keeps only the columns whose index is in `columns`, which must be in ascending order.
    pub(crate) fn select_columns(&mut self, columns: &[usize]) {
        self.headers = columns.iter().map(|&i| self.headers[i].clone()).collect();
        for row in &mut self.rows {
            row.0 = columns.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Applies `f` to every cell in the column at `column`.
    pub(crate) fn map_column<F>(&mut self, column: usize, mut f: F)
    where
        F: FnMut(&mut Cell),
    {
        for row in &mut self.rows {
            f(&mut row[column]);
        }
    }
}

/// A [Table] with the name to display above it in the report.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedTable {
    pub name: String,
    pub table: Table,
}

impl NamedTable {
    pub fn new<S: Into<String>>(name: S, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}
