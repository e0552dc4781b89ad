//! Normalisation of extracted tables.


use crate::table::{Cell, ColumnKind, Table};

/// Cleans an extracted table:
///
/// 1. removes rows where every cell is blank,
/// 2. removes columns where every remaining data cell is blank (headers are not considered),
/// 3. trims text in text columns, with missing values becoming empty text.
///
/// Numeric columns are left as they are. A table that is empty after cleaning is returned as-is
/// for the caller to discard.
pub fn clean(mut table: Table) -> Table {
    table.retain_rows(|row| !row.iter().all(Cell::is_blank));

    let kept_columns: Vec<usize> = (0..table.width())
        .filter(|&column| !table.rows().iter().all(|row| row[column].is_blank()))
        .collect();
    table.select_columns(&kept_columns);

    for column in 0..table.width() {
        if table.column_kind(column) != ColumnKind::Text {
            continue;
        }
        table.map_column(column, |cell| {
            *cell = match cell {
                Cell::Text(text) => Cell::Text(text.trim().to_string()),
                Cell::Missing => Cell::Text(String::new()),
                Cell::Number(value) => Cell::Number(*value),
            };
        });
    }

    table
}
