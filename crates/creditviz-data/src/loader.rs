//! Registry workbook loading.
//!
//! Reading is split in two halves: [`read_sheet_rows`] does the workbook I/O
//! through `calamine` and returns raw cell rows, [`records_from_rows`] locates
//! the header, checks the schema and converts each data row into a
//! [`Record`].

use calamine::{open_workbook_auto, Reader};
use creditviz_common::{clean_header, CreditVizError, Record, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

pub use calamine::Data as Cell;

/// Header text of the four columns the pipeline consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub region: String,
    pub country: String,
    pub issued: String,
    pub remaining: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            region: "Region".to_string(),
            country: "Country".to_string(),
            issued: "Total Credits Issued".to_string(),
            remaining: "Total Credits Remaining".to_string(),
        }
    }
}

impl ColumnNames {
    fn expected(&self) -> [&str; 4] {
        [&self.region, &self.country, &self.issued, &self.remaining]
    }
}

/// Where the data lives inside the workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Sheet holding the project table.
    pub sheet: String,
    /// Metadata rows above the header row.
    pub skip_rows: usize,
    /// Only the first `column_limit` columns are read.
    pub column_limit: usize,
    pub columns: ColumnNames,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            sheet: "PROJECTS".to_string(),
            skip_rows: 3,
            column_limit: 23,
            columns: ColumnNames::default(),
        }
    }
}

/// Positions of the consumed columns within a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    region: usize,
    country: usize,
    issued: usize,
    remaining: usize,
}

/// Loads [`Record`]s from a workbook sheet.
#[derive(Debug, Clone, Default)]
pub struct SheetLoader {
    options: LoaderOptions,
}

impl SheetLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Read and parse the configured sheet of the workbook at `path`.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display(), sheet = %self.options.sheet))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<Record>> {
        let rows = read_sheet_rows(path.as_ref(), &self.options)?;
        let records = records_from_rows(&rows, &self.options)?;
        info!(records = records.len(), "Loaded registry records");
        Ok(records)
    }
}

/// Read every row of the sheet, from the first row of the sheet, truncated to
/// `column_limit` columns. Cells outside the used range come back as
/// [`Cell::Empty`].
pub fn read_sheet_rows(path: &Path, options: &LoaderOptions) -> Result<Vec<Vec<Cell>>> {
    let display_path = path.display().to_string();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CreditVizError::source_not_found_with_source(display_path.clone(), e))?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == &options.sheet) {
        return Err(CreditVizError::sheet_not_found(&options.sheet, sheet_names));
    }

    let range = workbook
        .worksheet_range(&options.sheet)
        .map_err(|e| CreditVizError::source_not_found_with_source(display_path, e))?;

    let Some((end_row, end_col)) = range.end() else {
        debug!("Sheet is empty");
        return Ok(Vec::new());
    };
    let width = (end_col as usize + 1).min(options.column_limit);

    let rows = (0..=end_row)
        .map(|row| {
            (0..width)
                .map(|col| {
                    range
                        .get_value((row, col as u32))
                        .cloned()
                        .unwrap_or(Cell::Empty)
                })
                .collect()
        })
        .collect::<Vec<Vec<Cell>>>();

    debug!(rows = rows.len(), columns = width, "Read sheet cells");
    Ok(rows)
}

/// Convert raw rows into records.
///
/// The first `skip_rows` rows are discarded, the next row is the header.
/// Rows whose consumed cells are all empty are skipped.
pub fn records_from_rows(rows: &[Vec<Cell>], options: &LoaderOptions) -> Result<Vec<Record>> {
    let mut rows = rows.iter().skip(options.skip_rows);

    let header: Vec<String> = match rows.next() {
        Some(row) => row
            .iter()
            .take(options.column_limit)
            .map(|cell| clean_header(&cell.to_string()))
            .collect(),
        None => Vec::new(),
    };
    let index = locate_columns(&header, &options.columns)?;

    let mut records = Vec::new();
    let mut blank_rows = 0usize;
    for row in rows {
        let row = &row[..row.len().min(options.column_limit)];
        if row.iter().all(is_blank) {
            blank_rows += 1;
            continue;
        }
        records.push(Record {
            region: categorical(row.get(index.region)),
            country: categorical(row.get(index.country)),
            issued: numeric(row.get(index.issued)),
            remaining: numeric(row.get(index.remaining)),
        });
    }

    if blank_rows > 0 {
        debug!(blank_rows, "Skipped blank rows");
    }
    Ok(records)
}

fn locate_columns(header: &[String], columns: &ColumnNames) -> Result<ColumnIndex> {
    let position = |name: &str| {
        let wanted = clean_header(name);
        header.iter().position(|h| *h == wanted)
    };

    let found: Vec<Option<usize>> = columns.expected().into_iter().map(position).collect();
    let missing: Vec<String> = columns
        .expected()
        .iter()
        .zip(&found)
        .filter(|(_, pos)| pos.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

    match found[..] {
        [Some(region), Some(country), Some(issued), Some(remaining)] => Ok(ColumnIndex {
            region,
            country,
            issued,
            remaining,
        }),
        _ => {
            warn!(?missing, "Header row is missing expected columns");
            Err(CreditVizError::schema_mismatch(
                missing,
                header.iter().filter(|h| !h.is_empty()).cloned().collect(),
            ))
        }
    }
}

fn is_blank(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Categorical cells keep their text verbatim.
fn categorical(cell: Option<&Cell>) -> String {
    cell.map(ToString::to_string).unwrap_or_default()
}

/// Numeric cells: numbers as-is, text parsed after removing thousands
/// separators, anything else absent.
fn numeric(cell: Option<&Cell>) -> Option<f64> {
    match cell? {
        Cell::Float(value) => Some(*value),
        Cell::Int(value) => Some(*value as f64),
        Cell::String(text) => {
            let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}
