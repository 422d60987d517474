//! In-memory tabular data and CSV serialization.
//!
//! [`CsvTable`] is the narrow capability the uploader accepts: anything
//! that can render itself to CSV bytes, with or without a row-index
//! column. [`DataTable`] is the concrete columns/rows/labels implementation
//! used by report generators.

/// Errors converting a table to CSV.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    /// A row's cell count didn't match the column count.
    #[error("Row {row} has {got} cells, expected {expected}")]
    Shape {
        /// Zero-based row position.
        row: usize,
        /// Cells in the offending row.
        got: usize,
        /// Expected cell count (column count).
        expected: usize,
    },

    /// The `csv` writer failed.
    #[error("CSV serialization failed: {0}")]
    Write(#[from] csv::Error),

    /// Flushing the in-memory CSV buffer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability for tabular structures the uploader can serialize.
pub trait CsvTable {
    /// Renders the table to CSV bytes in memory.
    ///
    /// With `with_index`, row index labels are written as the first column
    /// under an empty header cell.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError`] if the table cannot be converted.
    fn to_csv_bytes(&self, with_index: bool) -> Result<Vec<u8>, CsvError>;
}

/// A simple in-memory table: named columns, string cells, row labels.
///
/// Row labels default to the row's zero-based position; use
/// [`DataTable::push_row_with_label`] to set them explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    columns: Vec<String>,
    labels: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Creates an empty table with the given column names.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            labels: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, labeling it with its zero-based position.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Shape`] if the cell count doesn't match the
    /// column count.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), CsvError> {
        let label = self.rows.len().to_string();
        self.push_row_with_label(label, row)
    }

    /// Appends a row with an explicit index label.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Shape`] if the cell count doesn't match the
    /// column count.
    pub fn push_row_with_label(
        &mut self,
        label: impl Into<String>,
        row: Vec<String>,
    ) -> Result<(), CsvError> {
        if row.len() != self.columns.len() {
            return Err(CsvError::Shape {
                row: self.rows.len(),
                got: row.len(),
                expected: self.columns.len(),
            });
        }
        self.labels.push(label.into());
        self.rows.push(row);
        Ok(())
    }

    /// Column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl CsvTable for DataTable {
    fn to_csv_bytes(&self, with_index: bool) -> Result<Vec<u8>, CsvError> {
        // A table with no columns and no rows serializes to nothing at all,
        // not a bare newline.
        if self.columns.is_empty() && self.rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut buffer = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buffer);

            if with_index {
                // Empty header cell over the index column, pandas-style.
                let header = std::iter::once("").chain(self.columns.iter().map(String::as_str));
                writer.write_record(header)?;
                for (label, row) in self.labels.iter().zip(&self.rows) {
                    let record =
                        std::iter::once(label.as_str()).chain(row.iter().map(String::as_str));
                    writer.write_record(record)?;
                }
            } else {
                writer.write_record(&self.columns)?;
                for row in &self.rows {
                    writer.write_record(row)?;
                }
            }

            writer.flush()?;
        }
        Ok(buffer)
    }
}
