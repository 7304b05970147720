use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use csv::Writer;
use crate::error::{Result, ScanError};
use crate::extract::ExtractedFields;
use crate::metadata::Labels;
use crate::scanner::LogFile;

pub const FILE_COLUMN: &str = "File";
pub const RELATIVE_PATH_COLUMN: &str = "Relative Path";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// Numbers use the shortest round-trip form and always keep a decimal
    /// point; absences render as an empty string.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Empty => String::new(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

/// Python-style float text: exponent form below 1e-4 and from 1e16 up, plain
/// decimals with at least one fractional digit otherwise.
fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }

    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let s = format!("{:e}", n);
        if let Some((mantissa, exponent)) = s.split_once('e') {
            let exponent: i32 = exponent.parse().unwrap_or_default();
            let sign = if exponent < 0 { '-' } else { '+' };
            return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
        }
    }

    let s = n.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// One output row: identity, metadata and field columns in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    cells: Vec<(String, Cell)>,
}

impl Record {
    pub fn build(file: &LogFile, labels: Labels, fields: ExtractedFields) -> Self {
        let mut record = Record::default();
        record.set(FILE_COLUMN, Cell::Text(file.file_name.clone()));
        record.set(RELATIVE_PATH_COLUMN, Cell::Text(file.relative_display()));

        for (label, value) in labels {
            record.set(label, value.into());
        }
        for (label, value) in fields {
            record.set(label, value.into());
        }

        record
    }

    pub fn set(&mut self, column: impl Into<String>, cell: Cell) {
        let column = column.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = cell,
            None => self.cells.push((column, cell)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, cell)| cell)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }
}

/// Rows in discovery order plus the preferred column layout.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    preference: Vec<String>,
    rows: Vec<Record>,
}

impl ResultTable {
    /// An empty `preference` keeps columns in first-seen order.
    pub fn new(preference: Vec<String>) -> Self {
        Self {
            preference,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Preferred columns that occur in at least one row, in preference order.
    pub fn columns(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            for column in row.columns() {
                if !seen.contains(&column) {
                    seen.push(column);
                }
            }
        }

        if self.preference.is_empty() {
            return seen.into_iter().map(str::to_string).collect();
        }

        self.preference
            .iter()
            .filter(|c| seen.contains(&c.as_str()))
            .cloned()
            .collect()
    }

    /// Write the table as CSV. Returns `Ok(false)` without creating the file
    /// when there are no rows.
    pub fn write_csv(&self, path: &Path) -> Result<bool> {
        if self.is_empty() {
            return Ok(false);
        }

        let csv_err = |source: csv::Error| ScanError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(|e| csv_err(e.into()))?;
        let mut writer = Writer::from_writer(file);
        self.write_to(&mut writer).map_err(csv_err)?;
        writer.flush().map_err(|e| csv_err(e.into()))?;

        Ok(true)
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = Writer::from_writer(Vec::new());
        self.write_to(&mut writer).map_err(|source| ScanError::Csv {
            path: "<memory>".into(),
            source,
        })?;

        let bytes = writer.into_inner().map_err(|e| ScanError::Csv {
            path: "<memory>".into(),
            source: e.into_error().into(),
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> csv::Result<()> {
        let columns = self.columns();
        writer.write_record(&columns)?;

        for row in &self.rows {
            let lookup: HashMap<&str, &Cell> = row.cells.iter().map(|(c, v)| (c.as_str(), v)).collect();
            let values = columns
                .iter()
                .map(|c| lookup.get(c.as_str()).map(|cell| cell.render()).unwrap_or_default());
            writer.write_record(values)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn log_file(rel: &str) -> LogFile {
        let relative_path = PathBuf::from(rel);
        LogFile {
            path: PathBuf::from("/data").join(&relative_path),
            file_name: relative_path.file_name().unwrap().to_string_lossy().into_owned(),
            relative_path,
        }
    }

    #[test]
    fn test_number_rendering() {
        assert_eq!(Cell::Number(-123.456789).render(), "-123.456789");
        assert_eq!(Cell::Number(2.0).render(), "2.0");
        assert_eq!(Cell::Number(0.0).render(), "0.0");
        assert_eq!(Cell::Number(0.0001).render(), "0.0001");
        assert_eq!(Cell::Number(0.000012).render(), "1.2e-05");
        assert_eq!(Cell::Number(-2.5e-7).render(), "-2.5e-07");
        assert_eq!(Cell::Number(1e20).render(), "1e+20");
        assert_eq!(Cell::Number(1234567.0).render(), "1234567.0");
        assert_eq!(Cell::Empty.render(), "");
        assert_eq!(Cell::from(None::<f64>), Cell::Empty);
    }

    #[test]
    fn test_record_keeps_every_column() {
        let record = Record::build(
            &log_file("A/run.xtb.log"),
            vec![("Tetramer".into(), None)],
            vec![("Total Energy (Eh)".into(), None)],
        );

        let columns: Vec<_> = record.columns().collect();
        assert_eq!(columns, vec!["File", "Relative Path", "Tetramer", "Total Energy (Eh)"]);
        assert_eq!(record.get("Tetramer"), Some(&Cell::Empty));
    }

    #[test]
    fn test_columns_follow_preference_and_drop_missing() {
        let mut table = ResultTable::new(vec![
            "Top Folder".into(),
            "Missing".into(),
            "File".into(),
            "Total Energy (Eh)".into(),
        ]);
        table.push(Record::build(
            &log_file("A/run.xtb.log"),
            vec![("Top Folder".into(), Some("A".into()))],
            vec![("Total Energy (Eh)".into(), Some(-1.5))],
        ));

        assert_eq!(table.columns(), vec!["Top Folder", "File", "Total Energy (Eh)"]);

        let csv = table.to_csv_string().unwrap();
        assert_eq!(csv, "Top Folder,File,Total Energy (Eh)\nA,run.xtb.log,-1.5\n");
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("out.csv");

        let written = ResultTable::new(Vec::new()).write_csv(&path).unwrap();

        assert!(!written);
        assert!(!path.exists());
    }

    #[test]
    fn test_absent_values_are_empty_cells() {
        let mut table = ResultTable::new(Vec::new());
        table.push(Record::build(
            &log_file("x.xtb.log"),
            Vec::new(),
            vec![("Gap".into(), None), ("Energy".into(), Some(-3.0))],
        ));

        let csv = table.to_csv_string().unwrap();
        assert_eq!(csv, "File,Relative Path,Gap,Energy\nx.xtb.log,x.xtb.log,,-3.0\n");
    }
}
