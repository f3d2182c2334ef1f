use std::path::{Path, PathBuf};

use harvester_core::{DerivedTable, ResultRow, SinkName};

use crate::persist::{AtomicFileWriter, PersistError};

pub const BASE_HEADERS: [&str; 2] = ["ID", "description"];

/// A table handed to a sink.
#[derive(Debug, Clone, Copy)]
pub enum Tabular<'a> {
    Rows(&'a [ResultRow]),
    Derived(&'a DerivedTable),
}

impl Tabular<'_> {
    pub fn len(&self) -> usize {
        match self {
            Tabular::Rows(rows) => rows.len(),
            Tabular::Derived(table) => table.rows().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Destination for persisted tables. Failures are returned, never raised.
pub trait TableSink {
    fn write(&self, name: SinkName, table: Tabular<'_>) -> Result<PathBuf, PersistError>;
}

/// Header line, comma separated, one record per row, no index column.
pub fn render_csv(table: Tabular<'_>) -> Result<Vec<u8>, PersistError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    match table {
        Tabular::Rows(rows) => {
            writer.write_record(BASE_HEADERS)?;
            for row in rows {
                let id = row.id.to_string();
                writer.write_record([id.as_str(), row.description.as_str()])?;
            }
        }
        Tabular::Derived(derived) => {
            writer.write_record(derived.headers())?;
            for record in derived.records() {
                writer.write_record(&record)?;
            }
        }
    }
    writer
        .into_inner()
        .map_err(|err| PersistError::Io(err.into_error()))
}

/// Writes each table to `{dir}/{name}.csv`.
#[derive(Debug, Clone)]
pub struct CsvTableSink {
    writer: AtomicFileWriter,
}

impl CsvTableSink {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    pub fn filename(name: SinkName) -> String {
        format!("{}.csv", name.file_stem())
    }
}

impl TableSink for CsvTableSink {
    fn write(&self, name: SinkName, table: Tabular<'_>) -> Result<PathBuf, PersistError> {
        let content = render_csv(table)?;
        self.writer.write(&Self::filename(name), &content)
    }
}
