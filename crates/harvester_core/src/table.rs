use thiserror::Error;

/// Numeric key of one remote page. Rendered in decimal without padding.
pub type PageId = u64;

/// Placeholder recorded instead of page text when a fetch is classified as failed.
pub const SENTINEL_DESCRIPTION: &str =
    "ERROR WHILE PROCESSING DESCRIPTION - ERROR WHILE PROCESSING DESCRIPTION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: PageId,
    pub description: String,
}

impl ResultRow {
    pub fn scraped(id: PageId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    pub fn failed(id: PageId) -> Self {
        Self {
            id,
            description: SENTINEL_DESCRIPTION.to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.description == SENTINEL_DESCRIPTION
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("row id {id} does not follow previous id {previous}")]
    OutOfOrder { previous: PageId, id: PageId },
}

/// Append-only table of rows with strictly increasing ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from existing rows, rejecting any row whose id does not
    /// exceed the id before it.
    pub fn from_rows(rows: impl IntoIterator<Item = ResultRow>) -> Result<Self, TableError> {
        let mut table = Self::new();
        for row in rows {
            if let Some(previous) = table.last_id() {
                if row.id <= previous {
                    return Err(TableError::OutOfOrder {
                        previous,
                        id: row.id,
                    });
                }
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Callers guarantee `row.id` follows the last id.
    pub(crate) fn push(&mut self, row: ResultRow) {
        debug_assert!(self.last_id().map_or(true, |last| row.id > last));
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last_id(&self) -> Option<PageId> {
        self.rows.last().map(|row| row.id)
    }

    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_sentinel()).count()
    }
}
