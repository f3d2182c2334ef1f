use serde::Deserialize;
use thiserror::Error;

use crate::{PageId, ResultTable};

pub const DESCRIPTION_SEPARATOR: &str = " - ";

/// How many times a description is split on [`DESCRIPTION_SEPARATOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Split once at the first separator; the second part keeps the rest.
    #[default]
    First,
    /// Split at every separator.
    All,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("description has no \" - \" separator")]
    MissingSeparator,
}

pub fn split_description(
    description: &str,
    policy: SplitPolicy,
) -> Result<Vec<String>, SplitError> {
    match policy {
        SplitPolicy::First => description
            .split_once(DESCRIPTION_SEPARATOR)
            .map(|(head, tail)| vec![head.to_string(), tail.to_string()])
            .ok_or(SplitError::MissingSeparator),
        SplitPolicy::All => {
            if !description.contains(DESCRIPTION_SEPARATOR) {
                return Err(SplitError::MissingSeparator);
            }
            Ok(description
                .split(DESCRIPTION_SEPARATOR)
                .map(ToOwned::to_owned)
                .collect())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedRow {
    pub id: PageId,
    pub description: String,
    /// Empty when the description could not be split.
    pub parts: Vec<String>,
}

/// Final table with `description_partN` columns appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedTable {
    part_columns: usize,
    rows: Vec<DerivedRow>,
}

impl DerivedTable {
    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn part_columns(&self) -> usize {
        self.part_columns
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["ID".to_string(), "description".to_string()];
        headers.extend((1..=self.part_columns).map(|n| format!("description_part{n}")));
        headers
    }

    /// One output record per row, padded with empty cells to the header width.
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(move |row| {
            let mut record = Vec::with_capacity(2 + self.part_columns);
            record.push(row.id.to_string());
            record.push(row.description.clone());
            record.extend(row.parts.iter().cloned());
            record.resize(2 + self.part_columns, String::new());
            record
        })
    }
}

/// Split every description; rows without a separator keep empty part columns.
pub fn derive_columns(table: &ResultTable, policy: SplitPolicy) -> DerivedTable {
    let rows: Vec<DerivedRow> = table
        .rows()
        .iter()
        .map(|row| DerivedRow {
            id: row.id,
            description: row.description.clone(),
            parts: split_description(&row.description, policy).unwrap_or_default(),
        })
        .collect();

    let part_columns = rows.iter().map(|row| row.parts.len()).max().unwrap_or(0).max(2);

    DerivedTable { part_columns, rows }
}
