use std::fmt;

use crate::PageId;

/// Destination identifier for one persisted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkName {
    /// The single row for one page.
    Row(PageId),
    /// Full table snapshot taken after the given id.
    Checkpoint(PageId),
    /// Full table once the loop has stopped.
    Final,
    /// Final table with the derived description columns.
    FinalSplit,
}

impl SinkName {
    pub fn file_stem(&self) -> String {
        match self {
            SinkName::Row(id) => format!("individual_result_for_{id}"),
            SinkName::Checkpoint(id) => format!("results_after_{id}"),
            SinkName::Final => "final_results".to_string(),
            SinkName::FinalSplit => "final_results_split".to_string(),
        }
    }
}

impl fmt::Display for SinkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}
