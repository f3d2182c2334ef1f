use crate::{PageId, ResultRow, StopReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage { id: PageId, url: String },
    SaveRow { row: ResultRow, scraped: bool },
    SaveCheckpoint { after_id: PageId },
    Finish { reason: StopReason },
}
