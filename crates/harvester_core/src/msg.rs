#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the run at the first id.
    Start,
    /// Fetcher finished with one page.
    PageFetched {
        id: crate::PageId,
        result: crate::FetchResult,
    },
}
