//! Harvester engine: fetching, decoding, text extraction and persistence.
mod decode;
mod extract;
mod fetch;
mod harvest;
mod persist;
mod table_sink;
mod types;

pub use decode::{
    decode_bytes, decode_html, decode_with_chain, detect_encoding, Charset, DecodedText,
    FALLBACK_CHAIN, REPLACEMENT_CHARACTER,
};
pub use extract::extract_visible_text;
pub use fetch::{page_text, FetchSettings, PageFetcher, PageSource};
pub use harvest::{run_harvest, HarvestReport};
pub use persist::{AtomicFileWriter, PersistError};
pub use table_sink::{render_csv, CsvTableSink, TableSink, Tabular, BASE_HEADERS};
pub use types::{AttemptError, FailureKind};
