//! Harvester core: pure state machine, result table and output shaping.
mod derive;
mod effect;
mod msg;
mod outcome;
mod sink_name;
mod state;
mod table;
mod update;

pub use derive::{
    derive_columns, split_description, DerivedRow, DerivedTable, SplitError, SplitPolicy,
    DESCRIPTION_SEPARATOR,
};
pub use effect::Effect;
pub use msg::Msg;
pub use outcome::{FetchFailure, FetchResult, MIN_DESCRIPTION_CHARS};
pub use sink_name::SinkName;
pub use state::{
    HarvestPlan, HarvestState, SessionState, StopReason, CHECKPOINT_INTERVAL,
    DEFAULT_MAX_CONSECUTIVE_FAILURES,
};
pub use table::{PageId, ResultRow, ResultTable, TableError, SENTINEL_DESCRIPTION};
pub use update::update;
