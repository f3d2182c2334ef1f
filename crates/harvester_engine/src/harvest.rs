use std::collections::VecDeque;
use std::slice;

use engine_logging::{engine_error, engine_info, engine_warn};
use harvester_core::{
    derive_columns, update, DerivedTable, Effect, HarvestPlan, HarvestState, Msg, ResultTable,
    SinkName, SplitPolicy, StopReason,
};

use crate::fetch::PageSource;
use crate::table_sink::{TableSink, Tabular};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub table: ResultTable,
    pub derived: DerivedTable,
    pub stop_reason: Option<StopReason>,
    /// Sink writes that failed; the run continued past each of them.
    pub failed_saves: usize,
}

/// Drive the harvest state machine to completion, executing its effects
/// against `source` and `sink` one at a time.
pub fn run_harvest(
    plan: HarvestPlan,
    split_policy: SplitPolicy,
    source: &dyn PageSource,
    sink: &dyn TableSink,
) -> HarvestReport {
    engine_info!(
        "Starting harvest of {}<id> (max consecutive failures {}, max id {:?})",
        plan.base_url,
        plan.max_consecutive_failures,
        plan.max_id
    );

    let (mut state, effects) = update(HarvestState::new(plan), Msg::Start);
    let mut pending: VecDeque<Effect> = effects.into();
    let mut failed_saves = 0usize;
    let mut stop_reason = None;

    while let Some(effect) = pending.pop_front() {
        match effect {
            Effect::FetchPage { id, url } => {
                let result = source.fetch(&url);
                let (next, effects) = update(state, Msg::PageFetched { id, result });
                state = next;
                pending.extend(effects);
            }
            Effect::SaveRow { row, scraped } => {
                if scraped {
                    engine_info!("Successfully scraped ID {}", row.id);
                } else {
                    engine_warn!(
                        "Failed to scrape ID {} ({} consecutive failures)",
                        row.id,
                        state.consecutive_failures()
                    );
                }
                let table = Tabular::Rows(slice::from_ref(&row));
                failed_saves += usize::from(!save(sink, SinkName::Row(row.id), table));
            }
            Effect::SaveCheckpoint { after_id } => {
                let table = Tabular::Rows(state.table().rows());
                failed_saves += usize::from(!save(sink, SinkName::Checkpoint(after_id), table));
            }
            Effect::Finish { reason } => {
                match reason {
                    StopReason::ConsecutiveFailures { count } => {
                        engine_info!("Stopping after {} consecutive failures", count)
                    }
                    StopReason::IdBoundReached { max_id } => {
                        engine_info!("Stopping after reaching max id {}", max_id)
                    }
                }
                stop_reason = Some(reason);
                let table = Tabular::Rows(state.table().rows());
                failed_saves += usize::from(!save(sink, SinkName::Final, table));
            }
        }
    }

    let table = state.into_table();
    let derived = derive_columns(&table, split_policy);
    failed_saves += usize::from(!save(sink, SinkName::FinalSplit, Tabular::Derived(&derived)));

    engine_info!(
        "Harvest finished: {} rows, {} failed, {} failed saves",
        table.len(),
        table.failed_count(),
        failed_saves
    );

    HarvestReport {
        table,
        derived,
        stop_reason,
        failed_saves,
    }
}

fn save(sink: &dyn TableSink, name: SinkName, table: Tabular<'_>) -> bool {
    match sink.write(name, table) {
        Ok(path) => {
            engine_info!("Saved {} ({} rows) to {}", name, table.len(), path.display());
            true
        }
        Err(err) => {
            engine_error!("Failed to save {}: {}", name, err);
            false
        }
    }
}
