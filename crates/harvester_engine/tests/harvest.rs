use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;

use harvester_core::{
    FetchFailure, FetchResult, HarvestPlan, PageId, SinkName, SplitPolicy, StopReason,
    SENTINEL_DESCRIPTION,
};
use harvester_engine::{run_harvest, CsvTableSink, PersistError, TableSink, Tabular};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BASE: &str = "https://example.com/Monsters.aspx?ID=";

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn plan(max_consecutive_failures: u32, max_id: Option<PageId>) -> HarvestPlan {
    HarvestPlan {
        max_consecutive_failures,
        max_id,
        ..HarvestPlan::new(BASE)
    }
}

fn id_of(url: &str) -> PageId {
    url.strip_prefix(BASE).unwrap().parse().unwrap()
}

fn long_text(url: &str) -> FetchResult {
    FetchResult::Success(format!("Creature {} - a long enough description", id_of(url)))
}

fn not_found(_: &str) -> FetchResult {
    FetchResult::Failure(FetchFailure::PermanentStatus(404))
}

/// Records every write; optionally fails writes for chosen names.
#[derive(Default)]
struct RecordingSink {
    writes: RefCell<Vec<(SinkName, usize)>>,
    fail_on: Vec<SinkName>,
}

impl RecordingSink {
    fn failing_on(fail_on: Vec<SinkName>) -> Self {
        Self {
            fail_on,
            ..Self::default()
        }
    }

    fn names(&self) -> Vec<SinkName> {
        self.writes.borrow().iter().map(|(name, _)| *name).collect()
    }

    fn table_names(&self) -> Vec<SinkName> {
        self.names()
            .into_iter()
            .filter(|name| !matches!(name, SinkName::Row(_)))
            .collect()
    }

    fn rows_written(&self, wanted: SinkName) -> Option<usize> {
        self.writes
            .borrow()
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, rows)| *rows)
    }
}

impl TableSink for RecordingSink {
    fn write(&self, name: SinkName, table: Tabular<'_>) -> Result<PathBuf, PersistError> {
        self.writes.borrow_mut().push((name, table.len()));
        if self.fail_on.contains(&name) {
            return Err(PersistError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "disk says no",
            )));
        }
        Ok(PathBuf::from(name.file_stem()))
    }
}

#[test]
fn always_failing_source_visits_three_ids() {
    init_logging();
    let sink = RecordingSink::default();
    let visited = RefCell::new(Vec::new());
    let source = |url: &str| {
        visited.borrow_mut().push(id_of(url));
        not_found(url)
    };

    let report = run_harvest(plan(3, None), SplitPolicy::First, &source, &sink);

    assert_eq!(*visited.borrow(), vec![1, 2, 3]);
    assert_eq!(
        report.stop_reason,
        Some(StopReason::ConsecutiveFailures { count: 3 })
    );
    assert!(report
        .table
        .rows()
        .iter()
        .all(|row| row.description == SENTINEL_DESCRIPTION));
}

#[test]
fn id_bound_stops_at_six() {
    init_logging();
    let sink = RecordingSink::default();
    let visited = RefCell::new(Vec::new());
    let source = |url: &str| {
        visited.borrow_mut().push(id_of(url));
        long_text(url)
    };

    let report = run_harvest(plan(3, Some(5)), SplitPolicy::First, &source, &sink);

    assert_eq!(*visited.borrow(), vec![1, 2, 3, 4, 5]);
    assert_eq!(report.stop_reason, Some(StopReason::IdBoundReached { max_id: 5 }));
    assert_eq!(report.table.len(), 5);
}

#[test]
fn checkpoints_after_ten_and_twenty_then_final() {
    init_logging();
    let sink = RecordingSink::default();

    let report = run_harvest(plan(3, Some(25)), SplitPolicy::First, &long_text, &sink);

    assert_eq!(
        sink.table_names(),
        vec![
            SinkName::Checkpoint(10),
            SinkName::Checkpoint(20),
            SinkName::Final,
            SinkName::FinalSplit,
        ]
    );
    assert_eq!(sink.rows_written(SinkName::Checkpoint(10)), Some(10));
    assert_eq!(sink.rows_written(SinkName::Checkpoint(20)), Some(20));
    assert_eq!(sink.rows_written(SinkName::Final), Some(25));
    let row_saves = sink
        .names()
        .into_iter()
        .filter(|name| matches!(name, SinkName::Row(_)))
        .count();
    assert_eq!(row_saves, 25);
    assert_eq!(report.failed_saves, 0);
}

#[test]
fn failed_checkpoint_keeps_running_and_keeps_rows() {
    init_logging();
    let sink = RecordingSink::failing_on(vec![SinkName::Checkpoint(10), SinkName::Row(11)]);

    let report = run_harvest(plan(3, Some(15)), SplitPolicy::First, &long_text, &sink);

    assert_eq!(report.failed_saves, 2);
    assert_eq!(report.table.len(), 15);
    assert_eq!(sink.rows_written(SinkName::Final), Some(15));
    let ids: Vec<PageId> = report.table.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, (1..=15).collect::<Vec<_>>());
}

#[test]
fn short_pages_become_sentinel_rows() {
    init_logging();
    let sink = RecordingSink::default();
    let source = |url: &str| match id_of(url) {
        2 => FetchResult::Success("hi".to_string()),
        _ => long_text(url),
    };

    let report = run_harvest(plan(3, Some(3)), SplitPolicy::First, &source, &sink);

    assert_eq!(report.table.rows()[1].description, SENTINEL_DESCRIPTION);
    assert_eq!(report.table.failed_count(), 1);
}

#[test]
fn derived_table_splits_final_descriptions() {
    init_logging();
    let sink = RecordingSink::default();
    let source = |url: &str| match id_of(url) {
        1 => FetchResult::Success("Goblin Warrior - A small humanoid raider.".to_string()),
        _ => FetchResult::Success("NoSeparatorHere".to_string()),
    };

    let report = run_harvest(plan(3, Some(2)), SplitPolicy::First, &source, &sink);

    assert_eq!(
        report.derived.rows()[0].parts,
        vec!["Goblin Warrior", "A small humanoid raider."]
    );
    assert!(report.derived.rows()[1].parts.is_empty());
}

#[test]
fn csv_sink_writes_expected_files() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let sink = CsvTableSink::new(temp.path().join("output"));

    let report = run_harvest(plan(2, Some(12)), SplitPolicy::First, &long_text, &sink);
    assert_eq!(report.failed_saves, 0);

    let dir = sink.dir();
    for name in [
        "individual_result_for_1.csv",
        "individual_result_for_12.csv",
        "results_after_10.csv",
        "final_results.csv",
        "final_results_split.csv",
    ] {
        assert!(dir.join(name).is_file(), "missing {name}");
    }
    assert!(!dir.join("results_after_12.csv").exists());

    let single = fs::read_to_string(dir.join("individual_result_for_3.csv")).unwrap();
    assert_eq!(
        single,
        "ID,description\n3,Creature 3 - a long enough description\n"
    );
    let final_text = fs::read_to_string(dir.join("final_results.csv")).unwrap();
    assert_eq!(final_text.lines().count(), 13);
}
