use std::fs;

use harvester_core::{derive_columns, ResultRow, ResultTable, SinkName, SplitPolicy};
use harvester_engine::{
    render_csv, AtomicFileWriter, CsvTableSink, PersistError, TableSink, Tabular,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sample_table() -> ResultTable {
    ResultTable::from_rows(vec![
        ResultRow::scraped(1, "Goblin Warrior - A small humanoid raider."),
        ResultRow::failed(2),
        ResultRow::scraped(3, "Says \"hi\", loudly"),
    ])
    .unwrap()
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    AtomicFileWriter::new(new_dir.clone()).prepare_dir().unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn file_in_place_of_output_dir_is_reported() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("results");
    fs::write(&file_path, "x").unwrap();

    let err = AtomicFileWriter::new(file_path.clone())
        .prepare_dir()
        .unwrap_err();
    assert!(matches!(err, PersistError::OutputDir { ref path, .. } if *path == file_path));
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("final_results.csv", b"hello").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("final_results.csv", b"world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn write_into_file_path_fails_without_partial_output() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let sink = CsvTableSink::new(file_path.clone());
    let table = sample_table();
    let result = sink.write(SinkName::Final, Tabular::Rows(table.rows()));
    assert!(result.is_err());
    assert!(!file_path.with_file_name("final_results.csv").exists());
}

#[test]
fn csv_has_header_and_no_index_column() {
    let table = sample_table();
    let bytes = render_csv(Tabular::Rows(table.rows())).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(
        text,
        "ID,description\n\
         1,Goblin Warrior - A small humanoid raider.\n\
         2,ERROR WHILE PROCESSING DESCRIPTION - ERROR WHILE PROCESSING DESCRIPTION\n\
         3,\"Says \"\"hi\"\", loudly\"\n"
    );
}

#[test]
fn derived_csv_carries_part_columns() {
    let table = sample_table();
    let derived = derive_columns(&table, SplitPolicy::First);
    let text = String::from_utf8(render_csv(Tabular::Derived(&derived)).unwrap()).unwrap();

    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("ID,description,description_part1,description_part2")
    );
    assert_eq!(
        lines.next(),
        Some("1,Goblin Warrior - A small humanoid raider.,Goblin Warrior,A small humanoid raider.")
    );
    assert_eq!(lines.nth(1), Some("3,\"Says \"\"hi\"\", loudly\",,"));
}

#[test]
fn sink_names_files_by_pattern() {
    let temp = TempDir::new().unwrap();
    let sink = CsvTableSink::new(temp.path().to_path_buf());
    let table = sample_table();

    let row_path = sink
        .write(SinkName::Row(2), Tabular::Rows(&table.rows()[1..2]))
        .unwrap();
    let checkpoint_path = sink
        .write(SinkName::Checkpoint(10), Tabular::Rows(table.rows()))
        .unwrap();

    assert_eq!(row_path, temp.path().join("individual_result_for_2.csv"));
    assert_eq!(checkpoint_path, temp.path().join("results_after_10.csv"));
    assert_eq!(fs::read_to_string(&checkpoint_path).unwrap().lines().count(), 4);
}
