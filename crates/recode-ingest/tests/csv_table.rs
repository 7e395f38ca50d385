use std::fs;
use std::path::PathBuf;

use recode_ingest::{CsvOptions, IngestError, read_dictionary, read_frame, write_frame};
use recode_model::Cell;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_read_dictionary_keeps_empty_and_nulls_na() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "dict.csv",
        "from,to\nY,Yes\nNA,Not applicable\n,Blank\n.default,Unknown\n",
    );

    let dictionary = read_dictionary(&path, &CsvOptions::default()).unwrap();

    assert_eq!(dictionary.column_names(), vec!["from", "to"]);
    assert_eq!(dictionary.height(), 4);
    let keys = &dictionary.columns()[0].cells;
    assert_eq!(keys[0], Cell::Text("Y".to_string()));
    assert_eq!(keys[1], Cell::Null);
    assert_eq!(keys[2], Cell::Text(String::new()));
}

#[test]
fn test_read_dictionary_pads_short_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "dict.csv", "from,to,variable\nY,Yes\n");

    let dictionary = read_dictionary(&path, &CsvOptions::default()).unwrap();

    assert_eq!(dictionary.columns()[2].cells[0], Cell::Text(String::new()));
}

#[test]
fn test_read_dictionary_rejects_long_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "dict.csv", "from,to\nY,Yes,extra\n");

    let err = read_dictionary(&path, &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::CsvParse { .. }));
}

#[test]
fn test_read_frame_treats_empty_and_na_as_null() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "data.csv", "id;smoker\n1;Y\n2;\n3;NA\n");
    let options = CsvOptions::new().with_delimiter(b';');

    let frame = read_frame(&path, &options).unwrap();

    assert_eq!(frame.shape(), (3, 2));
    let smoker = frame.column("smoker").unwrap();
    assert_eq!(smoker.null_count(), 2);
}

#[test]
fn test_missing_and_empty_files_are_errors() {
    let dir = TempDir::new().unwrap();
    let err = read_frame(&dir.path().join("absent.csv"), &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));

    let empty = write_csv(&dir, "empty.csv", "");
    let err = read_dictionary(&empty, &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyCsv { .. }));
}

#[test]
fn test_write_frame_round_trips_through_read_frame() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "data.csv", "smoker,site\nYes,A\n,B\n");
    let mut frame = read_frame(&input, &CsvOptions::default()).unwrap();

    let output = dir.path().join("out.csv");
    write_frame(&mut frame, &output).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, "smoker,site\nYes,A\n,B\n");
    let reread = read_frame(&output, &CsvOptions::default()).unwrap();
    assert!(reread.equals_missing(&frame));
}
