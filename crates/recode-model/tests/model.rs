#![allow(missing_docs)]

use recode_model::{
    Categorical, Cell, ColumnSelector, DictionaryColumn, DictionaryTable, FrameOptions,
    RecodeError, ResolveOptions, ValueVector,
};

fn yes_no_table() -> DictionaryTable {
    DictionaryTable::new(vec![
        DictionaryColumn::new("options", vec![Cell::from("Y"), Cell::from("N")]),
        DictionaryColumn::new("values", vec![Cell::from("Yes"), Cell::from("No")]),
        DictionaryColumn::new("grp", vec![Cell::from("smoker"), Cell::from("smoker")]),
    ])
    .expect("rectangular table")
}

#[test]
fn test_resolve_by_name_and_position() {
    let table = yes_no_table();
    assert_eq!(table.resolve(&ColumnSelector::name("values")).unwrap(), 1);
    assert_eq!(table.resolve(&ColumnSelector::Position(3)).unwrap(), 2);
    assert_eq!(table.column(&"grp".into()).unwrap().name, "grp");
}

#[test]
fn test_unknown_columns_are_invalid_dictionary() {
    let table = yes_no_table();
    let err = table.resolve(&ColumnSelector::Position(4)).unwrap_err();
    assert!(matches!(err, RecodeError::InvalidDictionary(_)));
    assert!(err.to_string().contains("out of range"));

    let err = table.resolve(&ColumnSelector::name("nope")).unwrap_err();
    assert!(err.to_string().contains("options, values, grp"));
}

#[test]
fn test_ragged_columns_are_rejected() {
    let result = DictionaryTable::new(vec![
        DictionaryColumn::new("from", vec![Cell::from("Y")]),
        DictionaryColumn::new("to", vec![]),
    ]);
    assert!(matches!(result, Err(RecodeError::InvalidDictionary(_))));
}

#[test]
fn test_resolve_options_defaults() {
    let options = ResolveOptions::default();
    assert_eq!(options.from, ColumnSelector::Position(1));
    assert_eq!(options.to, ColumnSelector::Position(2));
    assert!(!options.quiet);
    assert!(options.warn_default);
    assert!(options.anchor_regex);
    assert_eq!(options.input_label(), "input");
    assert_eq!(options.dictionary_label(), "dictionary");

    let json = serde_json::to_string(&options.with_input_label("smoking")).expect("serialize");
    let round: ResolveOptions = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(round.input_label(), "smoking");
}

#[test]
fn test_frame_options_are_quiet_unless_warn() {
    let options = FrameOptions::default();
    assert_eq!(options.by, ColumnSelector::Position(3));
    let column = options.column_options("smoker");
    assert!(column.quiet);
    assert_eq!(column.input_label(), "column 'smoker'");

    let loud = FrameOptions::new().with_warn(true).column_options("smoker");
    assert!(!loud.quiet);
}

#[test]
fn test_categorical_deserialization_is_validated() {
    let out_of_range = serde_json::from_str::<Categorical>(
        r#"{"codes":[5],"levels":["a"],"ordered":true}"#,
    );
    assert!(out_of_range.is_err());

    let duplicate_levels = serde_json::from_str::<Categorical>(
        r#"{"codes":[0],"levels":["a","a"],"ordered":false}"#,
    );
    assert!(duplicate_levels.is_err());

    let valid: Categorical =
        serde_json::from_str(r#"{"codes":[1,null,0],"levels":["a","b"],"ordered":true}"#)
            .expect("deserialize");
    assert_eq!(valid.labels(), vec![Some("b"), None, Some("a")]);
}

#[test]
fn test_value_vector_deserialization_checks_names() {
    let mismatched = serde_json::from_str::<ValueVector>(
        r#"{"values":{"Text":["a","b"]},"names":["only"]}"#,
    );
    assert!(mismatched.is_err());

    let vector = ValueVector::from_strs(&["a"])
        .with_names(vec!["first".to_string()])
        .expect("names");
    let json = serde_json::to_string(&vector).expect("serialize");
    let round: ValueVector = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(round, vector);
}
