//! CSV export of the view and of the flat table.
#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use common::{flat_view, sales_table, Call};
use pivotgrid::{export_csv, export_flat_csv, CsvOptions, GridError, CSV_FILE_NAME};

#[tokio::test]
async fn test_view_export_is_formatted() {
    let view = flat_view();

    let csv = export_csv(&view).await.unwrap();

    assert_eq!(view.calls(), vec![Call::ToCsv(CsvOptions { formatted: true })]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Sales,Units");
    assert_eq!(lines[3], ",-7000");
}

#[tokio::test]
async fn test_view_export_errors_propagate() {
    let view = flat_view();
    view.fail_export.set(true);

    let err = export_csv(&view).await.unwrap_err();
    assert!(matches!(err, GridError::Engine(_)));
}

#[tokio::test]
async fn test_flat_export_goes_through_the_table() {
    let mut table = sales_table();
    table.flat_csv = "Region,City\nEurope,Paris".to_string();
    let view = flat_view();

    let csv = export_flat_csv(&table).await.unwrap();

    assert_eq!(csv, "Region,City\nEurope,Paris");
    assert_eq!(
        *table.calls.borrow(),
        vec![Call::TableToFlatCsv(CsvOptions { formatted: true })]
    );
    assert!(view.calls().is_empty());
}

#[test]
fn test_file_name() {
    assert!(CSV_FILE_NAME.ends_with(".csv"));
}
