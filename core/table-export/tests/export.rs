//! Integration tests for the export entry points.

use dataset::{record_from_json, ColumnDef, Record};
use serde_json::{json, Value};
use table_export::{
    export_csv, export_excel, export_json, export_print, export_table, render_csv, render_json,
    CsvOptions, DataTransformer, DirectoryTarget, ExportOptions, MemoryTarget, StaticTable,
    TableSource,
};

fn records(values: Vec<Value>) -> Vec<Record> {
    values.into_iter().map(record_from_json).collect()
}

fn staff() -> (Vec<Record>, Vec<ColumnDef>) {
    let rows = records(vec![
        json!({ "name": "Ann", "dept": "Eng", "salary": 100, "note": "likes \"tabs\"" }),
        json!({ "name": "Bo, Jr.", "dept": "Eng", "salary": 200, "note": null }),
        json!({ "name": "Cy", "dept": "Sales", "salary": 50, "note": "multi\nline" }),
    ]);
    let columns = vec![
        ColumnDef::new("name").with_header("Full name"),
        ColumnDef::new("dept"),
        ColumnDef::new("pay").with_header("Salary").with_accessor_key("salary"),
        ColumnDef::new("note"),
    ];
    (rows, columns)
}

#[test]
fn csv_scenario_with_custom_header() {
    let rows = records(vec![json!({ "name": "A,B" })]);
    let columns = vec![ColumnDef::new("name")];
    let mut options = ExportOptions::default();
    options.custom_headers.insert("name".to_string(), "Name".to_string());

    let mut target = MemoryTarget::new();
    let result = export_csv(&rows, &columns, &options, &mut target);

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.format, "csv");
    assert_eq!(result.row_count, 1);
    assert_eq!(result.filename, "export.csv");

    let file = target.last_file().expect("saved file");
    assert_eq!(file.text(), Some("Name\n\"A,B\""));
    assert_eq!(file.mime_type, "text/csv;charset=utf-8");
}

#[test]
fn csv_headers_and_field_counts_round_trip() {
    let rows = records(vec![
        json!({ "a": "x", "b": 1, "c": true }),
        json!({ "a": "y", "c": "z" }),
    ]);
    let columns = vec![
        ColumnDef::new("a").with_header("Alpha"),
        ColumnDef::new("b"),
        ColumnDef::new("c").with_header("Gamma"),
    ];
    let mut options = ExportOptions::default();
    options.custom_headers.insert("c".to_string(), "Custom C".to_string());

    for delimiter in [',', ';', '\t', '|'] {
        options.csv = CsvOptions { delimiter, ..CsvOptions::default() };
        let text = render_csv(&rows, &columns, &options).expect("csv");
        let lines: Vec<&str> = text.split('\n').collect();

        let header: Vec<&str> = lines[0].split(delimiter).collect();
        assert_eq!(header, vec!["Alpha", "b", "Custom C"]);
        assert_eq!(lines.len(), 3);
        for line in &lines[1..] {
            assert_eq!(line.split(delimiter).count(), 3);
        }
    }
}

#[test]
fn csv_escapes_commas_quotes_and_newlines() {
    let (rows, columns) = staff();
    let text = render_csv(&rows, &columns, &ExportOptions::default()).expect("csv");

    assert_eq!(
        text,
        "Full name,dept,Salary,note\n\
         Ann,Eng,100,\"likes \"\"tabs\"\"\"\n\
         \"Bo, Jr.\",Eng,200,\n\
         Cy,Sales,50,\"multi\nline\""
    );
}

#[test]
fn csv_without_headers_and_quote_all() {
    let rows = records(vec![json!({ "a": "1", "b": "2" })]);
    let columns = vec![ColumnDef::new("a"), ColumnDef::new("b")];
    let options = ExportOptions {
        include_headers: false,
        csv: CsvOptions { quote_all: true, ..CsvOptions::default() },
        ..ExportOptions::default()
    };

    assert_eq!(render_csv(&rows, &columns, &options).expect("csv"), "\"1\",\"2\"");
}

#[test]
fn include_then_exclude_leaves_only_a() {
    let rows = records(vec![json!({ "A": 1, "B": 2, "C": 3 })]);
    let columns = vec![ColumnDef::new("A"), ColumnDef::new("B"), ColumnDef::new("C")];
    let options = ExportOptions {
        include_columns: vec!["A".to_string(), "B".to_string()],
        exclude_columns: vec!["B".to_string()],
        ..ExportOptions::default()
    };

    assert_eq!(render_csv(&rows, &columns, &options).expect("csv"), "A\n1");

    let parsed: Value = serde_json::from_str(&render_json(&rows, &columns, &options).expect("json"))
        .expect("parse");
    assert_eq!(parsed, json!([{ "A": 1 }]));
}

#[test]
fn json_export_is_idempotent() {
    let (rows, columns) = staff();
    let options = ExportOptions::default();

    let mut first = MemoryTarget::new();
    let mut second = MemoryTarget::new();
    assert!(export_json(&rows, &columns, &options, &mut first).success);
    assert!(export_json(&rows, &columns, &options, &mut second).success);

    let a = first.last_file().expect("first");
    let b = second.last_file().expect("second");
    assert_eq!(a.contents, b.contents);
    assert_eq!(a.filename, "export.json");
    assert_eq!(a.mime_type, "application/json");
}

#[test]
fn transformer_decides_row_count() {
    let (rows, columns) = staff();
    let options = ExportOptions {
        transform: Some(DataTransformer::infallible(|rows| {
            rows.into_iter()
                .filter(|r| r.get("dept") == Some(&json!("Eng")))
                .collect()
        })),
        ..ExportOptions::default()
    };

    let mut target = MemoryTarget::new();
    let result = export_csv(&rows, &columns, &options, &mut target);

    assert!(result.success);
    assert_eq!(result.row_count, 2);
    let text = target.last_file().and_then(|f| f.text()).unwrap_or_default().to_string();
    assert_eq!(text.lines().count(), 3);
    assert!(!text.contains("Sales"));
}

#[test]
fn failing_transformer_reports_failure_and_saves_nothing() {
    let (rows, columns) = staff();
    let options = ExportOptions {
        transform: Some(DataTransformer::new(|rows| {
            if rows.iter().any(|r| r.get("note").map_or(true, Value::is_null)) {
                Err("note is required".to_string())
            } else {
                Ok(rows)
            }
        })),
        ..ExportOptions::default()
    };

    let mut target = MemoryTarget::new();
    let result = export_csv(&rows, &columns, &options, &mut target);
    assert!(!result.success);
    assert_eq!(result.row_count, 0);
    assert_eq!(result.error.as_deref(), Some("Data transform failed: note is required"));
    assert!(target.files.is_empty());

    let dir = tempfile::tempdir().expect("tempdir");
    let mut directory = DirectoryTarget::new(dir.path());
    for result in [
        export_excel(&rows, &columns, &options, &mut directory),
        export_json(&rows, &columns, &options, &mut directory),
        export_print(&rows, &columns, &options, &mut directory),
    ] {
        assert!(!result.success);
    }
    assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 0);
}

#[test]
fn print_documents_do_not_overwrite_downloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (rows, columns) = staff();
    let options = ExportOptions { filename: "staff".to_string(), ..ExportOptions::default() };
    let mut target = DirectoryTarget::new(dir.path());

    let result = export_print(&rows, &columns, &options, &mut target);

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.filename, "staff.html");
    let html = std::fs::read_to_string(dir.path().join("staff.print.html")).expect("print document");
    assert!(html.contains("<td>Bo, Jr.</td>"));
    assert!(!dir.path().join("staff.html").exists());
}

#[test]
fn accessor_functions_take_precedence() {
    let (rows, _) = staff();
    let columns = vec![
        ColumnDef::new("name"),
        ColumnDef::new("label").with_accessor(|r| {
            let name = r.get("name").and_then(Value::as_str).unwrap_or("");
            let dept = r.get("dept").and_then(Value::as_str).unwrap_or("");
            json!(format!("{} ({})", name, dept))
        }),
    ];
    let options = ExportOptions { include_headers: false, ..ExportOptions::default() };

    let text = render_csv(&rows, &columns, &options).expect("csv");

    assert_eq!(text.lines().next(), Some("Ann,Ann (Eng)"));
}

#[test]
fn unsupported_format_fails_without_generating() {
    let (rows, columns) = staff();
    let table = StaticTable::new(rows, columns);
    let mut target = MemoryTarget::new();

    let result = export_table(&table, "docx", &ExportOptions::default(), &mut target);

    assert!(!result.success);
    assert_eq!(result.format, "docx");
    assert_eq!(result.row_count, 0);
    assert!(result.error.unwrap_or_default().contains("Unsupported export format"));
    assert!(target.files.is_empty());
    assert!(target.printed.is_empty());
}

#[test]
fn export_table_dispatches_on_tag() {
    let (rows, columns) = staff();
    let table = StaticTable::new(rows, columns);
    let options = ExportOptions { filename: "staff".to_string(), ..ExportOptions::default() };
    let mut target = MemoryTarget::new();

    let csv = export_table(&table, "CSV", &options, &mut target);
    let xlsx = export_table(&table, "xlsx", &options, &mut target);
    let json = export_table(&table, "json", &options, &mut target);
    let pdf = export_table(&table, "pdf", &options, &mut target);

    for result in [&csv, &xlsx, &json, &pdf] {
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.row_count, 3);
    }
    assert_eq!(xlsx.format, "excel");
    let names: Vec<&str> = target.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["staff.csv", "staff.xlsx", "staff.json"]);
    assert_eq!(target.printed.len(), 1);
    assert_eq!(target.printed[0].filename, "staff.html");
    assert!(target.printed[0].html.contains("<td>Bo, Jr.</td>"));
}

#[test]
fn blocked_print_surface_names_the_popup_blocker() {
    let (rows, columns) = staff();
    let mut target = MemoryTarget { block_print: true, ..MemoryTarget::new() };

    let result = export_print(&rows, &columns, &ExportOptions::default(), &mut target);

    assert!(!result.success);
    assert_eq!(result.format, "pdf");
    assert!(result.error.unwrap_or_default().contains("popup blocker"));
}

#[test]
fn delivery_failures_become_results() {
    let (rows, columns) = staff();
    let mut target = MemoryTarget {
        fail_saves: Some("disk full".to_string()),
        ..MemoryTarget::new()
    };

    let result = export_excel(&rows, &columns, &ExportOptions::default(), &mut target);

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Delivery failed: disk full"));
    assert!(target.files.is_empty());
}

#[test]
fn invalid_csv_options_fail_before_delivery() {
    let (rows, columns) = staff();
    let options = ExportOptions {
        csv: CsvOptions { delimiter: '"', ..CsvOptions::default() },
        ..ExportOptions::default()
    };
    let mut target = MemoryTarget::new();

    let result = export_csv(&rows, &columns, &options, &mut target);

    assert!(!result.success);
    assert!(target.files.is_empty());
}

#[test]
fn directory_target_receives_files_and_leaves_nothing_on_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (rows, columns) = staff();
    let mut target = DirectoryTarget::new(dir.path());

    let ok = export_excel(
        &rows,
        &columns,
        &ExportOptions { filename: "staff".to_string(), ..ExportOptions::default() },
        &mut target,
    );
    assert!(ok.success, "{:?}", ok.error);
    let bytes = std::fs::read(dir.path().join("staff.xlsx")).expect("xlsx on disk");
    assert_eq!(&bytes[..2], b"PK");

    let bad_sheet = ExportOptions {
        filename: "broken".to_string(),
        excel: table_export::ExcelOptions { sheet_name: "no[good]".to_string() },
        ..ExportOptions::default()
    };
    let failed = export_excel(&rows, &columns, &bad_sheet, &mut target);
    assert!(!failed.success);
    assert!(!dir.path().join("broken.xlsx").exists());
    assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 1);
}

struct PivotTable(pivot_engine::PivotResult);

impl TableSource for PivotTable {
    fn rows(&self) -> Vec<Record> {
        self.0.to_records()
    }

    fn columns(&self) -> Vec<ColumnDef> {
        self.0.columns()
    }
}

#[test]
fn pivot_results_export_like_any_table() {
    use pivot_engine::{aggregate, AggregationType, PivotRequest, ValueField};

    let input = records(vec![
        json!({ "dept": "Eng", "salary": 100 }),
        json!({ "dept": "Eng", "salary": 200 }),
        json!({ "dept": "Sales", "salary": 50 }),
    ]);
    let request = PivotRequest {
        row_fields: vec!["dept".to_string()],
        column_fields: Vec::new(),
        value_fields: vec![ValueField::new("salary", AggregationType::Sum)],
    };
    let table = PivotTable(aggregate(&input, &request));
    let mut target = MemoryTarget::new();

    let result = export_table(&table, "csv", &ExportOptions::default(), &mut target);

    assert!(result.success);
    assert_eq!(result.row_count, 2);
    assert_eq!(
        target.last_file().and_then(|f| f.text()),
        Some("dept,Sum of salary\nEng,300\nSales,50")
    );
}
