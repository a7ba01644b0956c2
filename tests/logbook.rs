use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use climb_log::aggregate::{monthly_means, partition};
use climb_log::chart::{CHART_TITLE, ChartData, ChartFormat};
use climb_log::grade::Category;
use climb_log::model::{LongRecord, MonthlyAggregate};
use climb_log::pipeline::{self, RunConfig, TableFormat};
use climb_log::{LogError, report};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

/// A cell written into a fixture sheet.
enum Fixture {
    Num(f64),
    Text(&'static str),
    Blank,
}

use Fixture::{Blank, Num, Text};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn write_logbook(path: &Path, sheets: &[(&str, Vec<u32>, Vec<Vec<Fixture>>)]) {
    let mut workbook = Workbook::new();
    for (name, days, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet named");
        worksheet.write_string(0, 0, "Datum").expect("header written");
        for (col_idx, day) in days.iter().enumerate() {
            worksheet
                .write_number(0, (col_idx + 1) as u16, f64::from(*day))
                .expect("day header written");
        }
        for (row_idx, row) in rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = col_idx as u16;
                match cell {
                    Num(value) => {
                        worksheet
                            .write_number(row_num, col_num, *value)
                            .expect("number written");
                    }
                    Text(value) => {
                        worksheet
                            .write_string(row_num, col_num, *value)
                            .expect("string written");
                    }
                    Blank => {}
                }
            }
        }
    }
    workbook.save(path).expect("workbook saved");
}

fn sample_logbook(dir: &Path) -> PathBuf {
    let path = dir.join("Kletter-Tagebuch.xlsx");
    write_logbook(
        &path,
        &[
            (
                "0125",
                vec![3, 10, 17],
                vec![
                    vec![Text("5+"), Num(2.0), Num(3.0), Num(4.0)],
                    vec![Num(6.0), Blank, Num(1.0), Num(0.0)],
                    vec![Text("4a"), Num(5.0), Blank, Blank],
                    vec![Text("Projekt"), Blank, Num(1.0), Blank],
                ],
            ),
            (
                "0225",
                vec![7, 28],
                vec![
                    vec![Text("5+"), Num(6.0), Blank],
                    vec![Text("5-"), Blank, Num(2.0)],
                    vec![Text("4b"), Num(1.0), Num(3.0)],
                ],
            ),
        ],
    );
    path
}

#[test]
fn workbook_is_melted_into_long_table() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = sample_logbook(temp_dir.path());

    let records = pipeline::load_logbook(&path).expect("logbook loaded");

    assert_eq!(
        records,
        vec![
            LongRecord::new(date(2025, 1, 3), "5+", 2),
            LongRecord::new(date(2025, 1, 3), "4a", 5),
            LongRecord::new(date(2025, 1, 10), "5+", 3),
            LongRecord::new(date(2025, 1, 10), "6", 1),
            LongRecord::new(date(2025, 1, 10), "Projekt", 1),
            LongRecord::new(date(2025, 1, 17), "5+", 4),
            LongRecord::new(date(2025, 2, 7), "5+", 6),
            LongRecord::new(date(2025, 2, 7), "4b", 1),
            LongRecord::new(date(2025, 2, 28), "5-", 2),
            LongRecord::new(date(2025, 2, 28), "4b", 3),
        ]
    );
}

#[test]
fn partition_covers_every_record_exactly_once() {
    let temp_dir = tempdir().expect("temporary directory");
    let records =
        pipeline::load_logbook(&sample_logbook(temp_dir.path())).expect("logbook loaded");

    let split = partition(&records);

    assert_eq!(split.len(), records.len());
    for category in Category::ALL {
        assert!(split.get(category).iter().all(|record| record.category() == category));
    }
    assert_eq!(split.numeric.len(), 6);
    assert_eq!(split.alpha.len(), 3);
    assert_eq!(split.unknown.len(), 1);
}

#[test]
fn monthly_means_average_per_grade() {
    let records = vec![
        LongRecord::new(date(2025, 1, 4), "5+", 2),
        LongRecord::new(date(2025, 1, 20), "5+", 4),
        LongRecord::new(date(2025, 1, 20), "4a", 7),
        LongRecord::new(date(2025, 2, 1), "5+", 1),
    ];

    let means = monthly_means(&records, Category::NumericGroup);

    assert_eq!(
        means,
        vec![
            MonthlyAggregate {
                month: date(2025, 1, 1),
                difficulty: "5+".to_string(),
                mean_n_climbs: 3.0,
            },
            MonthlyAggregate {
                month: date(2025, 2, 1),
                difficulty: "5+".to_string(),
                mean_n_climbs: 1.0,
            },
        ]
    );
}

#[test]
fn monthly_means_of_empty_category_is_empty() {
    let records = vec![LongRecord::new(date(2025, 1, 4), "5+", 2)];

    assert!(monthly_means(&records, Category::AlphaGroup).is_empty());
    assert!(monthly_means(&[], Category::NumericGroup).is_empty());
}

#[test]
fn chart_series_follow_grade_order() {
    let temp_dir = tempdir().expect("temporary directory");
    let records =
        pipeline::load_logbook(&sample_logbook(temp_dir.path())).expect("logbook loaded");

    let numeric = pipeline::category_chart(&records, Category::NumericGroup);
    let labels: Vec<&str> = numeric.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(numeric.title, CHART_TITLE);
    assert_eq!(labels, vec!["5-", "5+", "6"]);

    let five_plus = &numeric.series[1];
    assert_eq!(
        five_plus.points,
        vec![(date(2025, 1, 1), 3.0), (date(2025, 2, 1), 6.0)]
    );

    let alpha = pipeline::category_chart(&records, Category::AlphaGroup);
    let labels: Vec<&str> = alpha.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["4a", "4b"]);
    assert_eq!(alpha.series[1].points, vec![(date(2025, 2, 1), 2.0)]);
}

#[test]
fn chart_data_skips_labels_without_points() {
    let aggregates = vec![MonthlyAggregate {
        month: date(2025, 3, 1),
        difficulty: "6".to_string(),
        mean_n_climbs: 2.5,
    }];
    let order = vec!["5".to_string(), "6".to_string()];

    let data = ChartData::build("title", &aggregates, &order);

    assert_eq!(data.series.len(), 1);
    assert_eq!(data.series[0].label, "6");
    assert!(ChartData::build("title", &[], &order).is_empty());
}

#[test]
fn malformed_sheet_name_aborts_the_load() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("bad.xlsx");
    write_logbook(
        &path,
        &[
            ("0125", vec![1], vec![vec![Text("5"), Num(1.0)]]),
            ("Notes", vec![1], vec![vec![Text("5"), Num(1.0)]]),
        ],
    );

    let err = pipeline::load_logbook(&path).expect_err("load fails");
    assert!(
        matches!(err, LogError::InvalidSheetName { ref sheet, .. } if sheet == "Notes"),
        "unexpected error: {err}"
    );
}

#[test]
fn impossible_date_aborts_the_load() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("bad.xlsx");
    write_logbook(&path, &[("0225", vec![30], vec![vec![Text("5"), Num(2.0)]])]);

    let err = pipeline::load_logbook(&path).expect_err("load fails");
    assert!(
        matches!(err, LogError::InvalidDate { day: 30, month: 2, .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn run_prints_table_without_rendering_charts() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = RunConfig {
        input: sample_logbook(temp_dir.path()),
        out_dir: temp_dir.path().join("charts"),
        chart_format: None,
        table_format: TableFormat::Table,
    };

    let mut out = Vec::new();
    let written = pipeline::run(&config, &mut out).expect("run succeeds");
    let printed = String::from_utf8(out).expect("utf-8 output");

    assert!(written.is_empty());
    assert!(!config.out_dir.exists());
    let header = printed.lines().next().expect("header line");
    assert!(header.contains("date") && header.contains("n_climbs") && header.contains("difficulty"));
    assert!(printed.contains("2025-01-10"));
    assert!(printed.contains("Projekt"));
    assert!(printed.contains("[10 rows x 3 columns]"));
}

#[test]
fn run_can_print_json() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = RunConfig {
        input: sample_logbook(temp_dir.path()),
        out_dir: temp_dir.path().to_path_buf(),
        chart_format: None,
        table_format: TableFormat::Json,
    };

    let mut out = Vec::new();
    pipeline::run(&config, &mut out).expect("run succeeds");
    let parsed: serde_json::Value = serde_json::from_slice(&out).expect("JSON parsed");

    let rows = parsed.as_array().expect("array of records");
    assert_eq!(rows.len(), 10);
    assert_eq!(
        rows[0],
        serde_json::json!({"date": "2025-01-03", "n_climbs": 2, "difficulty": "5+"})
    );
}

#[test]
fn run_rejects_missing_input() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = RunConfig {
        input: temp_dir.path().join("missing.xlsx"),
        out_dir: temp_dir.path().to_path_buf(),
        chart_format: None,
        table_format: TableFormat::Table,
    };

    let err = pipeline::run(&config, &mut Vec::new()).expect_err("run fails");
    assert!(matches!(err, LogError::MissingInput(_)), "unexpected error: {err}");
}

#[test]
fn empty_table_renders_footer_only() {
    let table = report::render_table(&[]);
    assert!(table.contains("[0 rows x 3 columns]"));
}

#[test]
fn run_writes_only_charts_of_categories_with_records() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("numeric.xlsx");
    write_logbook(
        &input,
        &[
            (
                "0125",
                vec![1, 2],
                vec![
                    vec![Text("5"), Num(2.0), Num(4.0)],
                    vec![Text("6+"), Blank, Num(1.0)],
                ],
            ),
            ("0225", vec![5], vec![vec![Text("5"), Num(3.0)]]),
        ],
    );
    let out_dir = temp_dir.path().join("charts");
    let config = RunConfig {
        input,
        out_dir: out_dir.clone(),
        chart_format: Some(ChartFormat::Svg),
        table_format: TableFormat::Table,
    };

    let written = pipeline::run(&config, &mut Vec::new()).expect("run succeeds");

    let numeric_chart = out_dir.join("numeric_grades.svg");
    assert_eq!(written, vec![numeric_chart.clone()]);
    let svg = std::fs::read_to_string(&numeric_chart).expect("chart readable");
    assert!(svg.contains("<svg"));
    assert!(!out_dir.join("alpha_grades.svg").exists());
}
