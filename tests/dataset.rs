use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::{SerializedFileWriter, SerializedRowGroupWriter};
use parquet::schema::parser::parse_message_type;

use t5_terminal::dataset::{load_clubs, load_logos, retain_current_season, ClubRecord};
use t5_terminal::error::StatsError;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn club_for_season(code: &str, season: i32) -> ClubRecord {
    ClubRecord {
        club_code: code.to_string(),
        name: code.to_string(),
        competition_code: "premier-league".to_string(),
        last_season: season,
        total_market_value: 100.0,
        net_transfer_value: 0.0,
        net_transfer_mil: 0.0,
        net_transfer_sign: "+".to_string(),
        squad_size: 25.0,
        foreigners_percentage: 50.0,
        average_age: 25.0,
    }
}

// Two clubs in one league, one of them relegated after 2019. The optional
// display columns (net_transfer_value, net_transfer_sign) are left out to
// mirror older dataset exports.
fn write_clubs_parquet(path: &Path, with_net_mil: bool) {
    let mut fields = vec![
        "required binary club_code (UTF8);",
        "required binary name (UTF8);",
        "required binary competition_code (UTF8);",
        "required int64 last_season;",
        "required double total_market_value;",
    ];
    if with_net_mil {
        fields.push("required double net_transfer_Mil;");
    }
    fields.extend([
        "required double squad_size;",
        "required double foreigners_percentage;",
        "required double average_age;",
    ]);
    let message = format!("message club {{\n{}\n}}", fields.join("\n"));
    let schema = Arc::new(parse_message_type(&message).unwrap());

    let file = File::create(path).unwrap();
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();
    let mut row_group = writer.next_row_group().unwrap();

    write_str_column(&mut row_group, &["arsenal", "leeds-united"]);
    write_str_column(&mut row_group, &["Arsenal FC", "Leeds United"]);
    write_str_column(&mut row_group, &["premier-league", "premier-league"]);
    write_i64_column(&mut row_group, &[2024, 2019]);
    write_f64_column(&mut row_group, &[1_200_000_000.0, 300_000_000.0]);
    if with_net_mil {
        write_f64_column(&mut row_group, &[-150.0, 20.0]);
    }
    write_f64_column(&mut row_group, &[26.0, 24.0]);
    write_f64_column(&mut row_group, &[65.0, 40.0]);
    write_f64_column(&mut row_group, &[25.2, 26.5]);

    row_group.close().unwrap();
    writer.close().unwrap();
}

fn write_str_column(row_group: &mut SerializedRowGroupWriter<'_, File>, values: &[&str]) {
    let data: Vec<ByteArray> = values.iter().map(|v| ByteArray::from(*v)).collect();
    let mut col = row_group.next_column().unwrap().expect("string column");
    col.typed::<ByteArrayType>()
        .write_batch(&data, None, None)
        .unwrap();
    col.close().unwrap();
}

fn write_i64_column(row_group: &mut SerializedRowGroupWriter<'_, File>, values: &[i64]) {
    let mut col = row_group.next_column().unwrap().expect("int column");
    col.typed::<Int64Type>()
        .write_batch(values, None, None)
        .unwrap();
    col.close().unwrap();
}

fn write_f64_column(row_group: &mut SerializedRowGroupWriter<'_, File>, values: &[f64]) {
    let mut col = row_group.next_column().unwrap().expect("double column");
    col.typed::<DoubleType>()
        .write_batch(values, None, None)
        .unwrap();
    col.close().unwrap();
}

#[test]
fn parquet_round_trips_with_season_filter_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clubs.parquet");
    write_clubs_parquet(&path, true);

    let records = load_clubs(&path, 2024).unwrap();
    assert_eq!(records.len(), 1, "relegated club should be filtered out");

    let club = &records[0];
    assert_eq!(club.club_code, "arsenal");
    assert_eq!(club.name, "Arsenal FC");
    assert_eq!(club.competition_code, "premier-league");
    assert_eq!(club.last_season, 2024);
    assert!((club.total_market_value - 1_200_000_000.0).abs() < 1e-6);
    assert!((club.net_transfer_mil + 150.0).abs() < 1e-9);
    assert!((club.squad_size - 26.0).abs() < 1e-9);
    assert!((club.foreigners_percentage - 65.0).abs() < 1e-9);
    assert!((club.average_age - 25.2).abs() < 1e-9);

    // Optional display columns were absent from the file and default.
    assert_eq!(club.net_transfer_sign, "");
    assert_eq!(club.net_transfer_value, 0.0);
}

#[test]
fn parquet_missing_required_column_names_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clubs_no_net.parquet");
    write_clubs_parquet(&path, false);

    let err = load_clubs(&path, 2024).unwrap_err();
    assert!(matches!(err, StatsError::DataUnavailable { .. }));
    assert!(
        err.to_string().contains("net_transfer_Mil"),
        "error should name the missing column: {err}"
    );
}

#[test]
fn missing_parquet_file_is_data_unavailable() {
    let err = load_clubs(&fixture_path("does_not_exist.parquet"), 2024).unwrap_err();
    assert!(matches!(err, StatsError::DataUnavailable { .. }));
}

#[test]
fn season_filter_drops_stale_rows() {
    let records = vec![
        club_for_season("current", 2024),
        club_for_season("relegated", 2021),
        club_for_season("also-current", 2025),
    ];
    let kept = retain_current_season(records, 2024);
    let codes: Vec<&str> = kept.iter().map(|r| r.club_code.as_str()).collect();
    assert_eq!(codes, vec!["current", "also-current"]);
}

#[test]
fn logos_fixture_parses_to_league_map() {
    let logos = load_logos(&fixture_path("competitions.json")).unwrap();
    assert_eq!(logos.len(), 5);
    assert!(logos["premier-league"].starts_with("https://"));
    assert!(logos.contains_key("serie-a"));
}

#[test]
fn missing_logos_file_is_data_unavailable() {
    let err = load_logos(&fixture_path("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, StatsError::DataUnavailable { .. }));
}

#[test]
fn malformed_logos_file_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("competitions.json");
    std::fs::write(&path, "not json").unwrap();
    let err = load_logos(&path).unwrap_err();
    assert!(matches!(err, StatsError::DataUnavailable { .. }));
}
