use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Row, RowAccessor};

use crate::config::Config;
use crate::error::StatsError;

/// One club, one season. The loader filters rows on `last_season` and does
/// not dedupe: the cleaned dataset already carries at most one row per
/// `club_code` per league for the retained season.
#[derive(Debug, Clone)]
pub struct ClubRecord {
    pub club_code: String,
    pub name: String,
    pub competition_code: String,
    pub last_season: i32,
    pub total_market_value: f64,
    pub net_transfer_value: f64,
    pub net_transfer_mil: f64,
    pub net_transfer_sign: String,
    pub squad_size: f64,
    pub foreigners_percentage: f64,
    pub average_age: f64,
}

// Columns the aggregation engine cannot work without. `name`,
// `net_transfer_value` and `net_transfer_sign` are display extras and may
// be absent from older dataset exports.
const REQUIRED_COLUMNS: &[&str] = &[
    "club_code",
    "competition_code",
    "last_season",
    "total_market_value",
    "net_transfer_Mil",
    "squad_size",
    "foreigners_percentage",
    "average_age",
];

static CLUBS: OnceCell<Vec<ClubRecord>> = OnceCell::new();

/// Process-wide record set: loaded on first call, immutable afterwards.
/// Every aggregation is recomputed from this snapshot on demand.
pub fn cached_clubs(config: &Config) -> Result<&'static [ClubRecord], StatsError> {
    CLUBS
        .get_or_try_init(|| load_clubs(&config.clubs_path, config.season_min))
        .map(|clubs| clubs.as_slice())
}

pub fn load_clubs(path: &Path, season_min: i32) -> Result<Vec<ClubRecord>, StatsError> {
    let file = fs::File::open(path)
        .map_err(|err| StatsError::unavailable(format!("open {}: {err}", path.display())))?;
    let reader = SerializedFileReader::new(file)
        .map_err(|err| StatsError::unavailable(format!("read {}: {err}", path.display())))?;

    let columns = column_indices(&reader);
    for name in REQUIRED_COLUMNS {
        if !columns.contains_key(*name) {
            return Err(StatsError::unavailable(format!(
                "{} is missing column {name}",
                path.display()
            )));
        }
    }

    let iter = reader
        .get_row_iter(None)
        .map_err(|err| StatsError::unavailable(format!("iterate {}: {err}", path.display())))?;

    let mut out = Vec::new();
    for row in iter {
        let Ok(row) = row else {
            continue;
        };
        let Some(record) = decode_club_row(&row, &columns) else {
            continue;
        };
        out.push(record);
    }
    Ok(retain_current_season(out, season_min))
}

/// Season filter: rows tagged with an older `last_season` belong to clubs
/// that dropped out of the top divisions and would skew every mean.
pub fn retain_current_season(mut records: Vec<ClubRecord>, season_min: i32) -> Vec<ClubRecord> {
    records.retain(|r| r.last_season >= season_min);
    records
}

/// League code -> crest URL, consumed only by the presentation layer.
pub fn load_logos(path: &Path) -> Result<HashMap<String, String>, StatsError> {
    let raw = fs::read_to_string(path)
        .map_err(|err| StatsError::unavailable(format!("open {}: {err}", path.display())))?;
    serde_json::from_str::<HashMap<String, String>>(&raw)
        .map_err(|err| StatsError::unavailable(format!("parse {}: {err}", path.display())))
}

fn column_indices(reader: &SerializedFileReader<fs::File>) -> HashMap<String, usize> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| (col.name().to_string(), idx))
        .collect()
}

fn decode_club_row(row: &Row, columns: &HashMap<String, usize>) -> Option<ClubRecord> {
    let club_code = read_str(row, columns, "club_code");
    let competition_code = read_str(row, columns, "competition_code");
    if club_code.is_empty() || competition_code.is_empty() {
        return None;
    }
    let name = read_str(row, columns, "name");
    let name = if name.is_empty() {
        club_code.clone()
    } else {
        name
    };
    Some(ClubRecord {
        name,
        last_season: read_num(row, columns, "last_season") as i32,
        total_market_value: read_num(row, columns, "total_market_value"),
        net_transfer_value: read_num(row, columns, "net_transfer_value"),
        net_transfer_mil: read_num(row, columns, "net_transfer_Mil"),
        net_transfer_sign: read_str(row, columns, "net_transfer_sign"),
        squad_size: read_num(row, columns, "squad_size"),
        foreigners_percentage: read_num(row, columns, "foreigners_percentage"),
        average_age: read_num(row, columns, "average_age"),
        club_code,
        competition_code,
    })
}

fn read_str(row: &Row, columns: &HashMap<String, usize>, name: &str) -> String {
    let Some(idx) = columns.get(name) else {
        return String::new();
    };
    row.get_string(*idx)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn read_num(row: &Row, columns: &HashMap<String, usize>, name: &str) -> f64 {
    let Some(idx) = columns.get(name).copied() else {
        return 0.0;
    };
    if let Ok(v) = row.get_double(idx) {
        return v;
    }
    if let Ok(v) = row.get_float(idx) {
        return v as f64;
    }
    if let Ok(v) = row.get_long(idx) {
        return v as f64;
    }
    if let Ok(v) = row.get_int(idx) {
        return v as f64;
    }
    0.0
}
