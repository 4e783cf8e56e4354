use std::env;
use std::path::PathBuf;

use chrono::Datelike;

/// Runtime configuration, resolved once at startup from env vars
/// (`.env.local` / `.env` are loaded by the binaries before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub clubs_path: PathBuf,
    pub logos_path: PathBuf,
    pub season_min: i32,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = env::var("T5_DATA_DIR").unwrap_or_else(|_| "cleaned_data".to_string());
        let clubs_file =
            env::var("T5_CLUBS_FILE").unwrap_or_else(|_| "t5_league_clubs.parquet".to_string());
        let logos_file =
            env::var("T5_LOGOS_FILE").unwrap_or_else(|_| "competitions.json".to_string());
        let season_min = env::var("SEASON_MIN")
            .ok()
            .and_then(|val| val.parse::<i32>().ok())
            .unwrap_or_else(default_season_min);

        let data_dir = PathBuf::from(data_dir);
        Self {
            clubs_path: data_dir.join(clubs_file),
            logos_path: data_dir.join(logos_file),
            season_min,
        }
    }
}

/// A club active in the current season carries the starting year of that
/// season in `last_season`, so before July the latest tag is last year's.
fn default_season_min() -> i32 {
    let now = chrono::Local::now();
    if now.month() >= 7 {
        now.year()
    } else {
        now.year() - 1
    }
}
