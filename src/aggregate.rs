//! League/club aggregation and ranking engine.
//!
//! Every function here is a pure transform over an immutable record slice:
//! no caching, no shared state, safe to call repeatedly or from any thread.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::ClubRecord;
use crate::error::StatsError;

/// Per-league aggregate. Market value and net transfer are totals; squad
/// size, foreigner share and age are means over member clubs. Mixing sums
/// and means is deliberate: money adds up across clubs, demographics don't.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSummary {
    pub competition_code: String,
    pub total_market_value: f64,
    pub net_transfer_mil: f64,
    pub squad_size: f64,
    pub foreigners_percentage: f64,
    pub average_age: f64,
    pub clubs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeFacts {
    pub highest_value_league: String,
    /// Gap to the runner-up, in the same unit as `total_market_value`.
    pub margin_over_second: f64,
    pub youngest_league: String,
    pub youngest_age: f64,
    pub most_localized_league: String,
    /// 100 minus the lowest foreigner percentage.
    pub locality_pct: f64,
    pub best_net_league: String,
    pub best_net_mil: f64,
    pub worst_net_league: String,
    pub worst_net_mil: f64,
}

#[derive(Debug, Clone)]
pub struct ClubShare {
    pub club_code: String,
    pub name: String,
    pub total_market_value: f64,
    pub share_pct: f64,
}

#[derive(Debug, Clone)]
pub struct TransferRow {
    pub club_code: String,
    pub name: String,
    pub net_transfer_mil: f64,
}

#[derive(Debug, Clone)]
pub struct TransferBoard {
    /// Largest outflow first (most negative net transfer).
    pub spenders: Vec<TransferRow>,
    /// Largest inflow first.
    pub earners: Vec<TransferRow>,
}

/// Group records by league and compute the five aggregates, sorted by total
/// market value descending. The sort is stable, so tied leagues keep the
/// order in which they first appear in the input.
pub fn summarize(records: &[ClubRecord]) -> Result<Vec<LeagueSummary>, StatsError> {
    if records.is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&ClubRecord>> = HashMap::new();
    for record in records {
        let code = record.competition_code.as_str();
        let members = groups.entry(code).or_default();
        if members.is_empty() {
            order.push(code);
        }
        members.push(record);
    }

    let mut out = Vec::with_capacity(order.len());
    for code in order {
        let members = &groups[code];
        let n = members.len() as f64;
        out.push(LeagueSummary {
            competition_code: code.to_string(),
            total_market_value: members.iter().map(|r| r.total_market_value).sum(),
            net_transfer_mil: members.iter().map(|r| r.net_transfer_mil).sum(),
            squad_size: members.iter().map(|r| r.squad_size).sum::<f64>() / n,
            foreigners_percentage: members.iter().map(|r| r.foreigners_percentage).sum::<f64>()
                / n,
            average_age: members.iter().map(|r| r.average_age).sum::<f64>() / n,
            clubs: members.len(),
        });
    }

    out.sort_by(|a, b| b.total_market_value.total_cmp(&a.total_market_value));
    Ok(out)
}

/// Five independent scans over the summaries. Ties go to the summary seen
/// first in input order. Needs at least two leagues: the margin over the
/// runner-up is undefined with one.
pub fn rank_extremes(summaries: &[LeagueSummary]) -> Result<ExtremeFacts, StatsError> {
    if summaries.len() < 2 {
        return Err(StatsError::InsufficientData {
            needed: 2,
            got: summaries.len(),
        });
    }

    let richest = max_by(summaries, |s| s.total_market_value);
    let mut values: Vec<f64> = summaries.iter().map(|s| s.total_market_value).collect();
    values.sort_by(|a, b| b.total_cmp(a));
    let margin_over_second = values[0] - values[1];

    let youngest = min_by(summaries, |s| s.average_age);
    let most_local = min_by(summaries, |s| s.foreigners_percentage);
    let best_net = max_by(summaries, |s| s.net_transfer_mil);
    let worst_net = min_by(summaries, |s| s.net_transfer_mil);

    Ok(ExtremeFacts {
        highest_value_league: richest.competition_code.clone(),
        margin_over_second,
        youngest_league: youngest.competition_code.clone(),
        youngest_age: youngest.average_age,
        most_localized_league: most_local.competition_code.clone(),
        locality_pct: 100.0 - most_local.foreigners_percentage,
        best_net_league: best_net.competition_code.clone(),
        best_net_mil: best_net.net_transfer_mil,
        worst_net_league: worst_net.competition_code.clone(),
        worst_net_mil: worst_net.net_transfer_mil,
    })
}

/// Each club's slice of its league's total market value, largest first.
pub fn club_share_within_league(
    records: &[ClubRecord],
    league: &str,
) -> Result<Vec<ClubShare>, StatsError> {
    let mut members: Vec<&ClubRecord> = records
        .iter()
        .filter(|r| r.competition_code == league)
        .collect();
    if members.is_empty() {
        return Err(StatsError::UnknownLeague {
            league: league.to_string(),
        });
    }
    members.sort_by(|a, b| b.total_market_value.total_cmp(&a.total_market_value));

    let total: f64 = members.iter().map(|r| r.total_market_value).sum();
    Ok(members
        .into_iter()
        .map(|r| ClubShare {
            club_code: r.club_code.clone(),
            name: r.name.clone(),
            total_market_value: r.total_market_value,
            share_pct: if total > 0.0 {
                r.total_market_value / total
            } else {
                0.0
            },
        })
        .collect())
}

/// Top `n` net spenders and top `n` net earners in a league. Clubs with a
/// zero net transfer sit on neither board; short sides come back as-is.
pub fn top_transfers(
    records: &[ClubRecord],
    league: &str,
    n: usize,
) -> Result<TransferBoard, StatsError> {
    let members: Vec<&ClubRecord> = records
        .iter()
        .filter(|r| r.competition_code == league)
        .collect();
    if members.is_empty() {
        return Err(StatsError::UnknownLeague {
            league: league.to_string(),
        });
    }

    let mut spenders: Vec<TransferRow> = members
        .iter()
        .filter(|r| r.net_transfer_mil < 0.0)
        .map(|r| transfer_row(r))
        .collect();
    spenders.sort_by(|a, b| a.net_transfer_mil.total_cmp(&b.net_transfer_mil));
    spenders.truncate(n);

    let mut earners: Vec<TransferRow> = members
        .iter()
        .filter(|r| r.net_transfer_mil > 0.0)
        .map(|r| transfer_row(r))
        .collect();
    earners.sort_by(|a, b| b.net_transfer_mil.total_cmp(&a.net_transfer_mil));
    earners.truncate(n);

    Ok(TransferBoard { spenders, earners })
}

fn transfer_row(record: &ClubRecord) -> TransferRow {
    TransferRow {
        club_code: record.club_code.clone(),
        name: record.name.clone(),
        net_transfer_mil: record.net_transfer_mil,
    }
}

fn min_by<'a, F>(summaries: &'a [LeagueSummary], key: F) -> &'a LeagueSummary
where
    F: Fn(&LeagueSummary) -> f64,
{
    let mut best = &summaries[0];
    for s in &summaries[1..] {
        if key(s) < key(best) {
            best = s;
        }
    }
    best
}

fn max_by<'a, F>(summaries: &'a [LeagueSummary], key: F) -> &'a LeagueSummary
where
    F: Fn(&LeagueSummary) -> f64,
{
    let mut best = &summaries[0];
    for s in &summaries[1..] {
        if key(s) > key(best) {
            best = s;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club(code: &str, league: &str, value: f64, net_mil: f64) -> ClubRecord {
        ClubRecord {
            club_code: code.to_string(),
            name: code.to_string(),
            competition_code: league.to_string(),
            last_season: 2024,
            total_market_value: value,
            net_transfer_value: net_mil * 1_000_000.0,
            net_transfer_mil: net_mil,
            net_transfer_sign: if net_mil < 0.0 { "-" } else { "+" }.to_string(),
            squad_size: 25.0,
            foreigners_percentage: 50.0,
            average_age: 25.0,
        }
    }

    fn summary(code: &str, value: f64) -> LeagueSummary {
        LeagueSummary {
            competition_code: code.to_string(),
            total_market_value: value,
            net_transfer_mil: 0.0,
            squad_size: 25.0,
            foreigners_percentage: 50.0,
            average_age: 25.0,
            clubs: 1,
        }
    }

    #[test]
    fn summarize_rejects_empty_input() {
        assert!(matches!(summarize(&[]), Err(StatsError::EmptyInput)));
    }

    #[test]
    fn summarize_keeps_discovery_order_on_ties() {
        let records = vec![
            club("a", "ligue-1", 100.0, 0.0),
            club("b", "serie-a", 100.0, 0.0),
        ];
        let summaries = summarize(&records).unwrap();
        assert_eq!(summaries[0].competition_code, "ligue-1");
        assert_eq!(summaries[1].competition_code, "serie-a");
    }

    #[test]
    fn extremes_tie_goes_to_first_in_input_order() {
        let mut first = summary("epl", 200.0);
        first.average_age = 24.0;
        let mut second = summary("la-liga", 100.0);
        second.average_age = 24.0;
        let facts = rank_extremes(&[first, second]).unwrap();
        assert_eq!(facts.youngest_league, "epl");
    }

    #[test]
    fn extremes_need_two_leagues() {
        let err = rank_extremes(&[summary("epl", 100.0)]).unwrap_err();
        assert!(matches!(
            err,
            StatsError::InsufficientData { needed: 2, got: 1 }
        ));
    }

    #[test]
    fn transfers_exclude_zero_net() {
        let records = vec![
            club("buyer", "epl", 100.0, -80.0),
            club("idle", "epl", 90.0, 0.0),
            club("seller", "epl", 80.0, 35.0),
        ];
        let board = top_transfers(&records, "epl", 5).unwrap();
        assert_eq!(board.spenders.len(), 1);
        assert_eq!(board.earners.len(), 1);
        assert!(board.spenders.iter().all(|r| r.club_code != "idle"));
        assert!(board.earners.iter().all(|r| r.club_code != "idle"));
    }

    #[test]
    fn spenders_sorted_largest_outflow_first() {
        let records = vec![
            club("small", "epl", 100.0, -10.0),
            club("big", "epl", 90.0, -120.0),
            club("mid", "epl", 80.0, -50.0),
        ];
        let board = top_transfers(&records, "epl", 2).unwrap();
        let codes: Vec<&str> = board.spenders.iter().map(|r| r.club_code.as_str()).collect();
        assert_eq!(codes, vec!["big", "mid"]);
    }
}
