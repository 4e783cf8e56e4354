use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::{self, LeagueSummary};
use crate::dataset::ClubRecord;
use crate::labels;

pub struct ExportReport {
    pub leagues: usize,
    pub share_rows: usize,
    pub transfer_rows: usize,
}

/// Write the league summary table to an xlsx workbook, plus the share and
/// transfer boards for `league` when one is selected.
pub fn export_dashboard(
    path: &Path,
    summaries: &[LeagueSummary],
    records: &[ClubRecord],
    league: Option<&str>,
) -> Result<ExportReport> {
    let mut league_rows = vec![vec![
        "League".to_string(),
        "Total Market Value".to_string(),
        "Net Transfer (M€)".to_string(),
        "Avg Squad Size".to_string(),
        "Foreigners %".to_string(),
        "Avg Age".to_string(),
        "Clubs".to_string(),
    ]];
    for s in summaries {
        league_rows.push(vec![
            labels::title_label(&s.competition_code),
            format!("{:.0}", s.total_market_value),
            format!("{:.1}", s.net_transfer_mil),
            format!("{:.1}", s.squad_size),
            format!("{:.1}", s.foreigners_percentage),
            format!("{:.1}", s.average_age),
            s.clubs.to_string(),
        ]);
    }

    let mut share_rows = vec![vec![
        "Club".to_string(),
        "Market Value".to_string(),
        "Share %".to_string(),
    ]];
    let mut transfer_rows = vec![vec![
        "Club".to_string(),
        "Net Transfer (M€)".to_string(),
        "Type".to_string(),
    ]];

    if let Some(league) = league {
        let shares = aggregate::club_share_within_league(records, league)
            .with_context(|| format!("club shares for {league}"))?;
        for share in &shares {
            share_rows.push(vec![
                labels::title_label(&share.club_code),
                format!("{:.0}", share.total_market_value),
                format!("{:.1}", share.share_pct * 100.0),
            ]);
        }

        let board = aggregate::top_transfers(records, league, 5)
            .with_context(|| format!("top transfers for {league}"))?;
        for row in &board.spenders {
            transfer_rows.push(vec![
                labels::title_label(&row.club_code),
                format!("{:.1}", row.net_transfer_mil),
                "Spender".to_string(),
            ]);
        }
        for row in &board.earners {
            transfer_rows.push(vec![
                labels::title_label(&row.club_code),
                format!("{:.1}", row.net_transfer_mil),
                "Earner".to_string(),
            ]);
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Leagues")?;
        write_rows(sheet, &league_rows)?;
    }
    if share_rows.len() > 1 {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Shares")?;
        write_rows(sheet, &share_rows)?;
    }
    if transfer_rows.len() > 1 {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Transfers")?;
        write_rows(sheet, &transfer_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        leagues: summaries.len(),
        share_rows: share_rows.len().saturating_sub(1),
        transfer_rows: transfer_rows.len().saturating_sub(1),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell r{row_idx} c{col_idx}"))?;
        }
    }
    Ok(())
}
