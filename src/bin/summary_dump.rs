use anyhow::Result;

use t5_terminal::aggregate;
use t5_terminal::config::Config;
use t5_terminal::{dataset, labels};

/// Prints the league summary table and extremes to stdout. With a league
/// code argument it also prints that league's shares and transfer boards.
/// `--json` dumps the summaries as JSON instead.
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let as_json = args.iter().any(|a| a == "--json");
    let league = args.iter().find(|a| !a.starts_with("--")).cloned();

    let config = Config::from_env();
    let records = dataset::load_clubs(&config.clubs_path, config.season_min)?;
    let summaries = aggregate::summarize(&records)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "{} clubs, {} leagues (season >= {})",
        records.len(),
        summaries.len(),
        config.season_min
    );
    for s in &summaries {
        println!(
            "{:<20} value={:>14} net={:>10} squad={:>5.1} foreign={:>5.1}% age={:>4.1} clubs={}",
            labels::title_label(&s.competition_code),
            labels::format_bil(s.total_market_value),
            labels::format_mil(s.net_transfer_mil),
            s.squad_size,
            s.foreigners_percentage,
            s.average_age,
            s.clubs
        );
    }

    match aggregate::rank_extremes(&summaries) {
        Ok(facts) => {
            println!();
            println!(
                "highest value: {} ({} ahead)",
                labels::title_label(&facts.highest_value_league),
                labels::format_mil(facts.margin_over_second / 1_000_000.0)
            );
            println!(
                "youngest: {} ({:.1} yrs)",
                labels::title_label(&facts.youngest_league),
                facts.youngest_age
            );
            println!(
                "most localised: {} ({:.1}%)",
                labels::title_label(&facts.most_localized_league),
                facts.locality_pct
            );
            println!(
                "best net transfer: {} ({})",
                labels::title_label(&facts.best_net_league),
                labels::format_mil(facts.best_net_mil)
            );
            println!(
                "worst net transfer: {} ({})",
                labels::title_label(&facts.worst_net_league),
                labels::format_mil(facts.worst_net_mil)
            );
        }
        Err(err) => eprintln!("[WARN] extremes unavailable: {err}"),
    }

    let Some(league) = league else {
        return Ok(());
    };

    println!();
    println!("{}", labels::title_label(&league));
    let shares = aggregate::club_share_within_league(&records, &league)?;
    for share in &shares {
        println!(
            "  {:<28} {:>12} {:>6.1}%",
            labels::title_label(&share.club_code),
            labels::format_mil(share.total_market_value / 1_000_000.0),
            share.share_pct * 100.0
        );
    }

    let board = aggregate::top_transfers(&records, &league, 5)?;
    println!("  spenders:");
    for row in &board.spenders {
        println!(
            "    {:<26} {:>10}",
            labels::title_label(&row.club_code),
            labels::format_mil(row.net_transfer_mil)
        );
    }
    println!("  earners:");
    for row in &board.earners {
        println!(
            "    {:<26} {:>10}",
            labels::title_label(&row.club_code),
            labels::format_mil(row.net_transfer_mil)
        );
    }

    Ok(())
}
