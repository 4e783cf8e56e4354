use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use t5_terminal::aggregate;
use t5_terminal::config::Config;
use t5_terminal::state::{AppState, Screen};
use t5_terminal::{dataset, export, labels};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Main,
            KeyCode::Char('2') => self.state.screen = Screen::ClubDetails,
            KeyCode::Tab => {
                self.state.screen = match self.state.screen {
                    Screen::Main => Screen::ClubDetails,
                    Screen::ClubDetails => Screen::Main,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_league(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev_league(),
            KeyCode::Char('e') => self.export_workbook(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn export_workbook(&mut self) {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = std::path::PathBuf::from(format!("t5_export_{stamp}.xlsx"));
        let league = self.state.selected_league_code().map(|s| s.to_string());
        match export::export_dashboard(
            &path,
            &self.state.summaries,
            &self.state.records,
            league.as_deref(),
        ) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} leagues, {} shares, {} transfers -> {}",
                report.leagues,
                report.share_rows,
                report.transfer_rows,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err}")),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::from_env();
    // Load and aggregate before touching the terminal so a bad data path
    // fails with a plain error message instead of a mangled screen.
    let records = dataset::cached_clubs(&config)?.to_vec();
    let summaries = aggregate::summarize(&records)?;
    let extremes = aggregate::rank_extremes(&summaries).ok();
    let logos = dataset::load_logos(&config.logos_path).unwrap_or_default();

    let mut app = App {
        state: AppState::new(records, summaries, extremes, logos),
        should_quit: false,
    };
    app.state.push_log(format!(
        "[INFO] Loaded {} clubs across {} leagues (season >= {})",
        app.state.records.len(),
        app.state.summaries.len(),
        config.season_min
    ));
    if app.state.logos.is_empty() {
        app.state.push_log("[WARN] No league logos loaded");
    }
    if app.state.extremes.is_none() {
        app.state
            .push_log("[WARN] Fewer than two leagues; extremes unavailable");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Main => render_main(frame, chunks[1], &app.state),
        Screen::ClubDetails => render_club_details(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let tab = match state.screen {
        Screen::Main => "MAIN",
        Screen::ClubDetails => "CLUB DETAILS",
    };
    let league = state
        .selected_league_code()
        .map(labels::title_label)
        .unwrap_or_else(|| "n/a".to_string());
    let line1 = format!("  __  T5 TERMINAL | {tab} | League: {league}");
    let line2 = " (__)  Top 5 league club stats".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Main => {
            "1 Main | 2/Tab Club Details | j/k/↑/↓ League | e Export | ? Help | q Quit".to_string()
        }
        Screen::ClubDetails => {
            "1/Tab Main | j/k/↑/↓ League | e Export | ? Help | q Quit".to_string()
        }
    }
}

fn render_main(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(5),
        ])
        .split(area);

    render_headline_metrics(frame, sections[0], state);
    render_transfer_metrics(frame, sections[1], state);
    render_league_chart(frame, sections[2], state);
    render_console(frame, sections[3], state);
}

fn render_headline_metrics(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(2, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(2, 5),
        ])
        .split(area);

    let (value, delta) = match &state.extremes {
        Some(facts) => (
            labels::title_label(&facts.highest_value_league),
            format!(
                "{} ahead",
                labels::format_mil(facts.margin_over_second / 1_000_000.0)
            ),
        ),
        None => ("n/a".to_string(), String::new()),
    };
    render_metric_card(frame, cols[0], "Highest Market Value League", &value, &delta);

    let (value, delta) = match &state.extremes {
        Some(facts) => (
            labels::title_label(&facts.youngest_league),
            format!("{:.1} yrs", facts.youngest_age),
        ),
        None => ("n/a".to_string(), String::new()),
    };
    render_metric_card(frame, cols[1], "Youngest League", &value, &delta);

    let (value, delta) = match &state.extremes {
        Some(facts) => (
            labels::title_label(&facts.most_localized_league),
            format!("{:.1}%", facts.locality_pct),
        ),
        None => ("n/a".to_string(), String::new()),
    };
    render_metric_card(frame, cols[2], "Most Localised League", &value, &delta);
}

fn render_transfer_metrics(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (value, delta) = match &state.extremes {
        Some(facts) => (
            labels::title_label(&facts.best_net_league),
            labels::format_mil(facts.best_net_mil),
        ),
        None => ("n/a".to_string(), String::new()),
    };
    render_metric_card(frame, cols[0], "Best Net Transfer", &value, &delta);

    let (value, delta) = match &state.extremes {
        Some(facts) => (
            labels::title_label(&facts.worst_net_league),
            labels::format_mil(facts.worst_net_mil),
        ),
        None => ("n/a".to_string(), String::new()),
    };
    render_metric_card(frame, cols[1], "Worst Net Transfer", &value, &delta);
}

fn render_metric_card(frame: &mut Frame, area: Rect, title: &str, value: &str, delta: &str) {
    let text = format!("{value}\n{delta}");
    let card = Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(card, area);
}

fn render_league_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("League Market Value (bars) / Foreign Player % (labels)")
        .borders(Borders::ALL);

    if state.summaries.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let empty = Paragraph::new("No leagues loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let bars: Vec<Bar> = state
        .summaries
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            let style = if idx == state.selected_league {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Cyan)
            };
            Bar::default()
                .value((s.total_market_value / 1_000_000.0).max(0.0) as u64)
                .text_value(labels::format_bil(s.total_market_value))
                .label(Line::from(format!(
                    "{} ({:.0}% for.)",
                    labels::title_label(&s.competition_code),
                    s.foreigners_percentage
                )))
                .style(style)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(16)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_club_details(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(9),
            Constraint::Length(5),
        ])
        .split(area);

    let info = match state.selected_league_code() {
        Some(code) => {
            let logo = state.selected_logo_url().unwrap_or("n/a");
            format!("League: {} | Crest: {logo}", labels::title_label(code))
        }
        None => "No league selected".to_string(),
    };
    frame.render_widget(Paragraph::new(info), sections[0]);

    render_share_list(frame, sections[1], state);
    render_transfer_board(frame, sections[2], state);
    render_console(frame, sections[3], state);
}

fn render_share_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Market Value Distribution")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(league) = state.selected_league_code() else {
        frame.render_widget(Paragraph::new("No league selected"), inner);
        return;
    };

    let text = match aggregate::club_share_within_league(&state.records, league) {
        Ok(shares) => shares
            .iter()
            .take(inner.height as usize)
            .map(|share| {
                format!(
                    "{:<28} {:>12} {:>6.1}%",
                    labels::title_label(&share.club_code),
                    labels::format_mil(share.total_market_value / 1_000_000.0),
                    share.share_pct * 100.0
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Err(err) => format!("{err}"),
    };
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_transfer_board(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Top 5 Spenders vs Top 5 Earners (Net Transfer)")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(league) = state.selected_league_code() else {
        frame.render_widget(Paragraph::new("No league selected"), inner);
        return;
    };

    let board = match aggregate::top_transfers(&state.records, league, 5) {
        Ok(board) => board,
        Err(err) => {
            frame.render_widget(Paragraph::new(format!("{err}")), inner);
            return;
        }
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let spenders = std::iter::once("Spenders:".to_string())
        .chain(board.spenders.iter().map(|row| {
            format!(
                "{:<24} {:>10}",
                labels::title_label(&row.club_code),
                labels::format_mil(row.net_transfer_mil)
            )
        }))
        .collect::<Vec<_>>()
        .join("\n");
    let earners = std::iter::once("Earners:".to_string())
        .chain(board.earners.iter().map(|row| {
            format!(
                "{:<24} {:>10}",
                labels::title_label(&row.club_code),
                labels::format_mil(row.net_transfer_mil)
            )
        }))
        .collect::<Vec<_>>()
        .join("\n");

    frame.render_widget(
        Paragraph::new(spenders).style(Style::default().fg(Color::Red)),
        cols[0],
    );
    frame.render_widget(
        Paragraph::new(earners).style(Style::default().fg(Color::Green)),
        cols[1],
    );
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Console").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = if state.logs.is_empty() {
        "No messages yet".to_string()
    } else {
        let take = inner.height.max(1) as usize;
        state
            .logs
            .iter()
            .rev()
            .take(take)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n")
    };
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "T5 Terminal - Help",
        "",
        "Global:",
        "  1            Main",
        "  2 / Tab      Club Details",
        "  j/k or ↑/↓   Select league",
        "  e            Export xlsx",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
