use std::collections::{HashMap, VecDeque};

use crate::aggregate::{ExtremeFacts, LeagueSummary};
use crate::dataset::ClubRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    ClubDetails,
}

/// All UI state. The record set and summaries are loaded once at startup;
/// the per-league views are recomputed from them on every draw.
pub struct AppState {
    pub screen: Screen,
    pub records: Vec<ClubRecord>,
    pub summaries: Vec<LeagueSummary>,
    pub extremes: Option<ExtremeFacts>,
    pub logos: HashMap<String, String>,
    pub selected_league: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(
        records: Vec<ClubRecord>,
        summaries: Vec<LeagueSummary>,
        extremes: Option<ExtremeFacts>,
        logos: HashMap<String, String>,
    ) -> Self {
        Self {
            screen: Screen::Main,
            records,
            summaries,
            extremes,
            logos,
            selected_league: 0,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    /// League the selector currently points at (summaries are already in
    /// market-value order, so index 0 is the richest league).
    pub fn selected_league_code(&self) -> Option<&str> {
        self.summaries
            .get(self.selected_league)
            .map(|s| s.competition_code.as_str())
    }

    pub fn selected_logo_url(&self) -> Option<&str> {
        let code = self.selected_league_code()?;
        self.logos.get(code).map(|s| s.as_str())
    }

    pub fn select_next_league(&mut self) {
        if self.summaries.is_empty() {
            return;
        }
        self.selected_league = (self.selected_league + 1) % self.summaries.len();
    }

    pub fn select_prev_league(&mut self) {
        if self.summaries.is_empty() {
            return;
        }
        if self.selected_league == 0 {
            self.selected_league = self.summaries.len() - 1;
        } else {
            self.selected_league -= 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
