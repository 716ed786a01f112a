use std::collections::VecDeque;
use std::time::Instant;

use chrono::{DateTime, Local};

use crate::config::ValueBetConfig;
use crate::engine::helpers::{Helper, HELPERS};
use crate::engine::value::{extract_value_bets, top_value_bets, ValueBet};
use crate::feed::types::{League, Match};
use crate::feed::FetchError;

const MAX_LOGS: usize = 200;

/// Selector value meaning "no league filter".
pub const ALL_LEAGUES: &str = "all";

/// What the match panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchView {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LeagueFilter {
    #[default]
    All,
    League(String),
}

impl LeagueFilter {
    /// Interpret a selector value: "all" or an exact league name.
    pub fn from_selector(value: &str) -> Self {
        if value == ALL_LEAGUES {
            LeagueFilter::All
        } else {
            LeagueFilter::League(value.to_string())
        }
    }

    pub fn as_selector(&self) -> &str {
        match self {
            LeagueFilter::All => ALL_LEAGUES,
            LeagueFilter::League(name) => name,
        }
    }

    pub fn accepts(&self, m: &Match) -> bool {
        match self {
            LeagueFilter::All => true,
            LeagueFilter::League(name) => m.league == *name,
        }
    }
}

/// Matches accepted by `filter`, in their original order.
pub fn filter_matches<'a>(matches: &'a [Match], filter: &LeagueFilter) -> Vec<&'a Match> {
    matches.iter().filter(|m| filter.accepts(m)).collect()
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

/// Everything the dashboard draws. Written only by the refresh controller.
#[derive(Debug, Clone)]
pub struct AppState {
    pub start_time: Instant,
    pub view: MatchView,
    /// Last successfully loaded match list.
    pub matches: Vec<Match>,
    /// Always derived from `matches`; replaced together with it.
    pub value_bets: Vec<ValueBet>,
    pub value_bet_limit: usize,
    pub last_updated: Option<DateTime<Local>>,
    pub filter: LeagueFilter,
    pub supported_leagues: Vec<League>,
    pub helpers: &'static [Helper],
    pub logs: VecDeque<LogEntry>,
    pub match_scroll_offset: usize,
}

impl AppState {
    pub fn new(value_bet_limit: usize) -> Self {
        Self {
            start_time: Instant::now(),
            view: MatchView::Loading,
            matches: Vec::new(),
            value_bets: Vec::new(),
            value_bet_limit,
            last_updated: None,
            filter: LeagueFilter::All,
            supported_leagues: Vec::new(),
            helpers: HELPERS,
            logs: VecDeque::with_capacity(MAX_LOGS),
            match_scroll_offset: 0,
        }
    }

    pub fn begin_loading(&mut self) {
        self.view = MatchView::Loading;
    }

    /// Replace the cache wholesale and rebuild value bets from it.
    pub fn apply_matches(&mut self, matches: Vec<Match>, config: &ValueBetConfig) {
        self.value_bets = extract_value_bets(&matches, config);
        self.matches = matches;
        self.last_updated = Some(Local::now());
        self.view = MatchView::Ready;
        self.match_scroll_offset = 0;
    }

    /// Show the error in place of the match list. The cache is left as it was.
    pub fn apply_failure(&mut self, err: &FetchError) {
        self.view = MatchView::Failed(err.user_message().to_string());
        self.push_log("ERROR", format!("Failed to load matches: {}", err));
    }

    pub fn filtered_matches(&self) -> Vec<&Match> {
        filter_matches(&self.matches, &self.filter)
    }

    pub fn visible_value_bets(&self) -> &[ValueBet] {
        top_value_bets(&self.value_bets, self.value_bet_limit)
    }

    /// Re-filter the cache. A failed refresh stops hiding the last good list
    /// once the user picks a league; a load in progress keeps its indicator.
    pub fn set_filter(&mut self, filter: LeagueFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.match_scroll_offset = 0;
        }
        if matches!(self.view, MatchView::Failed(_)) && self.last_updated.is_some() {
            self.view = MatchView::Ready;
        }
    }

    /// Header text for the active filter, with the league's full name when known.
    pub fn filter_label(&self) -> String {
        match &self.filter {
            LeagueFilter::All => ALL_LEAGUES.to_string(),
            LeagueFilter::League(id) => match self.supported_leagues.iter().find(|l| l.id == *id) {
                Some(league) => format!("{} - {}", id, league.display_name()),
                None => id.clone(),
            },
        }
    }

    /// Selector values: "all", then supported leagues, then any other league seen in data.
    pub fn league_options(&self) -> Vec<String> {
        let mut options = vec![ALL_LEAGUES.to_string()];
        let names = self
            .supported_leagues
            .iter()
            .map(|l| l.id.as_str())
            .chain(self.matches.iter().map(|m| m.league.as_str()));
        for name in names {
            if !options.iter().any(|o| o == name) {
                options.push(name.to_string());
            }
        }
        options
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        let options = self.league_options();
        let current = options
            .iter()
            .position(|o| o == self.filter.as_selector())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        self.set_filter(LeagueFilter::from_selector(&options[next]));
    }

    pub fn scroll_matches(&mut self, delta: isize) {
        let max = self.filtered_matches().len().saturating_sub(1);
        let offset = self.match_scroll_offset.saturating_add_signed(delta);
        self.match_scroll_offset = offset.min(max);
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = Local::now().format("%H:%M:%S%.3f").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    pub fn last_updated_label(&self) -> Option<String> {
        self.last_updated
            .map(|t| format!("Last updated: {}", t.format("%H:%M:%S")))
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}
