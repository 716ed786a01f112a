use serde::Deserialize;

/// 1X2 match outcome, keyed the way the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::HomeWin, Outcome::Draw, Outcome::AwayWin];

    pub fn key(self) -> &'static str {
        match self {
            Outcome::HomeWin => "home_win",
            Outcome::Draw => "draw",
            Outcome::AwayWin => "away_win",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::HomeWin => "Home Win",
            Outcome::Draw => "Draw",
            Outcome::AwayWin => "Away Win",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Outcome::ALL.into_iter().find(|o| o.key() == key)
    }
}

/// Display label for a predicted result; unknown values pass through untouched.
pub fn format_result(result: &str) -> &str {
    match Outcome::from_key(result) {
        Some(outcome) => outcome.label(),
        None => result,
    }
}
