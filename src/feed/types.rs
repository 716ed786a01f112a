use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

use crate::engine::outcome::Outcome;

/// OracleNet response envelope: `{ "status": "success", "data": ... }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One fixture from `/api/today-matches`, with its model prediction and odds attached.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Match {
    pub league: String,
    pub country: String,
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    pub prediction: Prediction,
    pub odds_comparison: OddsComparison,
}

impl Match {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    /// Kept raw so unrecognised results still display verbatim.
    pub predicted_result: String,
    pub home_win_prob: f64,
    #[serde(default)]
    pub draw_prob: Option<f64>,
    pub away_win_prob: f64,
    pub confidence: f64,
}

impl Prediction {
    /// Model probability for an outcome. Draw is only known when the backend sent it.
    pub fn probability(&self, outcome: Outcome) -> Option<f64> {
        match outcome {
            Outcome::HomeWin => Some(self.home_win_prob),
            Outcome::Draw => self.draw_prob,
            Outcome::AwayWin => Some(self.away_win_prob),
        }
    }
}

/// Decimal odds quoted by a single bookmaker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookmakerOdds {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    #[serde(default)]
    pub btts_yes: Option<f64>,
    #[serde(default)]
    pub btts_no: Option<f64>,
    #[serde(default, rename = "over_2.5")]
    pub over_2_5: Option<f64>,
    #[serde(default, rename = "under_2.5")]
    pub under_2_5: Option<f64>,
}

impl BookmakerOdds {
    pub fn new(home_win: f64, draw: f64, away_win: f64) -> Self {
        Self {
            home_win,
            draw,
            away_win,
            btts_yes: None,
            btts_no: None,
            over_2_5: None,
            under_2_5: None,
        }
    }

    pub fn price(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home_win,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away_win,
        }
    }

    /// True when the bookmaker quoted at least one BTTS or 2.5 goals price.
    pub fn has_goal_markets(&self) -> bool {
        [self.btts_yes, self.btts_no, self.over_2_5, self.under_2_5]
            .iter()
            .any(Option::is_some)
    }
}

/// Bookmaker name -> odds, in the order the backend listed them.
///
/// The backend mixes a `"match": "A vs B"` label into this object, so
/// non-object entries are skipped. A bookmaker object that is missing a
/// price still fails the whole decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OddsComparison {
    bookmakers: Vec<(String, BookmakerOdds)>,
}

impl OddsComparison {
    pub fn get(&self, bookmaker: &str) -> Option<&BookmakerOdds> {
        self.bookmakers
            .iter()
            .find(|(name, _)| name == bookmaker)
            .map(|(_, odds)| odds)
    }

    pub fn insert(&mut self, bookmaker: impl Into<String>, odds: BookmakerOdds) {
        let bookmaker = bookmaker.into();
        match self.bookmakers.iter_mut().find(|(name, _)| *name == bookmaker) {
            Some((_, existing)) => *existing = odds,
            None => self.bookmakers.push((bookmaker, odds)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BookmakerOdds)> {
        self.bookmakers.iter().map(|(name, odds)| (name.as_str(), odds))
    }
}

impl<'de> Deserialize<'de> for OddsComparison {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OddsVisitor;

        impl<'de> Visitor<'de> for OddsVisitor {
            type Value = OddsComparison;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of bookmaker odds")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut comparison = OddsComparison::default();
                while let Some((name, value)) = map.next_entry::<String, serde_json::Value>()? {
                    if !value.is_object() {
                        continue;
                    }
                    let odds = BookmakerOdds::deserialize(value)
                        .map_err(|e| de::Error::custom(format!("bookmaker {}: {}", name, e)))?;
                    comparison.insert(name, odds);
                }
                Ok(comparison)
            }
        }

        deserializer.deserialize_map(OddsVisitor)
    }
}

/// Entry from `/api/leagues`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub country: String,
}

impl League {
    /// "Premier Soccer League (South Africa)".
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.country)
    }
}
