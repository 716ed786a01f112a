//! Stand-in display heuristics derived from the 1X2 prediction.
//!
//! These are not models. They are reproduced exactly, strict inequalities included.

use crate::feed::types::Prediction;

const BTTS_THRESHOLD: f64 = 0.6;
const GOALS_MULTIPLIER: f64 = 1.5;
const GOALS_LINE: f64 = 1.5;
const STRONG_HOME_PROB: f64 = 0.5;
const HIGH_CONFIDENCE: f64 = 0.7;
const BOTH_SIDES_SUM: f64 = 1.2;

/// "Yes" iff the mean of home and away win probability is above 0.6.
pub fn btts_prediction(p: &Prediction) -> &'static str {
    let attacking_strength = (p.home_win_prob + p.away_win_prob) / 2.0;
    if attacking_strength > BTTS_THRESHOLD {
        "Yes"
    } else {
        "No"
    }
}

pub fn over_under_prediction(p: &Prediction) -> &'static str {
    let goal_expectancy = (p.home_win_prob + p.away_win_prob) * GOALS_MULTIPLIER;
    if goal_expectancy > GOALS_LINE {
        "+2.5"
    } else {
        "-2.5"
    }
}

pub fn key_factors(p: &Prediction) -> String {
    let mut factors = Vec::with_capacity(3);

    if p.home_win_prob > STRONG_HOME_PROB {
        factors.push("Strong home advantage");
    }

    if p.confidence > HIGH_CONFIDENCE {
        factors.push("High prediction confidence");
    } else {
        factors.push("Uncertain match outcome");
    }

    if p.home_win_prob + p.away_win_prob > BOTH_SIDES_SUM {
        factors.push("Expected goals from both sides");
    }

    factors.join(", ")
}

/// Confidence as a rounded whole percentage.
pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

/// Filled cells of a `width`-wide confidence bar, linear in confidence and clamped.
pub fn confidence_fill(confidence: f64, width: u16) -> u16 {
    if !confidence.is_finite() {
        return 0;
    }
    (confidence.clamp(0.0, 1.0) * width as f64).round() as u16
}
