//! Value bet detection: model probability against the reference bookmaker's price.

use super::outcome::Outcome;
use crate::config::ValueBetConfig;
use crate::feed::types::Match;

/// A priced outcome whose model probability beats the market by more than the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueBet {
    pub outcome: Outcome,
    pub match_label: String,
    pub bookmaker: String,
    pub odds: f64,
    pub implied_probability: f64,
    /// Edge: model probability minus implied probability.
    pub value: f64,
    pub probability: f64,
}

/// Probability encoded by decimal odds. `None` for prices that cannot be inverted.
pub fn implied_probability(decimal_odds: f64) -> Option<f64> {
    if decimal_odds.is_finite() && decimal_odds > 0.0 {
        Some(1.0 / decimal_odds)
    } else {
        None
    }
}

/// Scan matches in order and emit at most one bet per (match, outcome).
///
/// Only the configured reference bookmaker is consulted; a match that lacks
/// it contributes nothing. Outcomes are checked in the configured order.
pub fn extract_value_bets(matches: &[Match], config: &ValueBetConfig) -> Vec<ValueBet> {
    let mut bets = Vec::new();

    for m in matches {
        let Some(odds) = m.odds_comparison.get(&config.reference_bookmaker) else {
            tracing::debug!(
                match_label = %m.label(),
                bookmaker = %config.reference_bookmaker,
                "reference bookmaker missing, skipping match"
            );
            continue;
        };

        for &outcome in &config.outcomes {
            let Some(probability) = m.prediction.probability(outcome) else {
                continue;
            };
            let price = odds.price(outcome);
            let Some(implied) = implied_probability(price) else {
                tracing::debug!(match_label = %m.label(), outcome = outcome.key(), price, "unusable odds");
                continue;
            };

            let value = probability - implied;
            if value > config.threshold {
                bets.push(ValueBet {
                    outcome,
                    match_label: m.label(),
                    bookmaker: config.reference_bookmaker.clone(),
                    odds: price,
                    implied_probability: implied,
                    value,
                    probability,
                });
            }
        }
    }

    bets
}

/// First `limit` bets in match order. No re-ranking by edge.
pub fn top_value_bets(bets: &[ValueBet], limit: usize) -> &[ValueBet] {
    &bets[..bets.len().min(limit)]
}
