pub mod helpers;
pub mod heuristics;
pub mod outcome;
pub mod value;

pub use outcome::{format_result, Outcome};
pub use value::{extract_value_bets, top_value_bets, ValueBet};
