use std::borrow::Cow;

use super::state::{AppState, MatchView};
use crate::engine::helpers::{helper_icon, HelperStatus};
use crate::engine::heuristics::{
    btts_prediction, confidence_fill, confidence_percent, key_factors, over_under_prediction,
};
use crate::engine::outcome::format_result;
use crate::engine::value::ValueBet;
use crate::feed::types::Match;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const CONFIDENCE_BAR_WIDTH: u16 = 20;
const FACTOR_TAGS: &[&str] = &["Form", "Injuries", "Home Advantage"];

pub const LOADING_MESSAGE: &str = "Loading today's matches...";
pub const NO_MATCHES_MESSAGE: &str = "No matches found for today";
pub const NO_VALUE_BETS_MESSAGE: &str = "No strong value bets identified today";

pub fn draw(f: &mut Frame, state: &AppState, spinner_frame: u8) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, state, chunks[0], spinner_frame);
    draw_footer(f, chunks[2]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);

    draw_matches(f, state, body[0]);

    // Two lines per value bet, plus borders
    let bets_height = (state.value_bet_limit.clamp(1, 6) * 2 + 2) as u16;
    let helpers_height = state.helpers.len() as u16 + 2;
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(bets_height),
            Constraint::Length(helpers_height),
            Constraint::Min(3),
        ])
        .split(body[1]);

    draw_value_bets(f, state, side[0]);
    draw_helpers(f, state, side[1]);
    draw_logs(f, state, side[2]);
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let activity = match &state.view {
        MatchView::Loading => {
            let ch = SPINNER_FRAMES[(spinner_frame as usize) % SPINNER_FRAMES.len()];
            Span::styled(format!(" {} LOADING", ch), Style::default().fg(Color::Cyan))
        }
        MatchView::Ready => Span::styled(" OK", Style::default().fg(Color::Green)),
        MatchView::Failed(_) => Span::styled(
            " ERROR",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let updated = state
        .last_updated_label()
        .unwrap_or_else(|| "Not updated yet".to_string());
    let shown = state.filtered_matches().len();

    let line = Line::from(vec![
        Span::raw(format!(
            " {} | League: {} | Matches: {}/{} | Up: {} |",
            updated,
            state.filter_label(),
            shown,
            state.matches.len(),
            state.uptime(),
        )),
        activity,
    ]);

    let block = Block::default()
        .title(Span::styled(
            " OracleNet Predictions ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_matches(f: &mut Frame, state: &AppState, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let block = Block::default()
        .title(format!(" Today's Matches [{}] ", state.filter.as_selector()))
        .borders(Borders::ALL);

    let notice = |text: String, color: Color| {
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
    };

    let para = match &state.view {
        MatchView::Loading => notice(LOADING_MESSAGE.to_string(), Color::Cyan),
        MatchView::Failed(message) => notice(message.clone(), Color::Red),
        MatchView::Ready => {
            let matches = state.filtered_matches();
            if matches.is_empty() {
                notice(NO_MATCHES_MESSAGE.to_string(), Color::Yellow)
            } else {
                let mut lines = Vec::new();
                for m in matches.iter().skip(state.match_scroll_offset) {
                    lines.extend(match_card_lines(m, inner_width));
                    lines.push(Line::from(Span::styled(
                        "\u{2500}".repeat(inner_width),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                Paragraph::new(lines)
            }
        }
    };

    f.render_widget(para.block(block), area);
}

/// One match card: header, teams, prediction, confidence, factors, odds.
pub fn match_card_lines(m: &Match, width: usize) -> Vec<Line<'static>> {
    let p = &m.prediction;
    let dim = Style::default().fg(Color::DarkGray);

    let league = format!(" {} \u{2022} {}", m.league, m.country);
    let kickoff = format!("Today, {} ", m.time);
    let pad = width.saturating_sub(league.chars().count() + kickoff.chars().count());

    let fill = confidence_fill(p.confidence, CONFIDENCE_BAR_WIDTH);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(league, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" ".repeat(pad)),
            Span::styled(kickoff, dim),
        ]),
        Line::from(vec![
            Span::styled(format!("   {}", m.home_team), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("  VS  ", dim),
            Span::styled(m.away_team.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled(" AI PREDICTION  ", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "Result: {} | BTTS: {} | Goals: {}",
                format_result(&p.predicted_result),
                btts_prediction(p),
                over_under_prediction(p),
            )),
        ]),
        Line::from(vec![
            Span::raw(format!(" Confidence: {}% ", confidence_percent(p.confidence))),
            Span::styled("\u{2588}".repeat(fill as usize), Style::default().fg(Color::Green)),
            Span::styled(
                "\u{2591}".repeat(CONFIDENCE_BAR_WIDTH.saturating_sub(fill) as usize),
                dim,
            ),
        ]),
        Line::from(truncate_with_ellipsis(
            &format!(" Key Factors: {}", key_factors(p)),
            width,
        ).into_owned()),
        Line::from(Span::styled(
            format!(
                " {}",
                FACTOR_TAGS.iter().map(|t| format!("[{}]", t)).collect::<Vec<_>>().join(" ")
            ),
            dim,
        )),
        Line::from(Span::styled(
            format!(" {:<15}{:>7}{:>7}{:>7}", "Best Odds:", "1", "X", "2"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    for (name, odds) in m.odds_comparison.iter() {
        lines.push(Line::from(format!(
            " {:<15}{:>7}{:>7}{:>7}",
            bookmaker_label(name),
            odds.home_win,
            odds.draw,
            odds.away_win,
        )));
    }

    let goal_markets: Vec<_> = m
        .odds_comparison
        .iter()
        .filter(|(_, odds)| odds.has_goal_markets())
        .collect();
    if !goal_markets.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {:<15}{:>7}{:>7}{:>7}{:>7}", "Goal Markets:", "GG", "NG", "O2.5", "U2.5"),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (name, odds) in goal_markets {
            lines.push(Line::from(format!(
                " {:<15}{:>7}{:>7}{:>7}{:>7}",
                bookmaker_label(name),
                price_cell(odds.btts_yes),
                price_cell(odds.btts_no),
                price_cell(odds.over_2_5),
                price_cell(odds.under_2_5),
            )));
        }
    }

    lines
}

fn price_cell(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| p.to_string())
}

/// "hollywoodbets" -> "Hollywoodbets".
pub fn bookmaker_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn value_bet_title(bet: &ValueBet) -> String {
    format!("{} - {}", bet.match_label, bet.outcome.label())
}

/// Price and bookmaker, then edge and the implied probability it beat.
pub fn value_bet_detail(bet: &ValueBet) -> String {
    format!(
        "{:.2} {}  Value: {:.1}%  Implied: {:.1}%",
        bet.odds,
        bookmaker_label(&bet.bookmaker),
        bet.value * 100.0,
        bet.implied_probability * 100.0
    )
}

fn draw_value_bets(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize;
    let bets = state.visible_value_bets();

    let lines: Vec<Line> = if bets.is_empty() {
        vec![Line::from(Span::styled(
            NO_VALUE_BETS_MESSAGE,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        bets.iter()
            .flat_map(|bet| {
                [
                    Line::from(truncate_with_ellipsis(&value_bet_title(bet), max_width).into_owned()),
                    Line::from(Span::styled(
                        format!("  {}", value_bet_detail(bet)),
                        Style::default().fg(Color::Green),
                    )),
                ]
            })
            .collect()
    };

    let title = if state.value_bets.len() > bets.len() {
        format!(" Value Bets [{}/{}] ", bets.len(), state.value_bets.len())
    } else {
        " Value Bets ".to_string()
    };

    let block = Block::default().title(title).borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn icon_glyph(icon: &str) -> char {
    match icon {
        "database" => '\u{2261}',
        "chart-line" => '\u{223f}',
        "bolt" => '\u{03df}',
        "cloud-sun-rain" => '\u{2601}',
        "user-injured" => '\u{271a}',
        "people-arrows" => '\u{21c4}',
        "balance-scale" => '\u{2696}',
        _ => '\u{2699}',
    }
}

fn draw_helpers(f: &mut Frame, state: &AppState, area: Rect) {
    let lines: Vec<Line> = state
        .helpers
        .iter()
        .map(|h| {
            let (dot, color) = match h.status {
                HelperStatus::Working => ('\u{25cf}', Color::Green),
                HelperStatus::Idle => ('\u{25cb}', Color::DarkGray),
            };
            Line::from(vec![
                Span::raw(format!(" {} {:<22}", icon_glyph(helper_icon(h.name)), h.name)),
                Span::styled(format!("{} {}", dot, h.status.as_str()), Style::default().fg(color)),
            ])
        })
        .collect();

    let block = Block::default().title(" Helpers ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_logs(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize;
    let visible_lines = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible_lines)
        .map(|l| {
            let color = match l.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                "BET" => Color::Cyan,
                _ => Color::DarkGray,
            };
            let prefix = format!(" {} [{}] ", l.time, l.level);
            let msg_max = max_width.saturating_sub(prefix.chars().count());
            let msg = truncate_with_ellipsis(&l.message, msg_max);
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ])
        })
        .collect();

    let block = Block::default().title(" Log ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let line = Line::from(vec![
        Span::styled("  [q]", key),
        Span::raw("uit  "),
        Span::styled("[r]", key),
        Span::raw("efresh  "),
        Span::styled("[f/F]", key),
        Span::raw(" league  "),
        Span::styled("[a]", key),
        Span::raw("ll leagues  "),
        Span::styled("[b]", key),
        Span::raw("et slip  "),
        Span::styled("[j/k]", key),
        Span::raw(" scroll  "),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}
