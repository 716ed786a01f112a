// End-to-end flow: scripted feed -> refresh controller -> shared state -> rendered screen

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use oraclenet::config::Config;
    use oraclenet::feed::types::{League, Match};
    use oraclenet::feed::{parse_envelope, FetchError, MatchFeed};
    use oraclenet::refresh::RefreshController;
    use oraclenet::tui::render::{self, LOADING_MESSAGE, NO_MATCHES_MESSAGE, NO_VALUE_BETS_MESSAGE};
    use oraclenet::tui::state::{AppState, LeagueFilter, MatchView};
    use oraclenet::tui::TuiCommand;
    use ratatui::{backend::TestBackend, Terminal};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::{mpsc, watch};
    use tokio::task::JoinHandle;

    struct ScriptedFeed {
        responses: VecDeque<Result<Vec<Match>, FetchError>>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MatchFeed for ScriptedFeed {
        async fn fetch_matches(&mut self) -> Result<Vec<Match>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_leagues(&mut self) -> Result<Vec<League>, FetchError> {
            parse_envelope(r#"{"status": "success", "data": [
                {"id": "PSL", "name": "Premier Soccer League", "country": "South Africa"}]}"#)
        }
    }

    struct Harness {
        state_rx: watch::Receiver<AppState>,
        cmd_tx: mpsc::Sender<TuiCommand>,
        calls: Arc<AtomicUsize>,
        handle: JoinHandle<()>,
    }

    impl Harness {
        fn start(responses: Vec<Result<Vec<Match>, FetchError>>) -> Self {
            let calls = Arc::new(AtomicUsize::new(0));
            let feed = ScriptedFeed {
                responses: responses.into(),
                calls: calls.clone(),
            };
            let config = Config::default();
            let (state_tx, state_rx) = watch::channel(AppState::new(config.value_bets.display_limit));
            let (cmd_tx, cmd_rx) = mpsc::channel(8);
            let handle = tokio::spawn(RefreshController::new(feed, &config).run(state_tx, cmd_rx));
            Self { state_rx, cmd_tx, calls, handle }
        }

        async fn wait_for(&mut self, pred: impl FnMut(&AppState) -> bool) -> AppState {
            self.state_rx.wait_for(pred).await.unwrap().clone()
        }

        async fn stop(self) {
            self.cmd_tx.send(TuiCommand::Quit).await.unwrap();
            self.handle.await.unwrap();
        }
    }

    fn matches_body(entries: &[(&str, &str, f64, f64)]) -> Vec<Match> {
        let data: Vec<String> = entries
            .iter()
            .map(|(league, home, home_prob, home_odds)| {
                format!(
                    r#"{{"league": "{league}", "country": "South Africa", "time": "15:00",
                        "home_team": "{home}", "away_team": "Kaizer Chiefs",
                        "prediction": {{"predicted_result": "home_win", "home_win_prob": {home_prob},
                                        "away_win_prob": 0.2, "confidence": 0.8}},
                        "odds_comparison": {{
                            "hollywoodbets": {{"home_win": {home_odds}, "draw": 3.2, "away_win": 3.5}},
                            "betway": {{"home_win": 1.85, "draw": 3.1, "away_win": 3.6}},
                            "match": "{home} vs Kaizer Chiefs"}}}}"#
                )
            })
            .collect();
        parse_envelope(&format!(r#"{{"status": "success", "data": [{}]}}"#, data.join(",")))
            .unwrap()
    }

    fn render_to_string(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 60)).unwrap();
        terminal.draw(|f| render::draw(f, state, 0)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn is_ready(s: &AppState) -> bool {
        s.view == MatchView::Ready
    }

    /// Ready and back in the idle loop: leagues are the last step of a first load.
    fn is_settled(s: &AppState) -> bool {
        is_ready(s) && !s.supported_leagues.is_empty()
    }

    #[tokio::test]
    async fn test_single_match_without_value_bet() {
        let mut h = Harness::start(vec![Ok(matches_body(&[("PSL", "Mamelodi Sundowns", 0.5, 1.8)]))]);
        let state = h.wait_for(is_ready).await;
        h.stop().await;

        // 1/1.8 = 0.5556 against a model 0.5: negative edge
        assert_eq!(state.matches.len(), 1);
        assert!(state.value_bets.is_empty());

        let screen = render_to_string(&state);
        assert!(screen.contains("Mamelodi Sundowns  VS  Kaizer Chiefs"));
        assert!(screen.contains("Result: Home Win | BTTS: No | Goals: -2.5"));
        assert!(screen.contains("Confidence: 80%"));
        assert!(screen.contains("Key Factors: High prediction confidence"));
        assert!(screen.contains(" Hollywoodbets      1.8    3.2    3.5"));
        assert!(screen.contains(NO_VALUE_BETS_MESSAGE));
        assert!(screen.contains("Last updated: "));
    }

    #[test]
    fn test_loading_view_before_first_response() {
        let screen = render_to_string(&AppState::new(4));
        assert!(screen.contains(LOADING_MESSAGE));
        assert!(screen.contains("LOADING"));
        assert!(screen.contains("Not updated yet"));
        assert!(!screen.contains(NO_MATCHES_MESSAGE));
    }

    #[tokio::test]
    async fn test_refresh_shows_loading_over_cached_cards() {
        let mut h = Harness::start(vec![Ok(matches_body(&[("PSL", "Mamelodi Sundowns", 0.5, 1.8)]))]);
        let mut state = h.wait_for(is_ready).await;
        h.stop().await;

        state.begin_loading();
        let screen = render_to_string(&state);
        assert!(screen.contains(LOADING_MESSAGE));
        assert!(!screen.contains("Mamelodi Sundowns  VS"));
        assert!(screen.contains("Last updated: "));
    }

    #[tokio::test]
    async fn test_filter_after_failure_redraws_cache() {
        let application_error = parse_envelope::<Vec<Match>>(r#"{"status": "error"}"#).unwrap_err();
        let mut h = Harness::start(vec![
            Ok(matches_body(&[("PSL", "Orlando Pirates", 0.4, 2.0)])),
            Err(application_error),
        ]);
        h.wait_for(is_settled).await;
        h.cmd_tx.send(TuiCommand::Refresh).await.unwrap();
        h.wait_for(|s| matches!(s.view, MatchView::Failed(_))).await;

        h.cmd_tx
            .send(TuiCommand::SetFilter(LeagueFilter::from_selector("PSL")))
            .await
            .unwrap();
        let state = h.wait_for(is_ready).await;
        h.stop().await;

        let screen = render_to_string(&state);
        assert!(screen.contains("Orlando Pirates  VS"));
        assert!(screen.contains("League: PSL - Premier Soccer League (South Africa)"));
        assert!(!screen.contains("Failed to load matches data"));
    }

    #[tokio::test]
    async fn test_empty_feed_shows_empty_states_not_error() {
        let mut h = Harness::start(vec![Ok(Vec::new())]);
        let state = h.wait_for(is_ready).await;
        h.stop().await;

        let screen = render_to_string(&state);
        assert!(screen.contains(NO_MATCHES_MESSAGE));
        assert!(screen.contains(NO_VALUE_BETS_MESSAGE));
        assert!(!screen.contains("Failed to load"));
        assert!(!screen.contains("ERROR"));
    }

    #[tokio::test]
    async fn test_error_status_replaces_view_but_keeps_cache() {
        let application_error = parse_envelope::<Vec<Match>>(r#"{"status": "error"}"#).unwrap_err();
        let mut h = Harness::start(vec![
            Ok(matches_body(&[("PSL", "Mamelodi Sundowns", 0.9, 1.8)])),
            Err(application_error),
        ]);
        let first = h.wait_for(is_settled).await;
        assert_eq!(first.value_bets.len(), 1);

        h.cmd_tx.send(TuiCommand::Refresh).await.unwrap();
        let state = h.wait_for(|s| matches!(s.view, MatchView::Failed(_))).await;
        h.stop().await;

        assert_eq!(state.matches, first.matches);
        assert_eq!(state.value_bets, first.value_bets);

        let screen = render_to_string(&state);
        assert!(screen.contains("Failed to load matches data"));
        assert!(!screen.contains("Mamelodi Sundowns  VS"));
    }

    #[tokio::test]
    async fn test_transport_failure_message() {
        let decode_error = parse_envelope::<Vec<Match>>("<html>bad gateway</html>").unwrap_err();
        let mut h = Harness::start(vec![Err(decode_error)]);
        let state = h.wait_for(|s| matches!(s.view, MatchView::Failed(_))).await;
        h.stop().await;

        assert!(render_to_string(&state).contains("Failed to load matches. Please try again later."));
    }

    #[tokio::test]
    async fn test_filter_uses_cache_without_refetch() {
        let mut h = Harness::start(vec![Ok(matches_body(&[
            ("PSL", "Orlando Pirates", 0.4, 2.0),
            ("EPL", "Arsenal", 0.4, 2.0),
            ("PSL", "Cape Town City", 0.4, 2.0),
        ]))]);
        h.wait_for(is_ready).await;

        h.cmd_tx
            .send(TuiCommand::SetFilter(LeagueFilter::from_selector("EPL")))
            .await
            .unwrap();
        let state = h
            .wait_for(|s| s.filter == LeagueFilter::League("EPL".to_string()))
            .await;
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
        h.stop().await;

        let shown: Vec<&str> = state.filtered_matches().iter().map(|m| m.home_team.as_str()).collect();
        assert_eq!(shown, vec!["Arsenal"]);

        let screen = render_to_string(&state);
        assert!(screen.contains("Arsenal  VS"));
        assert!(!screen.contains("Orlando Pirates  VS"));
        assert!(screen.contains("Matches: 1/3"));
    }

    #[tokio::test]
    async fn test_value_bet_panel_capped_in_match_order() {
        let entries: Vec<(String, f64)> = (1..=6).map(|i| (format!("Club {i}"), 0.8)).collect();
        let rows: Vec<(&str, &str, f64, f64)> = entries
            .iter()
            .map(|(home, p)| ("PSL", home.as_str(), *p, 1.6))
            .collect();
        let mut h = Harness::start(vec![Ok(matches_body(&rows))]);
        let state = h.wait_for(is_ready).await;
        h.stop().await;

        assert_eq!(state.value_bets.len(), 6);
        assert_eq!(state.visible_value_bets().len(), 4);

        let screen = render_to_string(&state);
        assert!(screen.contains("Value Bets [4/6]"));
        assert!(screen.contains("Club 4 vs Kaizer Chiefs - Home Win"));
        assert!(!screen.contains("Club 5 vs Kaizer Chiefs - Home Win"));
        // 0.8 - 1/1.6 = 0.175
        assert!(screen.contains("1.60 Hollywoodbets  Value: 17.5%  Implied: 62.5%"));
    }

    #[tokio::test]
    async fn test_supported_leagues_seed_selector() {
        let mut h = Harness::start(vec![Ok(matches_body(&[("Cup", "Arsenal", 0.4, 2.0)]))]);
        let state = h.wait_for(|s| !s.supported_leagues.is_empty()).await;
        h.stop().await;

        assert_eq!(state.league_options(), vec!["all", "PSL", "Cup"]);
    }

    #[tokio::test]
    async fn test_controller_stops_when_tui_goes_away() {
        let mut h = Harness::start(vec![Ok(Vec::new())]);
        h.wait_for(is_ready).await;
        let Harness { cmd_tx, handle, .. } = h;
        drop(cmd_tx);
        handle.await.unwrap();
    }
}
