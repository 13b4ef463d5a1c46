pub mod events;
pub mod game_trait;
pub mod input;
pub mod net;
pub mod snapshot;
pub mod team;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::GameEvent;
    use crate::game_trait::{CourtGame, MatchConfig, MatchMode, TeamScore};
    use crate::input::ControllerInputs;

    /// Create a match config for the given mode with default team names.
    pub fn default_config(mode: MatchMode) -> MatchConfig {
        MatchConfig::new(mode)
    }

    /// Run N simulation ticks with the given inputs held, returning all
    /// accumulated events.
    pub fn run_ticks(
        game: &mut dyn CourtGame,
        n: usize,
        inputs: &ControllerInputs,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(inputs));
        }
        all_events
    }

    /// Run N clock seconds, returning all accumulated events.
    pub fn run_clock(game: &mut dyn CourtGame, seconds: usize) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..seconds {
            all_events.extend(game.clock_tick());
        }
        all_events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn CourtGame, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every CourtGame implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// After init(), serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_state(game: &mut dyn CourtGame, mode: MatchMode) {
        game.init(&default_config(mode));
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// update() must advance the simulation.
    pub fn contract_update_advances_tick(game: &mut dyn CourtGame) {
        let before = game.snapshot().tick;
        game.update(&ControllerInputs::default());
        let after = game.snapshot().tick;
        assert_eq!(after, before + 1, "update() must advance the tick counter");
    }

    /// pause() must freeze ticks and the clock, resume() must unfreeze them.
    pub fn contract_pause_stops_updates(game: &mut dyn CourtGame) {
        let idle = ControllerInputs::default();
        game.pause();
        assert!(game.is_paused());
        let before = game.serialize_state();
        let events = game.update(&idle);
        assert!(events.is_empty(), "No events while paused");
        let events = game.clock_tick();
        assert!(events.is_empty(), "No clock events while paused");
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        assert!(!game.is_paused());
        game.update(&idle);
        assert_game_state_changed(game, &during_pause);
    }

    /// `MatchStarted` fires exactly once, on the first processed tick.
    pub fn contract_match_started_once(game: &mut dyn CourtGame, ticks: usize) {
        let events = run_ticks(game, ticks, &ControllerInputs::default());
        let started = events
            .iter()
            .filter(|e| matches!(e, GameEvent::MatchStarted { .. }))
            .count();
        assert_eq!(started, 1, "MatchStarted must be emitted exactly once");
        assert!(
            matches!(events.first(), Some(GameEvent::MatchStarted { .. })),
            "MatchStarted must be the first event"
        );
    }

    /// Running clock_tick() enough times must reach is_match_complete(),
    /// emit `MatchEnded` once, and freeze the simulation afterwards.
    pub fn contract_match_eventually_completes(game: &mut dyn CourtGame, max_seconds: usize) {
        let mut ended = 0;
        for _ in 0..max_seconds {
            ended += game
                .clock_tick()
                .iter()
                .filter(|e| matches!(e, GameEvent::MatchEnded { .. }))
                .count();
            if game.is_match_complete() {
                break;
            }
        }
        assert!(
            game.is_match_complete(),
            "Match must complete after {max_seconds} clock seconds"
        );
        assert_eq!(ended, 1, "MatchEnded must be emitted exactly once");

        let before = game.serialize_state();
        let events = game.update(&ControllerInputs::default());
        assert!(events.is_empty(), "No events after the match ended");
        assert!(game.clock_tick().is_empty());
        assert_eq!(
            before,
            game.serialize_state(),
            "State must not change after the match ended"
        );
    }

    /// final_scores() must return one entry per team.
    pub fn contract_final_scores_complete(game: &dyn CourtGame) -> Vec<TeamScore> {
        let scores = game.final_scores();
        assert_eq!(scores.len(), 2, "final_scores must have one entry per team");
        assert_ne!(scores[0].team, scores[1].team);
        scores
    }
}
