//! Tournament business logic: live scoring, standings, league fixtures.

mod fixtures;
mod scoring;
mod standings;

pub use fixtures::generate_league_fixtures;
pub use scoring::{
    can_end_game, games_needed, games_won, match_winner, GameOutcome, ScoreboardView,
    ScoringError, ScoringSession, MAX_GAME_POINTS,
};
pub use standings::{compute_standings, write_standings_csv};
