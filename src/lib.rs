//! Badminton tournament web app: library with models, scoring, standings and storage.

pub mod config;
pub mod logic;
pub mod models;
pub mod session;
pub mod store;

pub use config::{Config, ConfigError};
pub use logic::{
    can_end_game, compute_standings, games_needed, games_won, generate_league_fixtures,
    match_winner, write_standings_csv, GameOutcome, ScoreboardView, ScoringError, ScoringSession,
    MAX_GAME_POINTS,
};
pub use models::{
    GameScore, Match, MatchFormat, MatchId, MatchStatus, MatchUpdate, PointsTarget, Side,
    StandingsEntry, Team, TeamId, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus, DELETED_TEAM_NAME,
};
pub use session::{authenticate, AccessError, Role, SessionContext};
pub use store::{JsonFileStore, MemoryStore, Snapshot, Store, StoreError};

use thiserror::Error;

/// Any failure the web layer can report.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0} not found")]
    NotFound(&'static str),
}
