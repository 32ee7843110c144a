//! Data structures for the badminton tournament: tournaments, teams, matches, standings rows.

mod game;
mod standings;
mod team;
mod tournament;

pub use game::{
    GameScore, Match, MatchFormat, MatchId, MatchStatus, MatchUpdate, PointsTarget, Side,
    MAX_UMPIRES,
};
pub use standings::StandingsEntry;
pub use team::{Team, TeamId, DELETED_TEAM_NAME, MAX_MEMBERS};
pub use tournament::{
    Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
};
