//! Tournament, its lifecycle, and the validation errors shared by all records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when a record or a requested change is invalid.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TournamentError {
    /// A name was blank after trimming.
    #[error("Name must not be empty")]
    EmptyName,
    /// A team needs between 1 and 4 members.
    #[error("A team needs 1 to 4 members (got {0})")]
    InvalidMemberCount(usize),
    /// Both sides of a match are the same team.
    #[error("A match needs two different teams")]
    SameTeamTwice,
    #[error("A match can have at most 3 umpires (got {0})")]
    TooManyUmpires(usize),
    #[error("Match format must be best of 1, 3 or 5 (got {0})")]
    InvalidMatchFormat(u32),
    #[error("Points target must be 15, 21 or 30 (got {0})")]
    InvalidPointsTarget(u32),
    /// Teams and rules cannot change once the match has left `scheduled`.
    #[error("Match has already started")]
    MatchAlreadyStarted,
    /// Lifecycle status cannot move backwards.
    #[error("Tournament status cannot go from {from:?} back to {to:?}")]
    StatusRegression {
        from: TournamentStatus,
        to: TournamentStatus,
    },
    /// Operation only exists for League tournaments.
    #[error("Only League tournaments support this")]
    UnsupportedFormat,
    /// Fixtures need at least two teams.
    #[error("Need at least 2 teams (got {0})")]
    NotEnoughTeams(usize),
    /// A referenced team belongs to another tournament.
    #[error("Team {0} is not part of this tournament")]
    TeamNotInTournament(Uuid),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How the tournament is played. Only League has a ranking table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum TournamentFormat {
    #[default]
    League,
    Knockout,
}

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: TournamentStatus,
}

impl Tournament {
    /// Create a new tournament in Upcoming state.
    pub fn new(name: impl Into<String>, format: TournamentFormat) -> Result<Self, TournamentError> {
        let mut tournament = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            format,
            created_at: Utc::now(),
            status: TournamentStatus::Upcoming,
        };
        tournament.rename(name)?;
        Ok(tournament)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), TournamentError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        self.name = name.to_string();
        Ok(())
    }

    /// Advance the lifecycle status. Setting the current status again is a no-op.
    pub fn set_status(&mut self, status: TournamentStatus) -> Result<(), TournamentError> {
        if status < self.status {
            return Err(TournamentError::StatusRegression {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        Ok(())
    }

    pub fn ensure_league(&self) -> Result<(), TournamentError> {
        match self.format {
            TournamentFormat::League => Ok(()),
            TournamentFormat::Knockout => Err(TournamentError::UnsupportedFormat),
        }
    }
}
