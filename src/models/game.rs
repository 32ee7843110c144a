//! Match, GameScore, Side and the per-match rules (format, points target).

use crate::models::team::TeamId;
use crate::models::tournament::{TournamentError, TournamentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Most umpires a match can list.
pub const MAX_UMPIRES: usize = 3;

/// One side of a match: `One` is `team1_id`, `Two` is `team2_id`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

/// Lifecycle of a match. Only moves forward: scheduled -> live -> completed.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
}

/// Best-of-N format. Serialized as the plain number (1, 3 or 5).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MatchFormat {
    BestOf1,
    #[default]
    BestOf3,
    BestOf5,
}

impl MatchFormat {
    /// Maximum number of games in the match.
    pub fn games(self) -> u32 {
        match self {
            MatchFormat::BestOf1 => 1,
            MatchFormat::BestOf3 => 3,
            MatchFormat::BestOf5 => 5,
        }
    }

    /// Games a side must win to take the match: ceil(N / 2).
    pub fn games_needed(self) -> u32 {
        self.games().div_ceil(2)
    }
}

impl TryFrom<u32> for MatchFormat {
    type Error = TournamentError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MatchFormat::BestOf1),
            3 => Ok(MatchFormat::BestOf3),
            5 => Ok(MatchFormat::BestOf5),
            other => Err(TournamentError::InvalidMatchFormat(other)),
        }
    }
}

impl From<MatchFormat> for u32 {
    fn from(format: MatchFormat) -> Self {
        format.games()
    }
}

/// Score at which a game can end. Serialized as the plain number (15, 21 or 30).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PointsTarget {
    Fifteen,
    #[default]
    TwentyOne,
    Thirty,
}

impl PointsTarget {
    pub fn points(self) -> u32 {
        match self {
            PointsTarget::Fifteen => 15,
            PointsTarget::TwentyOne => 21,
            PointsTarget::Thirty => 30,
        }
    }
}

impl TryFrom<u32> for PointsTarget {
    type Error = TournamentError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            15 => Ok(PointsTarget::Fifteen),
            21 => Ok(PointsTarget::TwentyOne),
            30 => Ok(PointsTarget::Thirty),
            other => Err(TournamentError::InvalidPointsTarget(other)),
        }
    }
}

impl From<PointsTarget> for u32 {
    fn from(target: PointsTarget) -> Self {
        target.points()
    }
}

/// Points of one game (completed or in progress).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct GameScore {
    pub team1: u32,
    pub team2: u32,
}

impl GameScore {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::One => self.team1,
            Side::Two => self.team2,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::One => &mut self.team1,
            Side::Two => &mut self.team2,
        }
    }

    /// Side with more points; None on a tie.
    pub fn leader(&self) -> Option<Side> {
        use std::cmp::Ordering::*;
        match self.team1.cmp(&self.team2) {
            Greater => Some(Side::One),
            Less => Some(Side::Two),
            Equal => None,
        }
    }
}

/// A match between two teams of the same tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    #[serde(default)]
    pub status: MatchStatus,
    pub format: MatchFormat,
    pub points_target: PointsTarget,
    /// Completed games, in play order.
    #[serde(default)]
    pub scores: Vec<GameScore>,
    /// Set only once the match is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<TeamId>,
    /// Display/sequencing position.
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub umpire_names: Vec<String>,
}

impl Match {
    /// Create a scheduled match. The two teams must differ.
    pub fn new(
        tournament_id: TournamentId,
        team1_id: TeamId,
        team2_id: TeamId,
        format: MatchFormat,
        points_target: PointsTarget,
        order: u32,
    ) -> Result<Self, TournamentError> {
        if team1_id == team2_id {
            return Err(TournamentError::SameTeamTwice);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            tournament_id,
            team1_id,
            team2_id,
            status: MatchStatus::Scheduled,
            format,
            points_target,
            scores: Vec::new(),
            winner_id: None,
            order,
            umpire_names: Vec::new(),
        })
    }

    /// Replace the umpire list (0-3 names; blank entries are dropped).
    pub fn set_umpires(&mut self, names: Vec<String>) -> Result<(), TournamentError> {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.len() > MAX_UMPIRES {
            return Err(TournamentError::TooManyUmpires(names.len()));
        }
        self.umpire_names = names;
        Ok(())
    }

    pub fn team_id(&self, side: Side) -> TeamId {
        match side {
            Side::One => self.team1_id,
            Side::Two => self.team2_id,
        }
    }

    /// Which side a team plays on, if it plays in this match at all.
    pub fn side_of(&self, team_id: TeamId) -> Option<Side> {
        if team_id == self.team1_id {
            Some(Side::One)
        } else if team_id == self.team2_id {
            Some(Side::Two)
        } else {
            None
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Move a scheduled match to live. Returns true only when the transition happened.
    pub fn start_live(&mut self) -> bool {
        if self.status == MatchStatus::Scheduled {
            self.status = MatchStatus::Live;
            true
        } else {
            false
        }
    }

    /// Apply an administrator edit. Teams and rules are fixed once play has started.
    pub fn apply_update(&mut self, update: MatchUpdate) -> Result<(), TournamentError> {
        let changes_rules = update.team1_id.is_some()
            || update.team2_id.is_some()
            || update.format.is_some()
            || update.points_target.is_some();
        if changes_rules && self.status != MatchStatus::Scheduled {
            return Err(TournamentError::MatchAlreadyStarted);
        }
        let team1_id = update.team1_id.unwrap_or(self.team1_id);
        let team2_id = update.team2_id.unwrap_or(self.team2_id);
        if team1_id == team2_id {
            return Err(TournamentError::SameTeamTwice);
        }
        if let Some(names) = update.umpire_names {
            self.set_umpires(names)?;
        }
        self.team1_id = team1_id;
        self.team2_id = team2_id;
        if let Some(format) = update.format {
            self.format = format;
        }
        if let Some(points_target) = update.points_target {
            self.points_target = points_target;
        }
        if let Some(order) = update.order {
            self.order = order;
        }
        Ok(())
    }
}

/// Partial edit of a match. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchUpdate {
    pub team1_id: Option<TeamId>,
    pub team2_id: Option<TeamId>,
    pub format: Option<MatchFormat>,
    pub points_target: Option<PointsTarget>,
    pub order: Option<u32>,
    pub umpire_names: Option<Vec<String>>,
}
