//! Team: a named group of 1-4 players entered in one tournament.

use crate::models::tournament::{TournamentError, TournamentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and standings lookups).
pub type TeamId = Uuid;

/// Display name used wherever a match references a team that no longer exists.
pub const DELETED_TEAM_NAME: &str = "Deleted Team";

pub const MAX_MEMBERS: usize = 4;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub tournament_id: TournamentId,
    pub name: String,
    /// Player names, in the order they were entered.
    pub members: Vec<String>,
}

impl Team {
    /// Create a team. Name and member names are trimmed; blank members are dropped.
    pub fn new(
        tournament_id: TournamentId,
        name: impl Into<String>,
        members: Vec<String>,
    ) -> Result<Self, TournamentError> {
        let mut team = Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: String::new(),
            members: Vec::new(),
        };
        team.rename(name)?;
        team.set_members(members)?;
        Ok(team)
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

    pub fn set_members(&mut self, members: Vec<String>) -> Result<(), TournamentError> {
        let members: Vec<String> = members
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if members.is_empty() || members.len() > MAX_MEMBERS {
            return Err(TournamentError::InvalidMemberCount(members.len()));
        }
        self.members = members;
        Ok(())
    }
}
