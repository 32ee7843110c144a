//! StandingsEntry: one row of the derived league table.

use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};

/// Aggregated results for one team. Derived from the match log, never stored.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsEntry {
    /// 1-based position in the sorted table.
    pub rank: usize,
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub points_for: u64,
    pub points_against: u64,
    pub point_diff: i64,
}

impl StandingsEntry {
    /// Zeroed row for a team.
    pub fn for_team(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            ..Self::default()
        }
    }

    pub fn add_win(&mut self) {
        self.wins += 1;
        self.played += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
        self.played += 1;
    }

    /// Record one game from this team's point of view.
    pub fn add_game(&mut self, own: u32, opponent: u32) {
        if own > opponent {
            self.games_won += 1;
        } else if opponent > own {
            self.games_lost += 1;
        }
        self.points_for += u64::from(own);
        self.points_against += u64::from(opponent);
    }

    pub fn refresh_point_diff(&mut self) {
        let signed = |points: u64| i64::try_from(points).unwrap_or(i64::MAX);
        self.point_diff = signed(self.points_for).saturating_sub(signed(self.points_against));
    }
}
