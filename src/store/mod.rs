//! Persistence: create/read/update/delete for tournaments, teams and matches.
//!
//! Writes are last-write-wins upserts. Deleting a tournament removes its teams and
//! matches; deleting a team leaves matches that reference it untouched.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::{Match, MatchId, Team, TeamId, Tournament, TournamentId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored data is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Record storage shared by all clients.
pub trait Store: Send + Sync {
    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError>;
    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;
    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StoreError>;
    /// Removes the tournament with its teams and matches. Returns false if it did not exist.
    fn delete_tournament(&self, id: TournamentId) -> Result<bool, StoreError>;

    /// Teams of a tournament, in creation order.
    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError>;
    fn get_team(&self, id: TeamId) -> Result<Option<Team>, StoreError>;
    fn save_team(&self, team: &Team) -> Result<(), StoreError>;
    fn delete_team(&self, id: TeamId) -> Result<bool, StoreError>;

    /// Matches of a tournament, sorted by `order`.
    fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, StoreError>;
    fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError>;
    fn save_match(&self, game_match: &Match) -> Result<(), StoreError>;
    fn delete_match(&self, id: MatchId) -> Result<bool, StoreError>;

    /// Write a match after a scoring transition.
    fn persist_match(&self, game_match: &Match) -> Result<(), StoreError> {
        self.save_match(game_match)
    }
}

/// Everything a store holds. Also the on-disk format of [`JsonFileStore`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tournaments: Vec<Tournament>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// Replace the record with the same id, or append it.
fn upsert<T: Clone, K: PartialEq>(records: &mut Vec<T>, record: &T, key: impl Fn(&T) -> K) {
    let id = key(record);
    match records.iter().position(|r| key(r) == id) {
        Some(i) => records[i] = record.clone(),
        None => records.push(record.clone()),
    }
}

/// Remove the record with `id`. Returns whether one was removed.
fn remove<T, K: PartialEq>(records: &mut Vec<T>, id: K, key: impl Fn(&T) -> K) -> bool {
    let before = records.len();
    records.retain(|r| key(r) != id);
    records.len() != before
}

impl Snapshot {
    fn get_tournament(&self, id: TournamentId) -> Option<Tournament> {
        self.tournaments.iter().find(|t| t.id == id).cloned()
    }

    fn save_tournament(&mut self, tournament: &Tournament) {
        upsert(&mut self.tournaments, tournament, |t| t.id);
    }

    fn delete_tournament(&mut self, id: TournamentId) -> bool {
        let removed = remove(&mut self.tournaments, id, |t| t.id);
        if removed {
            self.teams.retain(|t| t.tournament_id != id);
            self.matches.retain(|m| m.tournament_id != id);
        }
        removed
    }

    fn list_teams(&self, tournament_id: TournamentId) -> Vec<Team> {
        self.teams
            .iter()
            .filter(|t| t.tournament_id == tournament_id)
            .cloned()
            .collect()
    }

    fn get_team(&self, id: TeamId) -> Option<Team> {
        self.teams.iter().find(|t| t.id == id).cloned()
    }

    fn save_team(&mut self, team: &Team) {
        upsert(&mut self.teams, team, |t| t.id);
    }

    fn delete_team(&mut self, id: TeamId) -> bool {
        remove(&mut self.teams, id, |t| t.id)
    }

    fn list_matches(&self, tournament_id: TournamentId) -> Vec<Match> {
        let mut matches: Vec<Match> = self
            .matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.order);
        matches
    }

    fn get_match(&self, id: MatchId) -> Option<Match> {
        self.matches.iter().find(|m| m.id == id).cloned()
    }

    fn save_match(&mut self, game_match: &Match) {
        upsert(&mut self.matches, game_match, |m| m.id);
    }

    fn delete_match(&mut self, id: MatchId) -> bool {
        remove(&mut self.matches, id, |m| m.id)
    }
}
