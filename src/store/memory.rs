//! In-memory store: all records behind one RwLock. Lost on restart.

use super::{Snapshot, Store, StoreError};
use crate::models::{Match, MatchId, Team, TeamId, Tournament, TournamentId};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            data: RwLock::new(snapshot),
        }
    }

    pub(super) fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, StoreError> {
        self.data.read().map_err(|_| StoreError::LockPoisoned)
    }

    pub(super) fn write(&self) -> Result<RwLockWriteGuard<'_, Snapshot>, StoreError> {
        self.data.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Store for MemoryStore {
    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        Ok(self.read()?.tournaments.clone())
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        Ok(self.read()?.get_tournament(id))
    }

    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        self.write()?.save_tournament(tournament);
        Ok(())
    }

    fn delete_tournament(&self, id: TournamentId) -> Result<bool, StoreError> {
        Ok(self.write()?.delete_tournament(id))
    }

    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError> {
        Ok(self.read()?.list_teams(tournament_id))
    }

    fn get_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        Ok(self.read()?.get_team(id))
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.write()?.save_team(team);
        Ok(())
    }

    fn delete_team(&self, id: TeamId) -> Result<bool, StoreError> {
        Ok(self.write()?.delete_team(id))
    }

    fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, StoreError> {
        Ok(self.read()?.list_matches(tournament_id))
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        Ok(self.read()?.get_match(id))
    }

    fn save_match(&self, game_match: &Match) -> Result<(), StoreError> {
        self.write()?.save_match(game_match);
        Ok(())
    }

    fn delete_match(&self, id: MatchId) -> Result<bool, StoreError> {
        Ok(self.write()?.delete_match(id))
    }
}
