//! File-backed store: the in-memory store plus a JSON file rewritten after every change.

use super::{MemoryStore, Snapshot, Store, StoreError};
use crate::models::{Match, MatchId, Team, TeamId, Tournament, TournamentId};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Load records from `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = if path.exists() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice(&bytes)?
        } else {
            Snapshot::default()
        };
        log::info!(
            "Opened data file {} ({} tournament(s), {} team(s), {} match(es))",
            path.display(),
            snapshot.tournaments.len(),
            snapshot.teams.len(),
            snapshot.matches.len()
        );
        Ok(Self {
            path,
            inner: MemoryStore::with_snapshot(snapshot),
        })
    }

    /// Apply a change in memory, then rewrite the file. The change stays in memory even
    /// if the write fails.
    fn mutate<T>(&self, change: impl FnOnce(&mut Snapshot) -> T) -> Result<T, StoreError> {
        let mut data = self.inner.write()?;
        let result = change(&mut *data);
        write_atomically(&self.path, &*data)?;
        Ok(result)
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomically(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl Store for JsonFileStore {
    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        self.inner.list_tournaments()
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        self.inner.get_tournament(id)
    }

    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        self.mutate(|data| data.save_tournament(tournament))
    }

    fn delete_tournament(&self, id: TournamentId) -> Result<bool, StoreError> {
        self.mutate(|data| data.delete_tournament(id))
    }

    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, StoreError> {
        self.inner.list_teams(tournament_id)
    }

    fn get_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        self.inner.get_team(id)
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.mutate(|data| data.save_team(team))
    }

    fn delete_team(&self, id: TeamId) -> Result<bool, StoreError> {
        self.mutate(|data| data.delete_team(id))
    }

    fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, StoreError> {
        self.inner.list_matches(tournament_id)
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        self.inner.get_match(id)
    }

    fn save_match(&self, game_match: &Match) -> Result<(), StoreError> {
        self.mutate(|data| data.save_match(game_match))
    }

    fn delete_match(&self, id: MatchId) -> Result<bool, StoreError> {
        self.mutate(|data| data.delete_match(id))
    }
}
