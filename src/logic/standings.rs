//! League table: fold completed matches into per-team totals and rank them.

use crate::models::{Match, Side, StandingsEntry, Team, TeamId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Write;

/// Rank all teams from the full match set.
///
/// 1. One zeroed row per team, in the order given.
/// 2. For every completed match whose two teams both resolve: win/loss from `winner_id`,
///    then games and points for each game in `scores`.
/// 3. Sort by wins, then games won, then point difference (all descending). The sort is
///    stable, so rows still equal keep the input team order.
///
/// Matches pointing at a team that is not in `teams` are skipped entirely, so a deleted
/// opponent leaves no trace on the surviving team's row.
pub fn compute_standings(teams: &[Team], matches: &[Match]) -> Vec<StandingsEntry> {
    let mut entries: Vec<StandingsEntry> = teams.iter().map(StandingsEntry::for_team).collect();
    let index: HashMap<TeamId, usize> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id, i))
        .collect();

    for m in matches.iter().filter(|m| m.is_completed()) {
        let (Some(&one), Some(&two)) = (index.get(&m.team1_id), index.get(&m.team2_id)) else {
            log::debug!("Skipping match {} with a dangling team reference", m.id);
            continue;
        };
        apply_match(&mut entries, one, two, m);
    }

    for entry in &mut entries {
        entry.refresh_point_diff();
    }
    entries.sort_by(compare_entries);
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = position + 1;
    }
    entries
}

/// Add one completed match to the rows at `one` (team1) and `two` (team2).
fn apply_match(entries: &mut [StandingsEntry], one: usize, two: usize, m: &Match) {
    match m.winner_id.and_then(|w| m.side_of(w)) {
        Some(Side::One) => {
            entries[one].add_win();
            entries[two].add_loss();
        }
        Some(Side::Two) => {
            entries[two].add_win();
            entries[one].add_loss();
        }
        None => log::warn!("Completed match {} has no valid winner", m.id),
    }
    for game in &m.scores {
        entries[one].add_game(game.team1, game.team2);
        entries[two].add_game(game.team2, game.team1);
    }
}

/// Better rows first: wins, then games won, then point difference.
fn compare_entries(a: &StandingsEntry, b: &StandingsEntry) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.games_won.cmp(&a.games_won))
        .then_with(|| b.point_diff.cmp(&a.point_diff))
}

/// Write the table as CSV: a header row, then one row per entry.
pub fn write_standings_csv<W: Write>(entries: &[StandingsEntry], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}
