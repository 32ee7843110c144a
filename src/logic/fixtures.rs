//! League fixtures: single round-robin schedule for all teams of a tournament.

use crate::models::{
    Match, MatchFormat, PointsTarget, Team, TeamId, Tournament, TournamentError,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Generate every pairing once, round by round (circle method).
///
/// 1. Reject non-League tournaments, teams from another tournament, and fewer than 2 teams.
/// 2. Shuffle the team order with `rng`.
/// 3. With an odd count, add a bye slot; the team drawn against it sits the round out.
/// 4. Each round pairs slot i with slot n-1-i, then rotates every slot but the first.
///
/// Matches come back `scheduled` with `order` 1, 2, 3, ... in play order.
pub fn generate_league_fixtures<R: Rng + ?Sized>(
    tournament: &Tournament,
    teams: &[Team],
    format: MatchFormat,
    points_target: PointsTarget,
    rng: &mut R,
) -> Result<Vec<Match>, TournamentError> {
    tournament.ensure_league()?;
    if let Some(stranger) = teams.iter().find(|t| t.tournament_id != tournament.id) {
        return Err(TournamentError::TeamNotInTournament(stranger.id));
    }
    if teams.len() < 2 {
        return Err(TournamentError::NotEnoughTeams(teams.len()));
    }

    let mut slots: Vec<Option<TeamId>> = teams.iter().map(|t| Some(t.id)).collect();
    slots.shuffle(rng);
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let n = slots.len();
    let mut matches = Vec::with_capacity(n * (n - 1) / 2);
    let mut order = 1;
    for _round in 0..n - 1 {
        for i in 0..n / 2 {
            if let (Some(home), Some(away)) = (slots[i], slots[n - 1 - i]) {
                matches.push(Match::new(
                    tournament.id,
                    home,
                    away,
                    format,
                    points_target,
                    order,
                )?);
                order += 1;
            }
        }
        slots[1..].rotate_right(1);
    }

    log::info!(
        "Generated {} league fixture(s) for tournament {}",
        matches.len(),
        tournament.id
    );
    Ok(matches)
}
