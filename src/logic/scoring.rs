//! Live scoring: point-by-point play of one match until a side wins enough games.
//!
//! A [`ScoringSession`] holds the live game score and an undo stack next to the match.
//! The live score is never persisted; only completed games land in `Match::scores`.

use crate::models::{
    GameScore, Match, MatchFormat, MatchStatus, MatchUpdate, PointsTarget, Side, TeamId,
    TournamentError,
};
use serde::Serialize;
use thiserror::Error;

/// Window below the target in which a 2-point lead ends a game.
const LEAD_WINDOW: u32 = 5;

/// Highest live score a side can hold: twice the largest points target.
pub const MAX_GAME_POINTS: u32 = 60;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ScoringError {
    /// The match already has a winner; no further scoring is accepted.
    #[error("Match is already completed")]
    MatchCompleted,
    /// The live score does not satisfy the game-end condition yet.
    #[error("Game cannot end at {0}-{1}")]
    GameNotFinished(u32, u32),
    /// A tied game has no winner.
    #[error("Game cannot end tied at {0}-{0}")]
    TiedGame(u32),
    #[error("Score {0} is above the maximum of {max}", max = MAX_GAME_POINTS)]
    ScoreTooHigh(u32),
}

/// Result of ending a game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameOutcome {
    /// Match continues; `game_number` is the 1-based number of the game just ended.
    GameEnded { game_number: u32 },
    /// A side reached the games needed; the match is completed.
    MatchCompleted { winner_id: TeamId },
}

/// Whether a game at `score` may end under `target`.
///
/// True when either side has reached the target (no 2-point margin required there),
/// or when both sides have scored, one leads by at least 2, and the leader is within
/// 5 points of the target.
pub fn can_end_game(score: GameScore, target: PointsTarget) -> bool {
    let target = target.points();
    let (a, b) = (score.team1, score.team2);
    if a >= target || b >= target {
        return true;
    }
    a > 0 && b > 0 && a.abs_diff(b) >= 2 && a.max(b) >= target.saturating_sub(LEAD_WINDOW)
}

/// Games a side must win: ceil(format / 2).
pub fn games_needed(format: MatchFormat) -> u32 {
    format.games_needed()
}

/// Games won by (team1, team2). Tied games count for nobody.
pub fn games_won(scores: &[GameScore]) -> (u32, u32) {
    scores
        .iter()
        .fold((0, 0), |(one, two), game| match game.leader() {
            Some(Side::One) => (one + 1, two),
            Some(Side::Two) => (one, two + 1),
            None => (one, two),
        })
}

/// The side that has won `games_needed` games, if any.
pub fn match_winner(m: &Match) -> Option<Side> {
    let needed = games_needed(m.format);
    let (one, two) = games_won(&m.scores);
    if one >= needed {
        Some(Side::One)
    } else if two >= needed {
        Some(Side::Two)
    } else {
        None
    }
}

/// One match being scored live.
#[derive(Clone, Debug)]
pub struct ScoringSession {
    game_match: Match,
    current: GameScore,
    /// Scores before each change in the current game, most recent last.
    history: Vec<GameScore>,
    /// 1-based number of the game in progress.
    game_number: u32,
    went_live: bool,
}

impl ScoringSession {
    /// Open the scoring view for a match. A scheduled match goes live; re-entering a
    /// live or completed match changes nothing.
    pub fn new(mut game_match: Match) -> Self {
        let went_live = game_match.start_live();
        if went_live {
            log::info!("Match {} is now live", game_match.id);
        }
        let game_number = game_match.scores.len() as u32 + 1;
        Self {
            game_match,
            current: GameScore::default(),
            history: Vec::new(),
            game_number,
            went_live,
        }
    }

    /// True when opening this session moved the match from scheduled to live.
    pub fn went_live(&self) -> bool {
        self.went_live
    }

    pub fn game_match(&self) -> &Match {
        &self.game_match
    }

    pub fn into_match(self) -> Match {
        self.game_match
    }

    pub fn current(&self) -> GameScore {
        self.current
    }

    pub fn game_number(&self) -> u32 {
        self.game_number
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.game_match.is_completed()
    }

    /// Whether `end_game` would accept the live score. Unlike the free [`can_end_game`],
    /// a tied score never qualifies.
    pub fn can_end_game(&self) -> bool {
        !self.is_completed()
            && self.current.leader().is_some()
            && can_end_game(self.current, self.game_match.points_target)
    }

    /// Apply an administrator edit to the match being scored, so the next persisted
    /// copy carries it.
    pub fn apply_update(&mut self, update: MatchUpdate) -> Result<(), TournamentError> {
        self.game_match.apply_update(update)
    }

    fn ensure_in_play(&self) -> Result<(), ScoringError> {
        if self.is_completed() {
            return Err(ScoringError::MatchCompleted);
        }
        Ok(())
    }

    fn record(&mut self, side: Side, value: u32) -> Result<(), ScoringError> {
        if value > MAX_GAME_POINTS {
            return Err(ScoringError::ScoreTooHigh(value));
        }
        self.history.push(self.current);
        *self.current.get_mut(side) = value;
        log::debug!(
            "Match {} game {}: {}-{}",
            self.game_match.id,
            self.game_number,
            self.current.team1,
            self.current.team2
        );
        Ok(())
    }

    /// Add one point to `side`.
    pub fn add_point(&mut self, side: Side) -> Result<(), ScoringError> {
        self.ensure_in_play()?;
        let value = self.current.get(side).saturating_add(1);
        self.record(side, value)
    }

    /// Take one point from `side`, never below zero.
    pub fn remove_point(&mut self, side: Side) -> Result<(), ScoringError> {
        self.ensure_in_play()?;
        let value = self.current.get(side).saturating_sub(1);
        self.record(side, value)
    }

    /// Overwrite the live score of `side`. Values above [`MAX_GAME_POINTS`] are rejected.
    pub fn set_score(&mut self, side: Side, value: u32) -> Result<(), ScoringError> {
        self.ensure_in_play()?;
        self.record(side, value)
    }

    /// Restore the score from before the last change. No-op with empty history, which
    /// includes every completed match.
    pub fn undo(&mut self) -> Result<(), ScoringError> {
        if let Some(previous) = self.history.pop() {
            self.current = previous;
        }
        Ok(())
    }

    /// Close the current game and check whether the match is decided.
    pub fn end_game(&mut self) -> Result<GameOutcome, ScoringError> {
        self.ensure_in_play()?;
        let score = self.current;
        if !can_end_game(score, self.game_match.points_target) {
            return Err(ScoringError::GameNotFinished(score.team1, score.team2));
        }
        if score.team1 == score.team2 {
            return Err(ScoringError::TiedGame(score.team1));
        }

        self.game_match.scores.push(score);
        let ended = self.game_number;
        self.game_number += 1;
        self.current = GameScore::default();
        self.history.clear();

        if let Some(side) = match_winner(&self.game_match) {
            let winner_id = self.game_match.team_id(side);
            self.game_match.status = MatchStatus::Completed;
            self.game_match.winner_id = Some(winner_id);
            log::info!(
                "Match {} completed after {} game(s), winner {}",
                self.game_match.id,
                self.game_match.scores.len(),
                winner_id
            );
            return Ok(GameOutcome::MatchCompleted { winner_id });
        }

        log::info!(
            "Match {} game {} ended {}-{}",
            self.game_match.id,
            ended,
            score.team1,
            score.team2
        );
        Ok(GameOutcome::GameEnded { game_number: ended })
    }

    /// Serializable snapshot for display after each change.
    pub fn scoreboard(&self) -> ScoreboardView {
        let (games_team1, games_team2) = games_won(&self.game_match.scores);
        ScoreboardView {
            game_match: self.game_match.clone(),
            current: self.current,
            game_number: self.game_number,
            games_team1,
            games_team2,
            can_end_game: self.can_end_game(),
            undo_available: self.can_undo(),
        }
    }
}

/// What the scoring screen shows.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardView {
    #[serde(rename = "match")]
    pub game_match: Match,
    pub current: GameScore,
    pub game_number: u32,
    pub games_team1: u32,
    pub games_team2: u32,
    pub can_end_game: bool,
    pub undo_available: bool,
}
