//! Integration tests for live scoring: points, undo, game end and match completion.

use badminton_tournament_web::{
    can_end_game, games_needed, games_won, GameOutcome, GameScore, Match, MatchFormat,
    MatchStatus, MatchUpdate, PointsTarget, ScoringError, ScoringSession, Side, TournamentError,
    MAX_GAME_POINTS,
};
use uuid::Uuid;

fn new_match(format: MatchFormat, target: PointsTarget) -> Match {
    Match::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), format, target, 1).unwrap()
}

/// Drive the live score to `a`-`b` with single points, then end the game.
fn play_game(s: &mut ScoringSession, a: u32, b: u32) -> Result<GameOutcome, ScoringError> {
    for _ in 0..a {
        s.add_point(Side::One)?;
    }
    for _ in 0..b {
        s.add_point(Side::Two)?;
    }
    s.end_game()
}

#[test]
fn games_needed_is_half_the_format_rounded_up() {
    assert_eq!(games_needed(MatchFormat::BestOf1), 1);
    assert_eq!(games_needed(MatchFormat::BestOf3), 2);
    assert_eq!(games_needed(MatchFormat::BestOf5), 3);
}

#[test]
fn entering_scoring_goes_live_once() {
    let m = new_match(MatchFormat::BestOf3, PointsTarget::TwentyOne);
    let s = ScoringSession::new(m);
    assert!(s.went_live());
    assert_eq!(s.game_match().status, MatchStatus::Live);

    // Re-entering a live match does not transition again
    let again = ScoringSession::new(s.into_match());
    assert!(!again.went_live());
    assert_eq!(again.game_match().status, MatchStatus::Live);
}

#[test]
fn best_of_three_example_completes_with_team1_winning() {
    let m = new_match(MatchFormat::BestOf3, PointsTarget::TwentyOne);
    let team1 = m.team1_id;
    let mut s = ScoringSession::new(m);

    assert_eq!(play_game(&mut s, 21, 15), Ok(GameOutcome::GameEnded { game_number: 1 }));
    assert_eq!(play_game(&mut s, 18, 21), Ok(GameOutcome::GameEnded { game_number: 2 }));
    assert_eq!(
        play_game(&mut s, 21, 19),
        Ok(GameOutcome::MatchCompleted { winner_id: team1 })
    );

    let m = s.game_match();
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(m.winner_id, Some(team1));
    assert_eq!(
        m.scores,
        vec![GameScore::new(21, 15), GameScore::new(18, 21), GameScore::new(21, 19)]
    );
    assert_eq!(games_won(&m.scores), (2, 1));
}

#[test]
fn best_of_one_ends_after_a_single_game() {
    let m = new_match(MatchFormat::BestOf1, PointsTarget::Fifteen);
    let team2 = m.team2_id;
    let mut s = ScoringSession::new(m);
    assert_eq!(
        play_game(&mut s, 10, 15),
        Ok(GameOutcome::MatchCompleted { winner_id: team2 })
    );
    assert_eq!(s.game_match().scores.len(), 1);
}

#[test]
fn scores_never_exceed_format_length() {
    let m = new_match(MatchFormat::BestOf5, PointsTarget::TwentyOne);
    let mut s = ScoringSession::new(m);
    // Alternate winners: 2-2, then the fifth game decides
    for (a, b) in [(21, 10), (10, 21), (21, 10), (10, 21)] {
        assert!(matches!(play_game(&mut s, a, b), Ok(GameOutcome::GameEnded { .. })));
    }
    assert!(matches!(
        play_game(&mut s, 21, 10),
        Ok(GameOutcome::MatchCompleted { .. })
    ));
    assert_eq!(s.game_match().scores.len(), 5);
}

#[test]
fn live_score_resets_between_games() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf3, PointsTarget::TwentyOne));
    play_game(&mut s, 21, 5).unwrap();
    assert_eq!(s.current(), GameScore::new(0, 0));
    assert!(!s.can_undo());
    assert_eq!(s.game_number(), 2);
    assert_eq!(s.game_match().status, MatchStatus::Live);
    assert_eq!(s.game_match().winner_id, None);
}

#[test]
fn undo_restores_previous_score() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf3, PointsTarget::TwentyOne));
    s.add_point(Side::Two).unwrap();
    s.add_point(Side::One).unwrap();
    assert_eq!(s.current(), GameScore::new(1, 1));
    s.undo().unwrap();
    assert_eq!(s.current(), GameScore::new(0, 1));
}

#[test]
fn undo_with_empty_history_is_a_no_op() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf3, PointsTarget::TwentyOne));
    s.undo().unwrap();
    assert_eq!(s.current(), GameScore::new(0, 0));
    assert!(!s.can_undo());
}

#[test]
fn remove_point_floors_at_zero_and_is_undoable() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf3, PointsTarget::TwentyOne));
    s.remove_point(Side::One).unwrap();
    assert_eq!(s.current(), GameScore::new(0, 0));
    s.add_point(Side::One).unwrap();
    s.add_point(Side::One).unwrap();
    s.remove_point(Side::One).unwrap();
    assert_eq!(s.current(), GameScore::new(1, 0));
    s.undo().unwrap();
    assert_eq!(s.current(), GameScore::new(2, 0));
}

#[test]
fn set_score_overrides_and_undo_reverts() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf3, PointsTarget::TwentyOne));
    s.set_score(Side::Two, 17).unwrap();
    assert_eq!(s.current(), GameScore::new(0, 17));
    s.undo().unwrap();
    assert_eq!(s.current(), GameScore::new(0, 0));
}

#[test]
fn end_game_rejects_unfinished_and_tied_scores() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf3, PointsTarget::TwentyOne));
    s.set_score(Side::One, 10).unwrap();
    s.set_score(Side::Two, 9).unwrap();
    assert_eq!(s.end_game(), Err(ScoringError::GameNotFinished(10, 9)));

    s.set_score(Side::One, 21).unwrap();
    s.set_score(Side::Two, 21).unwrap();
    assert_eq!(s.end_game(), Err(ScoringError::TiedGame(21)));
    assert!(s.game_match().scores.is_empty());
}

#[test]
fn completed_match_rejects_further_scoring() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf1, PointsTarget::TwentyOne));
    play_game(&mut s, 21, 3).unwrap();
    assert!(s.is_completed());
    assert_eq!(s.add_point(Side::One), Err(ScoringError::MatchCompleted));
    assert_eq!(s.remove_point(Side::Two), Err(ScoringError::MatchCompleted));
    assert_eq!(s.set_score(Side::One, 4), Err(ScoringError::MatchCompleted));
    assert_eq!(s.end_game(), Err(ScoringError::MatchCompleted));
    assert_eq!(s.current(), GameScore::new(0, 0));
    assert!(!s.can_end_game());

    // Nothing left to undo once the match is over
    assert_eq!(s.undo(), Ok(()));
    assert_eq!(s.current(), GameScore::new(0, 0));
    assert_eq!(s.game_match().scores, vec![GameScore::new(21, 3)]);
}

#[test]
fn live_score_is_capped() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf3, PointsTarget::Thirty));
    assert_eq!(
        s.set_score(Side::One, u32::MAX),
        Err(ScoringError::ScoreTooHigh(u32::MAX))
    );
    assert_eq!(s.current(), GameScore::new(0, 0));
    assert!(!s.can_undo());

    s.set_score(Side::One, MAX_GAME_POINTS).unwrap();
    assert_eq!(
        s.add_point(Side::One),
        Err(ScoringError::ScoreTooHigh(MAX_GAME_POINTS + 1))
    );
    assert_eq!(s.current(), GameScore::new(MAX_GAME_POINTS, 0));

    s.add_point(Side::Two).unwrap();
    assert!(matches!(s.end_game(), Ok(GameOutcome::GameEnded { .. })));
}

#[test]
fn edits_reach_the_match_being_scored() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf1, PointsTarget::TwentyOne));
    s.apply_update(MatchUpdate {
        order: Some(9),
        umpire_names: Some(vec!["Ula".into()]),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        s.apply_update(MatchUpdate {
            points_target: Some(PointsTarget::Thirty),
            ..Default::default()
        }),
        Err(TournamentError::MatchAlreadyStarted)
    );

    play_game(&mut s, 21, 12).unwrap();
    let m = s.into_match();
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(m.order, 9);
    assert_eq!(m.umpire_names, vec!["Ula".to_string()]);
    assert_eq!(m.points_target, PointsTarget::TwentyOne);
}

#[test]
fn cap_at_target_ends_game_with_one_point_margin() {
    assert!(can_end_game(GameScore::new(29, 30), PointsTarget::Thirty));
    assert!(can_end_game(GameScore::new(21, 20), PointsTarget::TwentyOne));
}

#[test]
fn two_point_lead_ends_game_only_inside_window() {
    let target = PointsTarget::TwentyOne;
    // Leader at 16 = target - 5
    assert!(can_end_game(GameScore::new(16, 14), target));
    assert!(!can_end_game(GameScore::new(15, 13), target));
    assert!(!can_end_game(GameScore::new(18, 17), target));
    // Both sides must have scored
    assert!(!can_end_game(GameScore::new(18, 0), target));
    assert!(!can_end_game(GameScore::new(0, 0), target));
}

#[test]
fn scoreboard_reflects_session() {
    let mut s = ScoringSession::new(new_match(MatchFormat::BestOf3, PointsTarget::Fifteen));
    play_game(&mut s, 15, 4).unwrap();
    s.add_point(Side::Two).unwrap();
    let view = s.scoreboard();
    assert_eq!(view.current, GameScore::new(0, 1));
    assert_eq!((view.games_team1, view.games_team2), (1, 0));
    assert_eq!(view.game_number, 2);
    assert!(view.undo_available);
    assert!(!view.can_end_game);

    // A tied score meets the target but cannot end the game
    s.set_score(Side::One, 15).unwrap();
    s.set_score(Side::Two, 15).unwrap();
    assert!(can_end_game(s.current(), PointsTarget::Fifteen));
    assert!(!s.scoreboard().can_end_game);
    assert_eq!(s.end_game(), Err(ScoringError::TiedGame(15)));

    s.add_point(Side::Two).unwrap();
    assert!(s.scoreboard().can_end_game);
}
