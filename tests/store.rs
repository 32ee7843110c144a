//! Integration tests for the stores: CRUD, cascade delete, and JSON persistence.

use badminton_tournament_web::{
    compute_standings, GameScore, JsonFileStore, Match, MatchFormat, MatchStatus, MemoryStore,
    PointsTarget, ScoringSession, Side, Store, Team, Tournament, TournamentFormat,
};

struct Fixture {
    tournament: Tournament,
    a: Team,
    b: Team,
    game_match: Match,
}

fn seed(store: &dyn Store) -> Fixture {
    let tournament = Tournament::new("Spring League", TournamentFormat::League).unwrap();
    let a = Team::new(tournament.id, "Shuttle Kings", vec!["Ann".into(), "Bo".into()]).unwrap();
    let b = Team::new(tournament.id, "Net Ninjas", vec!["Cy".into()]).unwrap();
    let game_match = Match::new(
        tournament.id,
        a.id,
        b.id,
        MatchFormat::BestOf3,
        PointsTarget::TwentyOne,
        1,
    )
    .unwrap();
    store.save_tournament(&tournament).unwrap();
    store.save_team(&a).unwrap();
    store.save_team(&b).unwrap();
    store.save_match(&game_match).unwrap();
    Fixture {
        tournament,
        a,
        b,
        game_match,
    }
}

/// Play the match to a 2-1 win for team 1.
fn play_out(m: Match) -> Match {
    let mut s = ScoringSession::new(m);
    for (a, b) in [(21, 15), (18, 21), (21, 19)] {
        s.set_score(Side::One, a).unwrap();
        s.set_score(Side::Two, b).unwrap();
        s.end_game().unwrap();
    }
    s.into_match()
}

#[test]
fn save_is_an_upsert() {
    let store = MemoryStore::new();
    let f = seed(&store);
    let mut renamed = f.a.clone();
    renamed.rename("Smash Bros").unwrap();
    store.save_team(&renamed).unwrap();

    let teams = store.list_teams(f.tournament.id).unwrap();
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].name, "Smash Bros");
    assert_eq!(teams[1].id, f.b.id);
}

#[test]
fn matches_are_listed_by_order() {
    let store = MemoryStore::new();
    let f = seed(&store);
    let mut early = Match::new(
        f.tournament.id,
        f.b.id,
        f.a.id,
        MatchFormat::BestOf1,
        PointsTarget::Fifteen,
        0,
    )
    .unwrap();
    early.set_umpires(vec!["Umpire Ula".into()]).unwrap();
    store.save_match(&early).unwrap();

    let ids: Vec<_> = store
        .list_matches(f.tournament.id)
        .unwrap()
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec![early.id, f.game_match.id]);
}

#[test]
fn deleting_tournament_cascades() {
    let store = MemoryStore::new();
    let f = seed(&store);
    let other = seed(&store);

    assert!(store.delete_tournament(f.tournament.id).unwrap());
    assert!(store.get_tournament(f.tournament.id).unwrap().is_none());
    assert!(store.list_teams(f.tournament.id).unwrap().is_empty());
    assert!(store.get_match(f.game_match.id).unwrap().is_none());

    // Other tournament untouched
    assert_eq!(store.list_teams(other.tournament.id).unwrap().len(), 2);
    assert!(store.get_match(other.game_match.id).unwrap().is_some());
    assert!(!store.delete_tournament(f.tournament.id).unwrap());
}

#[test]
fn deleting_team_keeps_matches_and_drops_them_from_standings() {
    let store = MemoryStore::new();
    let f = seed(&store);
    store.persist_match(&play_out(f.game_match.clone())).unwrap();

    let before = compute_standings(
        &store.list_teams(f.tournament.id).unwrap(),
        &store.list_matches(f.tournament.id).unwrap(),
    );
    assert_eq!(before[0].team_id, f.a.id);
    assert_eq!(before[0].wins, 1);

    assert!(store.delete_team(f.b.id).unwrap());
    assert_eq!(store.list_matches(f.tournament.id).unwrap().len(), 1);

    let after = compute_standings(
        &store.list_teams(f.tournament.id).unwrap(),
        &store.list_matches(f.tournament.id).unwrap(),
    );
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].team_id, f.a.id);
    assert_eq!((after[0].wins, after[0].points_for), (0, 0));
}

#[test]
fn json_round_trip_keeps_scores_status_and_winner() {
    let m = play_out(Match::new(
        uuid::Uuid::new_v4(),
        uuid::Uuid::new_v4(),
        uuid::Uuid::new_v4(),
        MatchFormat::BestOf3,
        PointsTarget::TwentyOne,
        3,
    )
    .unwrap());

    let encoded = serde_json::to_string(&m).unwrap();
    assert!(encoded.contains("\"team1Id\""));
    assert!(encoded.contains("\"pointsTarget\":21"));
    assert!(encoded.contains("\"status\":\"completed\""));

    let decoded: Match = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.scores, m.scores);
    assert_eq!(decoded.status, MatchStatus::Completed);
    assert_eq!(decoded.winner_id, m.winner_id);
    assert_eq!(decoded, m);
}

#[test]
fn json_rejects_unknown_format_and_target() {
    let m = Match::new(
        uuid::Uuid::new_v4(),
        uuid::Uuid::new_v4(),
        uuid::Uuid::new_v4(),
        MatchFormat::BestOf5,
        PointsTarget::Thirty,
        1,
    )
    .unwrap();
    let encoded = serde_json::to_string(&m).unwrap();
    assert!(serde_json::from_str::<Match>(&encoded.replace("\"format\":5", "\"format\":4")).is_err());
    assert!(serde_json::from_str::<Match>(&encoded.replace("\"pointsTarget\":30", "\"pointsTarget\":11")).is_err());
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");

    let (f, played) = {
        let store = JsonFileStore::open(&path).unwrap();
        let f = seed(&store);
        let played = play_out(f.game_match.clone());
        store.persist_match(&played).unwrap();
        (f, played)
    };

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get_tournament(f.tournament.id).unwrap(), Some(f.tournament.clone()));
    assert_eq!(reopened.list_teams(f.tournament.id).unwrap(), vec![f.a, f.b]);
    let m = reopened.get_match(played.id).unwrap().unwrap();
    assert_eq!(m.scores, vec![GameScore::new(21, 15), GameScore::new(18, 21), GameScore::new(21, 19)]);
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(m.winner_id, played.winner_id);
}

#[test]
fn file_store_starts_empty_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("missing.json")).unwrap();
    assert!(store.list_tournaments().unwrap().is_empty());
}

#[test]
fn file_store_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, b"{ not json").unwrap();
    assert!(JsonFileStore::open(&path).is_err());
}
