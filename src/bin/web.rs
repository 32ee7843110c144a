//! Single binary web server: REST API for tournaments, teams, matches, live scoring and
//! standings, plus static files.
//! Run with: ADMIN_PIN=1234 cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. See `Config` for the environment variables.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get,
    http::StatusCode,
    middleware::Logger,
    post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, ResponseError,
};
use badminton_tournament_web::{
    compute_standings, generate_league_fixtures, write_standings_csv, AccessError, Config,
    Error, GameOutcome, JsonFileStore, Match, MatchFormat, MatchId, MatchUpdate, MemoryStore,
    PointsTarget, ScoreboardView, ScoringError, ScoringSession, SessionContext, Side, Store,
    StoreError, Team, TeamId, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus, DELETED_TEAM_NAME,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// A match being scored, with its last activity time (for auto-cleanup).
struct LiveEntry {
    scoring: ScoringSession,
    last_activity: Instant,
}

struct AppData {
    store: Arc<dyn Store>,
    config: Config,
    /// Live scoring sessions by match id. Live scores are not persisted.
    live: RwLock<HashMap<MatchId, LiveEntry>>,
}

type AppState = Data<AppData>;

/// Scoring sessions not touched for this long are dropped (completed games are already stored).
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);
const SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Error response: `{ "error": "..." }` with a status per error kind.
#[derive(Debug)]
struct ApiError(Error);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            Error::Tournament(_) => StatusCode::BAD_REQUEST,
            Error::Scoring(ScoringError::MatchCompleted) => StatusCode::CONFLICT,
            Error::Scoring(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Access(AccessError::NotLoggedIn | AccessError::WrongPin) => {
                StatusCode::UNAUTHORIZED
            }
            Error::Access(AccessError::Forbidden) => StatusCode::FORBIDDEN,
            Error::Access(_) | Error::Store(_) | Error::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.0);
        }
        HttpResponse::build(status).json(serde_json::json!({ "error": self.0.to_string() }))
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl From<TournamentError> for ApiError {
    fn from(e: TournamentError) -> Self {
        ApiError(e.into())
    }
}

impl From<ScoringError> for ApiError {
    fn from(e: ScoringError) -> Self {
        ApiError(e.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError(e.into())
    }
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        ApiError(e.into())
    }
}

fn not_found(what: &'static str) -> ApiError {
    ApiError(Error::NotFound(what))
}

type ApiResult = Result<HttpResponse, ApiError>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct LoginBody {
    pin: String,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: TournamentFormat,
}

#[derive(Deserialize)]
struct UpdateTournamentBody {
    name: Option<String>,
    status: Option<TournamentStatus>,
}

#[derive(Deserialize)]
struct TeamBody {
    name: String,
    members: Vec<String>,
}

#[derive(Deserialize)]
struct UpdateTeamBody {
    name: Option<String>,
    members: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMatchBody {
    team1_id: TeamId,
    team2_id: TeamId,
    #[serde(default)]
    format: MatchFormat,
    #[serde(default)]
    points_target: PointsTarget,
    order: Option<u32>,
    #[serde(default)]
    umpire_names: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixturesBody {
    #[serde(default)]
    format: MatchFormat,
    #[serde(default)]
    points_target: PointsTarget,
}

#[derive(Deserialize)]
struct SideBody {
    side: Side,
}

#[derive(Deserialize)]
struct SetScoreBody {
    side: Side,
    value: u32,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TeamPath {
    team_id: TeamId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

/// Match with resolved team names for display.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchView {
    #[serde(flatten)]
    game_match: Match,
    team1_name: String,
    team2_name: String,
}

fn team_name(teams: &[Team], id: TeamId) -> String {
    teams
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| DELETED_TEAM_NAME.to_string())
}

/// Scoreboard after a scoring action, with the outcome of `end_game` and any
/// persistence failure (the in-memory state is kept either way).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoringResponse {
    #[serde(flatten)]
    scoreboard: ScoreboardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<GameOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    persist_error: Option<String>,
}

fn context(session: &Session) -> Result<SessionContext, ApiError> {
    Ok(SessionContext::from_session(session)?)
}

fn load_tournament(store: &dyn Store, id: TournamentId) -> Result<Tournament, ApiError> {
    store.get_tournament(id)?.ok_or_else(|| not_found("Tournament"))
}

fn load_match(store: &dyn Store, id: MatchId) -> Result<Match, ApiError> {
    store.get_match(id)?.ok_or_else(|| not_found("Match"))
}

/// The team must exist and belong to `tournament_id`.
fn ensure_team_in(store: &dyn Store, tournament_id: TournamentId, team_id: TeamId) -> Result<(), ApiError> {
    match store.get_team(team_id)? {
        Some(team) if team.tournament_id == tournament_id => Ok(()),
        Some(_) => Err(TournamentError::TeamNotInTournament(team_id).into()),
        None => Err(not_found("Team")),
    }
}

/// Run a store write on a blocking thread; the file store rewrites its file on every change.
async fn write_store<T, F>(store: &Arc<dyn Store>, write: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn Store) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || write(store.as_ref()))
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
}

/// Write the match after a scoring transition. Failure is logged and reported, never rolled back.
async fn persist(store: &Arc<dyn Store>, game_match: Match) -> Option<String> {
    let id = game_match.id;
    match write_store(store, move |s| s.persist_match(&game_match)).await {
        Ok(()) => None,
        Err(e) => {
            log::warn!("Failed to persist match {}: {}", id, e);
            Some(e.to_string())
        }
    }
}

/// Drop the scoring sessions whose match was deleted.
fn drop_live_sessions(state: &AppData, deleted: impl Fn(&Match) -> bool) -> Result<(), ApiError> {
    let mut live = state.live.write().map_err(|_| StoreError::LockPoisoned)?;
    live.retain(|_, entry| !deleted(entry.scoring.game_match()));
    Ok(())
}

/// Drop sessions idle past [`INACTIVITY_TIMEOUT`]. Returns how many went.
fn sweep_idle_sessions(state: &AppData) -> Result<usize, ApiError> {
    let mut live = state.live.write().map_err(|_| StoreError::LockPoisoned)?;
    let before = live.len();
    live.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
    Ok(before - live.len())
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "badminton-tournament-web",
    })
}

/// Current role of this browser session.
#[get("/api/session")]
async fn api_session(session: Session) -> ApiResult {
    Ok(HttpResponse::Ok().json(context(&session)?))
}

#[post("/api/session/login")]
async fn api_login(state: AppState, session: Session, body: Json<LoginBody>) -> ApiResult {
    let ctx = SessionContext::login(&session, &body.pin, &state.config)?;
    Ok(HttpResponse::Ok().json(ctx))
}

#[post("/api/session/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    SessionContext::logout(&session);
    HttpResponse::Ok().json(SessionContext::anonymous())
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.store.list_tournaments()?))
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, session: Session, body: Json<CreateTournamentBody>) -> ApiResult {
    context(&session)?.require_admin()?;
    let tournament = Tournament::new(body.name.as_str(), body.format)?;
    let saved = tournament.clone();
    write_store(&state.store, move |s| s.save_tournament(&saved)).await?;
    log::info!("Created tournament {} ({})", tournament.id, tournament.name);
    Ok(HttpResponse::Ok().json(tournament))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    Ok(HttpResponse::Ok().json(load_tournament(state.store.as_ref(), path.id)?))
}

#[put("/api/tournaments/{id}")]
async fn api_update_tournament(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<UpdateTournamentBody>,
) -> ApiResult {
    context(&session)?.require_admin()?;
    let mut tournament = load_tournament(state.store.as_ref(), path.id)?;
    let body = body.into_inner();
    if let Some(name) = body.name {
        tournament.rename(name)?;
    }
    if let Some(status) = body.status {
        tournament.set_status(status)?;
    }
    let saved = tournament.clone();
    write_store(&state.store, move |s| s.save_tournament(&saved)).await?;
    Ok(HttpResponse::Ok().json(tournament))
}

/// Delete a tournament with all its teams and matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, session: Session, path: Path<TournamentPath>) -> ApiResult {
    context(&session)?.require_admin()?;
    let id = path.id;
    if !write_store(&state.store, move |s| s.delete_tournament(id)).await? {
        return Err(not_found("Tournament"));
    }
    drop_live_sessions(&state, |m| m.tournament_id == id)?;
    log::info!("Deleted tournament {}", path.id);
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/tournaments/{id}/teams")]
async fn api_list_teams(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    load_tournament(state.store.as_ref(), path.id)?;
    Ok(HttpResponse::Ok().json(state.store.list_teams(path.id)?))
}

#[post("/api/tournaments/{id}/teams")]
async fn api_create_team(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<TeamBody>,
) -> ApiResult {
    context(&session)?.require_admin()?;
    load_tournament(state.store.as_ref(), path.id)?;
    let body = body.into_inner();
    let team = Team::new(path.id, body.name, body.members)?;
    let saved = team.clone();
    write_store(&state.store, move |s| s.save_team(&saved)).await?;
    Ok(HttpResponse::Ok().json(team))
}

#[put("/api/teams/{team_id}")]
async fn api_update_team(
    state: AppState,
    session: Session,
    path: Path<TeamPath>,
    body: Json<UpdateTeamBody>,
) -> ApiResult {
    context(&session)?.require_admin()?;
    let mut team = state
        .store
        .get_team(path.team_id)?
        .ok_or_else(|| not_found("Team"))?;
    let body = body.into_inner();
    if let Some(name) = body.name {
        team.rename(name)?;
    }
    if let Some(members) = body.members {
        team.set_members(members)?;
    }
    let saved = team.clone();
    write_store(&state.store, move |s| s.save_team(&saved)).await?;
    Ok(HttpResponse::Ok().json(team))
}

/// Delete a team. Its matches stay and show it as "Deleted Team".
#[delete("/api/teams/{team_id}")]
async fn api_delete_team(state: AppState, session: Session, path: Path<TeamPath>) -> ApiResult {
    context(&session)?.require_admin()?;
    let team_id = path.team_id;
    if !write_store(&state.store, move |s| s.delete_team(team_id)).await? {
        return Err(not_found("Team"));
    }
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    load_tournament(state.store.as_ref(), path.id)?;
    let teams = state.store.list_teams(path.id)?;
    let views: Vec<MatchView> = state
        .store
        .list_matches(path.id)?
        .into_iter()
        .map(|m| MatchView {
            team1_name: team_name(&teams, m.team1_id),
            team2_name: team_name(&teams, m.team2_id),
            game_match: m,
        })
        .collect();
    Ok(HttpResponse::Ok().json(views))
}

#[post("/api/tournaments/{id}/matches")]
async fn api_create_match(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<CreateMatchBody>,
) -> ApiResult {
    context(&session)?.require_admin()?;
    let store = state.store.as_ref();
    load_tournament(store, path.id)?;
    let body = body.into_inner();
    ensure_team_in(store, path.id, body.team1_id)?;
    ensure_team_in(store, path.id, body.team2_id)?;
    let order = match body.order {
        Some(order) => order,
        None => next_order(store, path.id)?,
    };
    let mut game_match = Match::new(
        path.id,
        body.team1_id,
        body.team2_id,
        body.format,
        body.points_target,
        order,
    )?;
    game_match.set_umpires(body.umpire_names)?;
    let saved = game_match.clone();
    write_store(&state.store, move |s| s.save_match(&saved)).await?;
    Ok(HttpResponse::Ok().json(game_match))
}

/// One past the highest `order` in the tournament.
fn next_order(store: &dyn Store, tournament_id: TournamentId) -> Result<u32, ApiError> {
    Ok(store
        .list_matches(tournament_id)?
        .iter()
        .map(|m| m.order)
        .max()
        .map_or(1, |max| max + 1))
}

/// Round-robin schedule for a League tournament, appended after existing matches.
#[post("/api/tournaments/{id}/fixtures")]
async fn api_generate_fixtures(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<FixturesBody>,
) -> ApiResult {
    context(&session)?.require_admin()?;
    let store = state.store.as_ref();
    let tournament = load_tournament(store, path.id)?;
    let teams = store.list_teams(path.id)?;
    let offset = next_order(store, path.id)? - 1;
    let mut matches = generate_league_fixtures(
        &tournament,
        &teams,
        body.format,
        body.points_target,
        &mut rand::thread_rng(),
    )?;
    for m in &mut matches {
        m.order += offset;
    }
    let matches = write_store(&state.store, move |s| {
        for m in &matches {
            s.save_match(m)?;
        }
        Ok(matches)
    })
    .await?;
    log::info!("Generated {} fixture(s) for tournament {}", matches.len(), tournament.id);
    Ok(HttpResponse::Ok().json(matches))
}

#[put("/api/matches/{match_id}")]
async fn api_update_match(
    state: AppState,
    session: Session,
    path: Path<MatchPath>,
    body: Json<MatchUpdate>,
) -> ApiResult {
    context(&session)?.require_admin()?;
    let store = state.store.as_ref();
    let mut game_match = load_match(store, path.match_id)?;
    let update = body.into_inner();
    for team_id in [update.team1_id, update.team2_id].into_iter().flatten() {
        ensure_team_in(store, game_match.tournament_id, team_id)?;
    }
    // A match being scored is edited through its session, which holds the newest copy
    let live_match = {
        let mut live = state.live.write().map_err(|_| StoreError::LockPoisoned)?;
        match live.get_mut(&path.match_id) {
            Some(entry) => {
                entry.scoring.apply_update(update.clone())?;
                Some(entry.scoring.game_match().clone())
            }
            None => None,
        }
    };
    match live_match {
        Some(m) => game_match = m,
        None => game_match.apply_update(update)?,
    }
    let saved = game_match.clone();
    write_store(&state.store, move |s| s.save_match(&saved)).await?;
    Ok(HttpResponse::Ok().json(game_match))
}

#[delete("/api/matches/{match_id}")]
async fn api_delete_match(state: AppState, session: Session, path: Path<MatchPath>) -> ApiResult {
    context(&session)?.require_admin()?;
    let match_id = path.match_id;
    if !write_store(&state.store, move |s| s.delete_match(match_id)).await? {
        return Err(not_found("Match"));
    }
    drop_live_sessions(&state, |m| m.id == match_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Ranked league table.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    let store = state.store.as_ref();
    load_tournament(store, path.id)?.ensure_league()?;
    let standings = compute_standings(&store.list_teams(path.id)?, &store.list_matches(path.id)?);
    Ok(HttpResponse::Ok().json(standings))
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    let store = state.store.as_ref();
    load_tournament(store, path.id)?.ensure_league()?;
    let standings = compute_standings(&store.list_teams(path.id)?, &store.list_matches(path.id)?);
    let mut body = Vec::new();
    if let Err(e) = write_standings_csv(&standings, &mut body) {
        log::error!("CSV export failed: {}", e);
        return Ok(HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })));
    }
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", "attachment; filename=\"standings.csv\""))
        .body(body))
}

/// Open the scoring view: starts a session (scheduled -> live) or returns the running one.
#[post("/api/matches/{match_id}/scoring")]
async fn api_enter_scoring(state: AppState, session: Session, path: Path<MatchPath>) -> ApiResult {
    context(&session)?.require_scorer()?;
    let (scoreboard, went_live) = {
        let mut live = state.live.write().map_err(|_| StoreError::LockPoisoned)?;
        if let Some(entry) = live.get_mut(&path.match_id) {
            entry.last_activity = Instant::now();
            (entry.scoring.scoreboard(), None)
        } else {
            let scoring = ScoringSession::new(load_match(state.store.as_ref(), path.match_id)?);
            let went_live = scoring.went_live().then(|| scoring.game_match().clone());
            let scoreboard = scoring.scoreboard();
            live.insert(
                path.match_id,
                LiveEntry {
                    scoring,
                    last_activity: Instant::now(),
                },
            );
            (scoreboard, went_live)
        }
    };
    let persist_error = match went_live {
        Some(m) => persist(&state.store, m).await,
        None => None,
    };
    Ok(HttpResponse::Ok().json(ScoringResponse {
        scoreboard,
        outcome: None,
        persist_error,
    }))
}

/// Run a scoring action on the live session of a match.
fn with_scoring<T>(
    state: &AppState,
    match_id: MatchId,
    action: impl FnOnce(&mut ScoringSession) -> Result<T, ScoringError>,
) -> Result<(T, ScoreboardView), ApiError> {
    let mut live = state.live.write().map_err(|_| StoreError::LockPoisoned)?;
    let entry = live
        .get_mut(&match_id)
        .ok_or_else(|| not_found("Scoring session"))?;
    entry.last_activity = Instant::now();
    let result = action(&mut entry.scoring)?;
    Ok((result, entry.scoring.scoreboard()))
}

fn scoreboard_response(scoreboard: ScoreboardView) -> HttpResponse {
    HttpResponse::Ok().json(ScoringResponse {
        scoreboard,
        outcome: None,
        persist_error: None,
    })
}

#[get("/api/matches/{match_id}/scoring")]
async fn api_get_scoring(state: AppState, path: Path<MatchPath>) -> ApiResult {
    let live = state.live.read().map_err(|_| StoreError::LockPoisoned)?;
    let entry = live
        .get(&path.match_id)
        .ok_or_else(|| not_found("Scoring session"))?;
    Ok(scoreboard_response(entry.scoring.scoreboard()))
}

#[post("/api/matches/{match_id}/scoring/add")]
async fn api_add_point(state: AppState, session: Session, path: Path<MatchPath>, body: Json<SideBody>) -> ApiResult {
    context(&session)?.require_scorer()?;
    let ((), scoreboard) = with_scoring(&state, path.match_id, |s| s.add_point(body.side))?;
    Ok(scoreboard_response(scoreboard))
}

#[post("/api/matches/{match_id}/scoring/remove")]
async fn api_remove_point(state: AppState, session: Session, path: Path<MatchPath>, body: Json<SideBody>) -> ApiResult {
    context(&session)?.require_scorer()?;
    let ((), scoreboard) = with_scoring(&state, path.match_id, |s| s.remove_point(body.side))?;
    Ok(scoreboard_response(scoreboard))
}

#[put("/api/matches/{match_id}/scoring/score")]
async fn api_set_score(state: AppState, session: Session, path: Path<MatchPath>, body: Json<SetScoreBody>) -> ApiResult {
    context(&session)?.require_scorer()?;
    let ((), scoreboard) =
        with_scoring(&state, path.match_id, |s| s.set_score(body.side, body.value))?;
    Ok(scoreboard_response(scoreboard))
}

#[post("/api/matches/{match_id}/scoring/undo")]
async fn api_undo(state: AppState, session: Session, path: Path<MatchPath>) -> ApiResult {
    context(&session)?.require_scorer()?;
    let ((), scoreboard) = with_scoring(&state, path.match_id, |s| s.undo())?;
    Ok(scoreboard_response(scoreboard))
}

/// End the current game and persist the match.
#[post("/api/matches/{match_id}/scoring/end-game")]
async fn api_end_game(state: AppState, session: Session, path: Path<MatchPath>) -> ApiResult {
    context(&session)?.require_scorer()?;
    let (outcome, scoreboard) = with_scoring(&state, path.match_id, |s| s.end_game())?;
    let persist_error = persist(&state.store, scoreboard.game_match.clone()).await;
    Ok(HttpResponse::Ok().json(ScoringResponse {
        scoreboard,
        outcome: Some(outcome),
        persist_error,
    }))
}

fn open_store(config: &Config) -> Result<Arc<dyn Store>, StoreError> {
    let store: Arc<dyn Store> = match &config.data_file {
        Some(path) => Arc::new(JsonFileStore::open(path)?),
        None => {
            log::warn!("DATA_FILE not set; records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let store = open_store(&config).map_err(std::io::Error::other)?;
    let session_key = match &config.session_key {
        Some(bytes) => Key::from(bytes),
        None => {
            log::warn!("SESSION_KEY not set; logins will not survive a restart");
            Key::generate()
        }
    };

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let static_dir = config.static_dir.clone();
    let state = Data::new(AppData {
        store,
        config,
        live: RwLock::new(HashMap::new()),
    });

    let sweeper = state.clone();
    actix_web::rt::spawn(async move {
        let mut every = actix_web::rt::time::interval(SWEEP_INTERVAL);
        loop {
            every.tick().await;
            match sweep_idle_sessions(&sweeper) {
                Ok(0) => {}
                Ok(n) => log::info!("Dropped {} idle scoring session(s)", n),
                Err(e) => log::error!("Idle session sweep failed: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(state.clone())
            .service(api_health)
            .service(api_session)
            .service(api_login)
            .service(api_logout)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_update_tournament)
            .service(api_delete_tournament)
            .service(api_list_teams)
            .service(api_create_team)
            .service(api_update_team)
            .service(api_delete_team)
            .service(api_list_matches)
            .service(api_create_match)
            .service(api_generate_fixtures)
            .service(api_update_match)
            .service(api_delete_match)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_enter_scoring)
            .service(api_get_scoring)
            .service(api_add_point)
            .service(api_remove_point)
            .service(api_set_score)
            .service(api_undo)
            .service(api_end_game)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind(bind)?
    .run()
    .await
}
