use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tower_http::cors::{Any, CorsLayer};

use super::types::*;
use crate::bookmarks;
use crate::calendar::{self, CalendarClient};
use crate::content::{athkar, hadith, quran};
use crate::habits;
use crate::personalization;
use crate::prayer::PrayerClient;
use crate::progress;
use crate::storage::Storage;

pub struct AppState {
    pub storage: Storage,
    pub calendar: CalendarClient,
    pub prayer: PrayerClient,
    pub hadith: hadith::HadithClient,
}

impl AppState {
    fn new(data_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            storage: Storage::new(data_dir)?,
            calendar: CalendarClient::new(),
            prayer: PrayerClient::new(),
            hadith: hadith::HadithClient::new(),
        })
    }
}

pub async fn run_http_server(host: &str, port: u16, data_dir: PathBuf) -> Result<()> {
    let state = Arc::new(AppState::new(data_dir)?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/personalization/session", post(record_session))
        .route("/api/personalization/sessions", get(recent_sessions))
        .route("/api/personalization/insights", get(behavior_insights))
        .route("/api/personalization/recommendations", get(recommendations))
        .route("/api/personalization/reset", post(personalization_reset))
        .route("/api/habits/daily", get(daily_progress))
        .route("/api/habits/daily/complete", post(complete_daily_task))
        .route("/api/habits/streaks", get(list_streaks))
        .route("/api/habits/streaks/record", post(record_streak_day))
        .route("/api/habits", get(list_habits))
        .route("/api/habits", post(add_habit))
        .route("/api/habits/complete", post(complete_habit))
        .route("/api/habits/{id}", axum::routing::delete(remove_habit))
        .route("/api/challenge", get(get_challenge))
        .route("/api/challenge/join", post(join_challenge))
        .route("/api/challenge/progress", post(record_challenge_day))
        .route("/api/progress", get(progress_snapshot))
        .route("/api/progress/surah", post(record_surah_progress))
        .route("/api/progress/hadith", post(record_hadith_progress))
        .route("/api/progress/dua", post(record_dua_progress))
        .route("/api/calendar/hijri", post(hijri_convert))
        .route("/api/calendar/today", get(hijri_today))
        .route("/api/calendar/events", get(upcoming_events))
        .route("/api/calendar/moon", get(moon_phase))
        .route("/api/prayer/times", post(prayer_times))
        .route("/api/location/resolve", post(resolve_location))
        .route("/api/location/search", get(search_city))
        .route("/api/quran/surahs", get(list_surahs))
        .route("/api/quran/surahs/{number}", get(get_surah))
        .route("/api/quran/search", get(search_surahs))
        .route("/api/hadith/collections", get(hadith_collections))
        .route("/api/hadith/daily", get(daily_hadith))
        .route("/api/athkar", get(athkar_categories))
        .route("/api/athkar/{category}", get(athkar_category))
        .route("/api/dua/daily", get(daily_dua))
        .route("/api/bookmarks", get(list_bookmarks))
        .route("/api/bookmarks", post(add_bookmark))
        .route("/api/bookmarks/{id}", axum::routing::delete(remove_bookmark))
        .route("/api/storage/get", post(storage_get))
        .route("/api/storage/set", post(storage_set))
        .route("/api/storage/reset", post(storage_reset))
        .route("/rpc", post(json_rpc_handler))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run_stdio_server(data_dir: PathBuf) -> Result<()> {
    let state = Arc::new(AppState::new(data_dir)?);

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut stdout = stdout;

    tracing::info!("JSON-RPC server running on stdio");

    loop {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handle_jsonrpc_request(&state, line).await;

        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "ok"
}

fn parse_date_or_today(raw: Option<&str>) -> NaiveDate {
    raw.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Local::now().date_naive())
}

// ========== Personalization ==========

async fn record_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<personalization::RecordSessionRequest>,
) -> impl IntoResponse {
    match personalization::record_session(&state.storage, &request) {
        Ok(session) => (
            StatusCode::OK,
            Json(serde_json::to_value(session).unwrap()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn recent_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    let sessions = personalization::recent_sessions(&state.storage, query.limit.unwrap_or(20));
    (StatusCode::OK, Json(serde_json::to_value(sessions).unwrap()))
}

async fn behavior_insights(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let analysis = personalization::insights(&state.storage);
    (StatusCode::OK, Json(serde_json::to_value(analysis).unwrap()))
}

async fn recommendations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match personalization::recommendations(&state.storage) {
        Ok(ranked) => (StatusCode::OK, Json(serde_json::to_value(ranked).unwrap())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn personalization_reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match personalization::reset(&state.storage) {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"success": true}))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

// ========== Habits ==========

async fn daily_progress(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match habits::daily_progress(&state.storage) {
        Ok(progress) => (
            StatusCode::OK,
            Json(serde_json::to_value(progress).unwrap()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn complete_daily_task(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompleteTaskRequest>,
) -> impl IntoResponse {
    match habits::complete_daily_task(&state.storage, &request.task_id) {
        Ok(progress) => (
            StatusCode::OK,
            Json(serde_json::to_value(progress).unwrap()),
        ),
        Err(habits::HabitsError::NotFound(msg)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": msg})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn list_streaks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match habits::all_streaks(&state.storage) {
        Ok(streaks) => (StatusCode::OK, Json(serde_json::to_value(streaks).unwrap())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn record_streak_day(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordStreakRequest>,
) -> impl IntoResponse {
    match habits::record_streak_day(&state.storage, request.kind) {
        Ok(streak) => (StatusCode::OK, Json(serde_json::to_value(streak).unwrap())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn list_habits(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match habits::list_habits(&state.storage) {
        Ok(habits) => (StatusCode::OK, Json(serde_json::to_value(habits).unwrap())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn add_habit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddHabitRequest>,
) -> impl IntoResponse {
    match habits::add_habit(&state.storage, &request.name, request.kind) {
        Ok(habit) => (StatusCode::OK, Json(serde_json::to_value(habit).unwrap())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn complete_habit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompleteHabitRequest>,
) -> impl IntoResponse {
    match habits::complete_habit(&state.storage, &request.id) {
        Ok(habit) => (StatusCode::OK, Json(serde_json::to_value(habit).unwrap())),
        Err(habits::HabitsError::NotFound(msg)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": msg})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn remove_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match habits::remove_habit(&state.storage, &id) {
        Ok(removed) => (
            StatusCode::OK,
            Json(serde_json::json!({"removed": removed})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn get_challenge(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let challenge = habits::challenge(&state.storage);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "challenge": challenge,
            "percent_complete": challenge.percent_complete(),
        })),
    )
}

async fn join_challenge(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match habits::join_challenge(&state.storage) {
        Ok(challenge) => (
            StatusCode::OK,
            Json(serde_json::to_value(challenge).unwrap()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn record_challenge_day(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match habits::record_challenge_day(&state.storage) {
        Ok(challenge) => (
            StatusCode::OK,
            Json(serde_json::to_value(challenge).unwrap()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

// ========== Learning progress ==========

async fn progress_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let history = progress::snapshot(&state.storage);
    (StatusCode::OK, Json(serde_json::to_value(history).unwrap()))
}

async fn record_surah_progress(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SurahProgressRequest>,
) -> impl IntoResponse {
    match progress::record_surah(&state.storage, request.surah_number, request.percent) {
        Ok(history) => (StatusCode::OK, Json(serde_json::to_value(history).unwrap())),
        Err(progress::ProgressError::InvalidSurah(n)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("invalid surah number: {}", n)})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn record_hadith_progress(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HadithProgressRequest>,
) -> impl IntoResponse {
    match progress::record_hadith(&state.storage, &request.collection) {
        Ok(history) => (StatusCode::OK, Json(serde_json::to_value(history).unwrap())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn record_dua_progress(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DuaProgressRequest>,
) -> impl IntoResponse {
    match progress::record_dua(&state.storage, &request.category) {
        Ok(history) => (StatusCode::OK, Json(serde_json::to_value(history).unwrap())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

// ========== Calendar ==========

async fn hijri_convert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HijriRequest>,
) -> impl IntoResponse {
    let date = parse_date_or_today(request.date.as_deref());
    let conversion = state.calendar.gregorian_to_hijri(date).await;
    (
        StatusCode::OK,
        Json(serde_json::to_value(conversion).unwrap()),
    )
}

async fn hijri_today(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let conversion = state.calendar.today_hijri().await;
    (
        StatusCode::OK,
        Json(serde_json::to_value(conversion).unwrap()),
    )
}

async fn upcoming_events(Query(query): Query<LimitQuery>) -> impl IntoResponse {
    let events = calendar::upcoming_events(Local::now().date_naive(), query.limit.unwrap_or(5));
    (StatusCode::OK, Json(serde_json::to_value(events).unwrap()))
}

async fn moon_phase(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let phase = state.calendar.moon_phase().await;
    (StatusCode::OK, Json(serde_json::to_value(phase).unwrap()))
}

// ========== Prayer times & location ==========

async fn prayer_times(
    State(state): State<Arc<AppState>>,
    Json(request): Json<crate::prayer::PrayerTimesRequest>,
) -> impl IntoResponse {
    let response = state.prayer.times(&request).await;
    (StatusCode::OK, Json(serde_json::to_value(response).unwrap()))
}

async fn resolve_location(
    State(state): State<Arc<AppState>>,
    Json(request): Json<crate::prayer::LocationRequest>,
) -> impl IntoResponse {
    let location = state.prayer.resolve_location(&request).await;
    (StatusCode::OK, Json(serde_json::to_value(location).unwrap()))
}

async fn search_city(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    match state.prayer.geocode_city(&query.q).await {
        Ok(location) => (StatusCode::OK, Json(serde_json::to_value(location).unwrap())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

// ========== Content catalogs ==========

async fn list_surahs() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::to_value(quran::all()).unwrap()),
    )
}

async fn get_surah(Path(number): Path<u32>) -> impl IntoResponse {
    match quran::by_number(number) {
        Some(surah) => (StatusCode::OK, Json(serde_json::to_value(surah).unwrap())),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("no surah {}", number)})),
        ),
    }
}

async fn search_surahs(Query(query): Query<SearchQuery>) -> impl IntoResponse {
    let hits = quran::search(&query.q);
    (StatusCode::OK, Json(serde_json::to_value(hits).unwrap()))
}

async fn hadith_collections(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = state.hadith.collections().await;
    (StatusCode::OK, Json(serde_json::to_value(response).unwrap()))
}

async fn daily_hadith() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::to_value(hadith::daily_hadith()).unwrap()),
    )
}

async fn athkar_categories() -> impl IntoResponse {
    let slugs: Vec<&str> = athkar::AthkarCategory::all()
        .iter()
        .map(|c| c.slug())
        .collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({"categories": slugs})),
    )
}

async fn athkar_category(Path(category): Path<String>) -> impl IntoResponse {
    match athkar::AthkarCategory::from_slug(&category) {
        Some(category) => (
            StatusCode::OK,
            Json(serde_json::to_value(athkar::for_category(category)).unwrap()),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("unknown athkar category: {}", category)})),
        ),
    }
}

async fn daily_dua() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::to_value(athkar::daily_dua()).unwrap()),
    )
}

// ========== Bookmarks ==========

async fn list_bookmarks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let bookmarks = bookmarks::list(&state.storage);
    (
        StatusCode::OK,
        Json(serde_json::to_value(bookmarks).unwrap()),
    )
}

async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    Json(request): Json<bookmarks::AddBookmarkRequest>,
) -> impl IntoResponse {
    match bookmarks::add(&state.storage, &request) {
        Ok(bookmark) => (
            StatusCode::OK,
            Json(serde_json::to_value(bookmark).unwrap()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match bookmarks::remove(&state.storage, &id) {
        Ok(removed) => (
            StatusCode::OK,
            Json(serde_json::json!({"removed": removed})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

// ========== Raw storage (opaque UI blobs) ==========

async fn storage_get(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StorageGetRequest>,
) -> impl IntoResponse {
    let value = state.storage.get_raw(&request.key);
    (StatusCode::OK, Json(serde_json::json!({"value": value})))
}

async fn storage_set(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StorageSetRequest>,
) -> impl IntoResponse {
    match state.storage.set_raw(&request.key, &request.value) {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"success": true}))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

async fn storage_reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.storage.reset() {
        Ok(removed) => (
            StatusCode::OK,
            Json(serde_json::json!({"removed": removed})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

// ========== JSON-RPC ==========

async fn json_rpc_handler(State(state): State<Arc<AppState>>, body: String) -> impl IntoResponse {
    let response = handle_jsonrpc_request(&state, &body).await;
    (StatusCode::OK, response)
}

async fn handle_jsonrpc_request(state: &AppState, request: &str) -> String {
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(request);

    match parsed {
        Ok(json) => {
            let method = json.get("method").and_then(|m| m.as_str()).unwrap_or("");
            let params = json
                .get("params")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            let id = json.get("id").cloned().unwrap_or(serde_json::Value::Null);

            let result = dispatch_method(state, method, params).await;

            match result {
                Ok(value) => serde_json::json!({
                    "jsonrpc": "2.0",
                    "result": value,
                    "id": id
                })
                .to_string(),
                Err(e) => serde_json::json!({
                    "jsonrpc": "2.0",
                    "error": {
                        "code": -32000,
                        "message": e.to_string()
                    },
                    "id": id
                })
                .to_string(),
            }
        }
        Err(e) => serde_json::json!({
            "jsonrpc": "2.0",
            "error": {
                "code": -32700,
                "message": format!("Parse error: {}", e)
            },
            "id": null
        })
        .to_string(),
    }
}

async fn dispatch_method(
    state: &AppState,
    method: &str,
    params: serde_json::Value,
) -> Result<serde_json::Value> {
    match method {
        "personalization.record_session" => {
            let request: personalization::RecordSessionRequest = serde_json::from_value(params)?;
            let session = personalization::record_session(&state.storage, &request)?;
            Ok(serde_json::to_value(session)?)
        }
        "personalization.insights" => {
            let analysis = personalization::insights(&state.storage);
            Ok(serde_json::to_value(analysis)?)
        }
        "personalization.recommendations" => {
            let ranked = personalization::recommendations(&state.storage)?;
            Ok(serde_json::to_value(ranked)?)
        }
        "personalization.reset" => {
            personalization::reset(&state.storage)?;
            Ok(serde_json::json!({"success": true}))
        }
        "habits.daily" => {
            let progress = habits::daily_progress(&state.storage)?;
            Ok(serde_json::to_value(progress)?)
        }
        "habits.complete_task" => {
            let request: CompleteTaskRequest = serde_json::from_value(params)?;
            let progress = habits::complete_daily_task(&state.storage, &request.task_id)?;
            Ok(serde_json::to_value(progress)?)
        }
        "habits.streaks" => {
            let streaks = habits::all_streaks(&state.storage)?;
            Ok(serde_json::to_value(streaks)?)
        }
        "habits.record_streak" => {
            let request: RecordStreakRequest = serde_json::from_value(params)?;
            let streak = habits::record_streak_day(&state.storage, request.kind)?;
            Ok(serde_json::to_value(streak)?)
        }
        "progress.snapshot" => {
            let history = progress::snapshot(&state.storage);
            Ok(serde_json::to_value(history)?)
        }
        "progress.record_surah" => {
            let request: SurahProgressRequest = serde_json::from_value(params)?;
            let history =
                progress::record_surah(&state.storage, request.surah_number, request.percent)?;
            Ok(serde_json::to_value(history)?)
        }
        "calendar.to_hijri" => {
            let request: HijriRequest = serde_json::from_value(params)?;
            let date = parse_date_or_today(request.date.as_deref());
            let conversion = state.calendar.gregorian_to_hijri(date).await;
            Ok(serde_json::to_value(conversion)?)
        }
        "calendar.events" => {
            let request: HijriRequest = serde_json::from_value(params)?;
            let date = parse_date_or_today(request.date.as_deref());
            let events = calendar::upcoming_events(date, 5);
            Ok(serde_json::to_value(events)?)
        }
        "calendar.moon_phase" => {
            let phase = state.calendar.moon_phase().await;
            Ok(serde_json::to_value(phase)?)
        }
        "prayer.times" => {
            let request: crate::prayer::PrayerTimesRequest = serde_json::from_value(params)?;
            let response = state.prayer.times(&request).await;
            Ok(serde_json::to_value(response)?)
        }
        "location.resolve" => {
            let request: crate::prayer::LocationRequest = serde_json::from_value(params)?;
            let location = state.prayer.resolve_location(&request).await;
            Ok(serde_json::to_value(location)?)
        }
        "location.search" => {
            let request: CitySearchRequest = serde_json::from_value(params)?;
            let location = state.prayer.geocode_city(&request.query).await?;
            Ok(serde_json::to_value(location)?)
        }
        "hadith.collections" => {
            let response = state.hadith.collections().await;
            Ok(serde_json::to_value(response)?)
        }
        "bookmarks.list" => {
            let bookmarks = bookmarks::list(&state.storage);
            Ok(serde_json::to_value(bookmarks)?)
        }
        "bookmarks.add" => {
            let request: bookmarks::AddBookmarkRequest = serde_json::from_value(params)?;
            let bookmark = bookmarks::add(&state.storage, &request)?;
            Ok(serde_json::to_value(bookmark)?)
        }
        "storage.get" => {
            let request: StorageGetRequest = serde_json::from_value(params)?;
            Ok(serde_json::json!({"value": state.storage.get_raw(&request.key)}))
        }
        "storage.set" => {
            let request: StorageSetRequest = serde_json::from_value(params)?;
            state.storage.set_raw(&request.key, &request.value)?;
            Ok(serde_json::json!({"success": true}))
        }
        "health.check" => Ok(serde_json::Value::String("ok".to_string())),
        _ => {
            anyhow::bail!("Method not found: {}", method)
        }
    }
}
