//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use readflow_core::domain::{
    Goal, GoalPeriod, GoalUnit, ReadingInsight, ReadingPassage, ReadingSession, SessionKind,
};
use readflow_core::practice::{self, SpeedTest};
use readflow_core::tracker::TimerMode;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// How many trailing sessions are summarized for insight generation.
const INSIGHT_SESSION_WINDOW: usize = 10;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_stats_handler,
        list_sessions_handler,
        save_session_handler,
        stop_timer_handler,
        list_goals_handler,
        create_goal_handler,
        toggle_goal_handler,
        delete_goal_handler,
        update_wpm_handler,
        list_activities_handler,
        list_badges_handler,
        get_syllabus_handler,
        syllabus_progress_handler,
        toggle_chapter_handler,
        add_chapter_handler,
        delete_chapter_handler,
        reset_syllabus_handler,
        get_schedule_handler,
        cycle_schedule_handler,
        set_buffer_handler,
        start_practice_handler,
        begin_practice_handler,
        finish_practice_handler,
        save_practice_handler,
        manual_log_handler,
        get_insights_handler,
    ),
    components(
        schemas(StartPracticeRequest, ManualLogRequest, AddChapterRequest, BufferRequest, UpdateWpmRequest)
    ),
    tags(
        (name = "Readflow API", description = "API endpoints for the reading habit tracker.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request Payload Structs
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSessionRequest {
    pub duration_seconds: u32,
    #[serde(default)]
    pub wpm: u32,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    #[serde(default)]
    pub passage_title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimerRequest {
    pub elapsed_seconds: u32,
    pub mode: TimerMode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: String,
    pub target: u32,
    pub unit: GoalUnit,
    pub period: GoalPeriod,
    #[serde(default)]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

/// Topic to generate a speed-test passage about.
#[derive(Deserialize, ToSchema)]
pub struct StartPracticeRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

/// A manually logged reading session: whole minutes and pages read.
#[derive(Deserialize, ToSchema)]
pub struct ManualLogRequest {
    pub minutes: u32,
    pub pages: u32,
    #[serde(default)]
    pub subject: Option<String>,
}

/// Title for a user-added syllabus chapter.
#[derive(Deserialize, ToSchema)]
pub struct AddChapterRequest {
    pub title: String,
}

/// Whether today is a buffer (rest) day.
#[derive(Deserialize, ToSchema)]
pub struct BufferRequest {
    pub enabled: bool,
}

/// A manually entered reading speed.
#[derive(Deserialize, ToSchema)]
pub struct UpdateWpmRequest {
    pub wpm: u32,
}

//=========================================================================================
// Stats & Sessions
//=========================================================================================

/// Current stat counters, today's derived stats, and the next level threshold.
#[utoipa::path(
    get,
    path = "/stats",
    responses((status = 200, description = "Stats and derived values"))
)]
pub async fn get_stats_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let tracker = app_state.tracker.lock().await;
    Json(json!({
        "stats": tracker.stats(),
        "today": tracker.today_stats(),
        "nextLevelXp": tracker.next_level_xp(),
    }))
}

/// The full session log, in insertion order.
#[utoipa::path(
    get,
    path = "/sessions",
    responses((status = 200, description = "All recorded sessions"))
)]
pub async fn list_sessions_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let tracker = app_state.tracker.lock().await;
    Json(json!(tracker.sessions()))
}

/// Record a finished session directly.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body(content_type = "application/json", description = "The session to record."),
    responses(
        (status = 201, description = "Session recorded"),
    )
)]
pub async fn save_session_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SaveSessionRequest>,
) -> impl IntoResponse {
    let session = ReadingSession {
        id: Uuid::new_v4(),
        date: Utc::now(),
        duration_seconds: payload.duration_seconds,
        wpm: payload.wpm,
        pages: payload.pages,
        kind: payload.kind,
        passage_title: payload.passage_title,
        subject: payload.subject,
    };
    let mut tracker = app_state.tracker.lock().await;
    let feedback = tracker.save_session(session.clone()).await;
    (
        StatusCode::CREATED,
        Json(json!({ "session": session, "feedback": feedback })),
    )
}

/// Land an active reading/writing timer.
///
/// A zero-length run records nothing; otherwise the elapsed time becomes a
/// session and, in reading mode, feeds every minutes-unit goal.
#[utoipa::path(
    post,
    path = "/timer/stop",
    request_body(content_type = "application/json", description = "Elapsed seconds and timer mode."),
    responses((status = 200, description = "Timer landed"))
)]
pub async fn stop_timer_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<StopTimerRequest>,
) -> impl IntoResponse {
    let mut tracker = app_state.tracker.lock().await;
    let feedback = tracker
        .stop_timer(payload.elapsed_seconds, payload.mode)
        .await;
    Json(json!({ "recorded": feedback.is_some(), "feedback": feedback }))
}

/// Manually overwrite the current reading speed.
#[utoipa::path(
    post,
    path = "/stats/wpm",
    request_body = UpdateWpmRequest,
    responses((status = 200, description = "Reading speed updated"))
)]
pub async fn update_wpm_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UpdateWpmRequest>,
) -> impl IntoResponse {
    let mut tracker = app_state.tracker.lock().await;
    let feedback = tracker.set_current_wpm(payload.wpm).await;
    Json(json!({ "stats": tracker.stats(), "feedback": feedback }))
}

//=========================================================================================
// Goals
//=========================================================================================

/// All goals.
#[utoipa::path(
    get,
    path = "/goals",
    responses((status = 200, description = "All goals"))
)]
pub async fn list_goals_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let tracker = app_state.tracker.lock().await;
    Json(json!(tracker.goals()))
}

/// Create a goal.
#[utoipa::path(
    post,
    path = "/goals",
    request_body(content_type = "application/json", description = "The goal to create."),
    responses(
        (status = 201, description = "Goal created"),
        (status = 422, description = "Target must be positive")
    )
)]
pub async fn create_goal_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if payload.target == 0 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Goal target must be positive".to_string(),
        ));
    }

    let goal = Goal {
        id: Uuid::new_v4(),
        title: payload.title,
        target: payload.target,
        current: 0,
        unit: payload.unit,
        period: payload.period,
        completed: false,
        reminder_time: payload.reminder_time,
        subject: payload.subject,
    };
    let mut tracker = app_state.tracker.lock().await;
    let feedback = tracker.add_goal(goal.clone()).await;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "goal": goal, "feedback": feedback })),
    ))
}

/// Flip a goal's completion state.
#[utoipa::path(
    post,
    path = "/goals/{id}/toggle",
    params(("id" = Uuid, Path, description = "The goal to toggle.")),
    responses(
        (status = 200, description = "Goal toggled"),
        (status = 404, description = "No such goal")
    )
)]
pub async fn toggle_goal_handler(
    Path(id): Path<Uuid>,
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut tracker = app_state.tracker.lock().await;
    match tracker.toggle_goal(id).await {
        Some(feedback) => {
            let goal = tracker.goals().iter().find(|g| g.id == id).cloned();
            Ok(Json(json!({ "goal": goal, "feedback": feedback })))
        }
        None => Err((StatusCode::NOT_FOUND, "No such goal".to_string())),
    }
}

/// Delete a goal.
#[utoipa::path(
    delete,
    path = "/goals/{id}",
    params(("id" = Uuid, Path, description = "The goal to delete.")),
    responses((status = 204, description = "Goal deleted"))
)]
pub async fn delete_goal_handler(
    Path(id): Path<Uuid>,
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let mut tracker = app_state.tracker.lock().await;
    tracker.delete_goal(id).await;
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Activities & Badges
//=========================================================================================

/// The activity feed, newest first.
#[utoipa::path(
    get,
    path = "/activities",
    responses((status = 200, description = "Activity feed"))
)]
pub async fn list_activities_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let tracker = app_state.tracker.lock().await;
    Json(json!(tracker.activities()))
}

/// All badges with their unlock state.
#[utoipa::path(
    get,
    path = "/badges",
    responses((status = 200, description = "Badge list"))
)]
pub async fn list_badges_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let tracker = app_state.tracker.lock().await;
    Json(json!(tracker.badges()))
}

//=========================================================================================
// Syllabus
//=========================================================================================

/// The whole curriculum tree with per-chapter progress.
#[utoipa::path(
    get,
    path = "/syllabus",
    responses((status = 200, description = "The syllabus"))
)]
pub async fn get_syllabus_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let tracker = app_state.tracker.lock().await;
    Json(json!(tracker.syllabus()))
}

/// Aggregate progress: overall and per subject.
#[utoipa::path(
    get,
    path = "/syllabus/progress",
    responses((status = 200, description = "Progress percentages"))
)]
pub async fn syllabus_progress_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let tracker = app_state.tracker.lock().await;
    let syllabus = tracker.syllabus();
    let subjects: Vec<_> = syllabus
        .subjects
        .iter()
        .enumerate()
        .map(|(i, subject)| {
            json!({
                "name": subject.name,
                "color": subject.color,
                "completed": subject.chapters.iter().filter(|c| c.is_completed).count(),
                "total": subject.chapters.len(),
                "percent": syllabus.subject_progress(i),
                "weeklyTargetPercent": syllabus.weekly_target_progress(i),
            })
        })
        .collect();
    Json(json!({
        "overallPercent": syllabus.overall_progress(),
        "weeklyChapterTarget": readflow_core::syllabus::WEEKLY_CHAPTER_TARGET,
        "subjects": subjects,
    }))
}

/// Advance a chapter around the not-started → in-progress → completed cycle.
#[utoipa::path(
    post,
    path = "/syllabus/subjects/{index}/chapters/{id}/toggle",
    params(
        ("index" = usize, Path, description = "Subject index."),
        ("id" = String, Path, description = "Chapter id.")
    ),
    responses(
        (status = 200, description = "Chapter toggled"),
        (status = 404, description = "No such subject or chapter")
    )
)]
pub async fn toggle_chapter_handler(
    Path((index, id)): Path<(usize, String)>,
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut tracker = app_state.tracker.lock().await;
    let known = tracker
        .syllabus()
        .subjects
        .get(index)
        .map(|s| s.chapters.iter().any(|c| c.id == id))
        .unwrap_or(false);
    if !known {
        return Err((StatusCode::NOT_FOUND, "No such chapter".to_string()));
    }

    tracker.toggle_chapter(index, &id).await;
    let chapter = tracker.syllabus().subjects[index]
        .chapters
        .iter()
        .find(|c| c.id == id)
        .cloned();
    Ok(Json(json!({ "chapter": chapter })))
}

/// Append a custom chapter to a subject.
#[utoipa::path(
    post,
    path = "/syllabus/subjects/{index}/chapters",
    params(("index" = usize, Path, description = "Subject index.")),
    request_body = AddChapterRequest,
    responses(
        (status = 201, description = "Chapter added"),
        (status = 404, description = "No such subject"),
        (status = 422, description = "Empty title")
    )
)]
pub async fn add_chapter_handler(
    Path(index): Path<usize>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<AddChapterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut tracker = app_state.tracker.lock().await;
    if tracker.syllabus().subjects.get(index).is_none() {
        return Err((StatusCode::NOT_FOUND, "No such subject".to_string()));
    }
    match tracker.add_chapter(index, &payload.title).await {
        Some(chapter) => Ok((StatusCode::CREATED, Json(json!({ "chapter": chapter })))),
        None => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Chapter title must not be empty".to_string(),
        )),
    }
}

/// Remove a chapter.
#[utoipa::path(
    delete,
    path = "/syllabus/subjects/{index}/chapters/{id}",
    params(
        ("index" = usize, Path, description = "Subject index."),
        ("id" = String, Path, description = "Chapter id.")
    ),
    responses(
        (status = 204, description = "Chapter removed"),
        (status = 404, description = "No such subject or chapter")
    )
)]
pub async fn delete_chapter_handler(
    Path((index, id)): Path<(usize, String)>,
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut tracker = app_state.tracker.lock().await;
    if tracker.delete_chapter(index, &id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "No such chapter".to_string()))
    }
}

/// Clear all chapter progress. The confirmation prompt belongs to the client.
#[utoipa::path(
    post,
    path = "/syllabus/reset",
    responses((status = 204, description = "All progress cleared"))
)]
pub async fn reset_syllabus_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut tracker = app_state.tracker.lock().await;
    tracker.reset_syllabus().await;
    StatusCode::NO_CONTENT
}

/// Today's study recommendation.
#[utoipa::path(
    get,
    path = "/syllabus/schedule",
    responses((status = 200, description = "Schedule recommendation"))
)]
pub async fn get_schedule_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let tracker = app_state.tracker.lock().await;
    Json(json!(tracker.today_schedule()))
}

/// Cycle the schedule override: buffer → first subject → ... → auto.
#[utoipa::path(
    post,
    path = "/syllabus/schedule/cycle",
    responses((status = 200, description = "New schedule recommendation"))
)]
pub async fn cycle_schedule_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut tracker = app_state.tracker.lock().await;
    tracker.cycle_schedule().await;
    Json(json!(tracker.today_schedule()))
}

/// Switch buffer (rest) mode on or off.
#[utoipa::path(
    post,
    path = "/syllabus/schedule/buffer",
    request_body = BufferRequest,
    responses((status = 200, description = "New schedule recommendation"))
)]
pub async fn set_buffer_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<BufferRequest>,
) -> impl IntoResponse {
    let mut tracker = app_state.tracker.lock().await;
    tracker.set_buffer_day(payload.enabled).await;
    Json(json!(tracker.today_schedule()))
}

//=========================================================================================
// Practice
//=========================================================================================

async fn fetch_passage(app_state: &AppState, topic: &str) -> ReadingPassage {
    match &app_state.passage_adapter {
        Some(adapter) => match adapter.generate_passage(topic).await {
            Ok(passage) => passage,
            Err(e) => {
                warn!(error = %e, "passage generation failed, serving fallback");
                ReadingPassage::fallback()
            }
        },
        None => ReadingPassage::fallback(),
    }
}

/// Fetch a passage and arm a speed-test attempt.
#[utoipa::path(
    post,
    path = "/practice/start",
    request_body = StartPracticeRequest,
    responses((status = 200, description = "Passage ready"))
)]
pub async fn start_practice_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<StartPracticeRequest>,
) -> impl IntoResponse {
    let topic = payload
        .topic
        .unwrap_or_else(|| "general knowledge".to_string());
    let passage = fetch_passage(&app_state, &topic).await;

    let mut practice = app_state.practice.lock().await;
    *practice = Some(SpeedTest::ready(passage.clone(), topic));
    Json(json!({ "passage": passage, "topics": practice::TOPICS }))
}

/// Start the stopwatch on the armed attempt.
#[utoipa::path(
    post,
    path = "/practice/begin",
    responses(
        (status = 200, description = "Reading started"),
        (status = 409, description = "No armed attempt")
    )
)]
pub async fn begin_practice_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut practice = app_state.practice.lock().await;
    match practice.take() {
        Some(attempt) => {
            *practice = Some(attempt.begin(Instant::now()));
            Ok(Json(json!({ "state": "reading" })))
        }
        None => Err((
            StatusCode::CONFLICT,
            "No passage has been fetched".to_string(),
        )),
    }
}

/// Stop the stopwatch and report the measured speed.
#[utoipa::path(
    post,
    path = "/practice/finish",
    responses(
        (status = 200, description = "Attempt finished"),
        (status = 409, description = "No attempt in the reading state")
    )
)]
pub async fn finish_practice_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut practice = app_state.practice.lock().await;
    match practice.take() {
        Some(attempt) => {
            let finished = attempt.finish(Instant::now());
            let response = match (finished.elapsed_seconds(), finished.wpm()) {
                (Some(elapsed), Some(wpm)) => {
                    Json(json!({ "elapsedSeconds": elapsed, "wpm": wpm }))
                }
                _ => {
                    *practice = Some(finished);
                    return Err((
                        StatusCode::CONFLICT,
                        "The attempt has not been started".to_string(),
                    ));
                }
            };
            *practice = Some(finished);
            Ok(response)
        }
        None => Err((
            StatusCode::CONFLICT,
            "No passage has been fetched".to_string(),
        )),
    }
}

/// Record the finished attempt as a speed-test session.
#[utoipa::path(
    post,
    path = "/practice/save",
    responses(
        (status = 201, description = "Session recorded"),
        (status = 409, description = "No finished attempt to save")
    )
)]
pub async fn save_practice_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut practice = app_state.practice.lock().await;
    let attempt = practice.take().ok_or((
        StatusCode::CONFLICT,
        "No passage has been fetched".to_string(),
    ))?;

    match attempt.clone().into_session(Utc::now()) {
        Some(session) => {
            let mut tracker = app_state.tracker.lock().await;
            let feedback = tracker.save_session(session.clone()).await;
            Ok((
                StatusCode::CREATED,
                Json(json!({ "session": session, "feedback": feedback })),
            ))
        }
        None => {
            // Put the unfinished attempt back.
            *practice = Some(attempt);
            Err((
                StatusCode::CONFLICT,
                "The attempt has not been finished".to_string(),
            ))
        }
    }
}

/// Record a manual log: reading time and pages, with speed estimated at
/// 250 words per page.
#[utoipa::path(
    post,
    path = "/practice/manual-log",
    request_body = ManualLogRequest,
    responses(
        (status = 201, description = "Session recorded"),
        (status = 422, description = "Minutes and pages must both be positive")
    )
)]
pub async fn manual_log_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ManualLogRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session =
        practice::manual_log_session(payload.minutes, payload.pages, payload.subject, Utc::now())
            .ok_or((
                StatusCode::UNPROCESSABLE_ENTITY,
                "Minutes and pages must both be positive".to_string(),
            ))?;

    let mut tracker = app_state.tracker.lock().await;
    let feedback = tracker.save_session(session.clone()).await;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "session": session, "feedback": feedback })),
    ))
}

//=========================================================================================
// Insights
//=========================================================================================

/// Insights over the recent session log. An empty log short-circuits to a
/// canned encouragement; generation failures degrade to fixed tips.
#[utoipa::path(
    get,
    path = "/insights",
    responses((status = 200, description = "Reading insights"))
)]
pub async fn get_insights_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let recent: Vec<ReadingSession> = {
        let tracker = app_state.tracker.lock().await;
        tracker.recent_sessions(INSIGHT_SESSION_WINDOW).to_vec()
    };

    if recent.is_empty() {
        return Json(json!(ReadingInsight::first_session_encouragement()));
    }

    let insights = match &app_state.insight_adapter {
        Some(adapter) => match adapter.generate_insights(&recent).await {
            Ok(insights) => insights,
            Err(e) => {
                warn!(error = %e, "insight generation failed, serving fallback");
                ReadingInsight::fallback_tips()
            }
        },
        None => ReadingInsight::fallback_tips(),
    };
    Json(json!(insights))
}
