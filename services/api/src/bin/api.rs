//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{JsonStoreAdapter, OpenAiInsightAdapter, OpenAiPassageAdapter},
    config::Config,
    error::ApiError,
    web::{rest, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, post},
    Router,
};
use readflow_core::ports::{InsightGenerationService, PassageGenerationService};
use readflow_core::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Store & Load Tracker State ---
    info!("Opening store at {:?}...", config.data_dir);
    let store = Arc::new(JsonStoreAdapter::new(config.data_dir.clone()).await?);
    let tracker = Tracker::load(store).await;
    info!(
        "Tracker state loaded ({} sessions, {} goals).",
        tracker.sessions().len(),
        tracker.goals().len()
    );

    // --- 3. Initialize Content Adapters (optional) ---
    let (passage_adapter, insight_adapter): (
        Option<Arc<dyn PassageGenerationService>>,
        Option<Arc<dyn InsightGenerationService>>,
    ) = match &config.openai_api_key {
        Some(key) => {
            let openai_config = OpenAIConfig::new().with_api_key(key);
            let openai_client = Client::with_config(openai_config);
            (
                Some(Arc::new(OpenAiPassageAdapter::new(
                    openai_client.clone(),
                    config.passage_model.clone(),
                ))),
                Some(Arc::new(OpenAiInsightAdapter::new(
                    openai_client,
                    config.insight_model.clone(),
                ))),
            )
        }
        None => {
            info!("OPENAI_API_KEY not set; passages and insights will use fallbacks.");
            (None, None)
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        tracker: Mutex::new(tracker),
        practice: Mutex::new(None),
        config: config.clone(),
        passage_adapter,
        insight_adapter,
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {e}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/stats", get(rest::get_stats_handler))
        .route("/stats/wpm", post(rest::update_wpm_handler))
        .route(
            "/sessions",
            get(rest::list_sessions_handler).post(rest::save_session_handler),
        )
        .route("/timer/stop", post(rest::stop_timer_handler))
        .route(
            "/goals",
            get(rest::list_goals_handler).post(rest::create_goal_handler),
        )
        .route("/goals/{id}/toggle", post(rest::toggle_goal_handler))
        .route("/goals/{id}", delete(rest::delete_goal_handler))
        .route("/activities", get(rest::list_activities_handler))
        .route("/badges", get(rest::list_badges_handler))
        .route("/syllabus", get(rest::get_syllabus_handler))
        .route("/syllabus/progress", get(rest::syllabus_progress_handler))
        .route("/syllabus/reset", post(rest::reset_syllabus_handler))
        .route(
            "/syllabus/subjects/{index}/chapters",
            post(rest::add_chapter_handler),
        )
        .route(
            "/syllabus/subjects/{index}/chapters/{id}/toggle",
            post(rest::toggle_chapter_handler),
        )
        .route(
            "/syllabus/subjects/{index}/chapters/{id}",
            delete(rest::delete_chapter_handler),
        )
        .route("/syllabus/schedule", get(rest::get_schedule_handler))
        .route("/syllabus/schedule/cycle", post(rest::cycle_schedule_handler))
        .route("/syllabus/schedule/buffer", post(rest::set_buffer_handler))
        .route("/practice/start", post(rest::start_practice_handler))
        .route("/practice/begin", post(rest::begin_practice_handler))
        .route("/practice/finish", post(rest::finish_practice_handler))
        .route("/practice/save", post(rest::save_practice_handler))
        .route("/practice/manual-log", post(rest::manual_log_handler))
        .route("/insights", get(rest::get_insights_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
