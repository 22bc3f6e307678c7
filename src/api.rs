// 🌐 HTTP API - axum routes over the prediction and activity core
//
// History is read-only; the activity log lives behind a mutex and is replaced
// wholesale with the output of `record` on every accepted activity.

use crate::activity::{convert, parse_quantity, record, Activity, ActivityCategory};
use crate::config::validate_horizon;
use crate::error::CoreError;
use crate::history::MonthlyRecord;
use crate::predictor::{explain_next, forecast, ForecastPoint, Prediction};
use crate::summary::{category_breakdown, latest_summary, CategoryShare, MonthlySummary};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    history: Arc<Vec<MonthlyRecord>>,
    activities: Arc<Mutex<Vec<Activity>>>,
    forecast_months: usize,
}

impl AppState {
    pub fn new(history: Vec<MonthlyRecord>, activities: Vec<Activity>, forecast_months: usize) -> Self {
        AppState {
            history: Arc::new(history),
            activities: Arc::new(Mutex::new(activities)),
            forecast_months,
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    BadRequest(String),
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Core(err) if err.is_validation() => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Core(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => {
                tracing::error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        if status != StatusCode::INTERNAL_SERVER_ERROR {
            tracing::warn!(%status, %message, "rejected request");
        }

        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn lock_activities(state: &AppState) -> Result<std::sync::MutexGuard<'_, Vec<Activity>>, ApiError> {
    state
        .activities
        .lock()
        .map_err(|_| ApiError::Internal("activity log lock poisoned".to_string()))
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub month: Option<u32>,
    pub months: Option<usize>,
}

/// Quantity arrives as the raw text the user typed
#[derive(Debug, Deserialize)]
pub struct NewActivityRequest {
    pub category: String,
    pub quantity: String,
    pub description: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub latest: Option<MonthlySummary>,
    pub categories: Vec<CategoryShare>,
}

fn current_month() -> u32 {
    Local::now().month()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/history - Monthly history
async fn get_history(State(state): State<AppState>) -> ApiResult<Vec<MonthlyRecord>> {
    Ok(Json(ApiResponse::ok(state.history.as_ref().clone())))
}

/// GET /api/prediction?month=M - Next-period estimate with its terms
async fn get_prediction(
    State(state): State<AppState>,
    query: Result<Query<PredictionQuery>, QueryRejection>,
) -> ApiResult<Prediction> {
    let Query(query) = query?;
    let month = query.month.unwrap_or_else(current_month);
    let prediction = explain_next(&state.history, month)?;
    Ok(Json(ApiResponse::ok(prediction)))
}

/// GET /api/forecast?month=M&months=N - Rolling forecast
async fn get_forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> ApiResult<Vec<ForecastPoint>> {
    let Query(query) = query?;
    let month = query.month.unwrap_or_else(current_month);
    let months = validate_horizon(query.months.unwrap_or(state.forecast_months))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let points = forecast(&state.history, month, months)?;
    Ok(Json(ApiResponse::ok(points)))
}

/// GET /api/summary - Latest month and category breakdown
async fn get_summary(State(state): State<AppState>) -> ApiResult<SummaryResponse> {
    let log = lock_activities(&state)?;
    Ok(Json(ApiResponse::ok(SummaryResponse {
        latest: latest_summary(&state.history),
        categories: category_breakdown(&log),
    })))
}

/// GET /api/activities - Recent activities, newest first
async fn get_activities(State(state): State<AppState>) -> ApiResult<Vec<Activity>> {
    let log = lock_activities(&state)?;
    Ok(Json(ApiResponse::ok(log.clone())))
}

/// POST /api/activities - Convert and record an activity
async fn add_activity(
    State(state): State<AppState>,
    request: Result<Json<NewActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Activity>>), ApiError> {
    let Json(request) = request?;
    let category: ActivityCategory = request.category.parse()?;
    let quantity = parse_quantity(&request.quantity)?;
    let date = request.date.unwrap_or_else(|| Local::now().date_naive());

    let activity = convert(category, quantity, &request.description, date)?;

    let mut log = lock_activities(&state)?;
    *log = record(&log, activity.clone());

    tracing::info!(%category, emissions = activity.emissions, log_len = log.len(), "recorded activity");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(activity))))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/history", get(get_history))
        .route("/prediction", get(get_prediction))
        .route("/forecast", get(get_forecast))
        .route("/summary", get(get_summary))
        .route("/activities", get(get_activities).post(add_activity))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

// ============================================================================
// TESTS
// ============================================================================
