use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::models::{LoadQuery, LoadResponse, SaveRequest, SaveResponse};
use crate::services::SyncService;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/sync", get(load).post(save))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    SyncService::new(state.store.clone()).health().await?;
    Ok(StatusCode::OK)
}

async fn save(
    State(state): State<AppState>,
    req: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let Json(req) = req.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let service = SyncService::new(state.store.clone());
    let id = service.save(req.id, req.data).await?;

    Ok(Json(SaveResponse {
        success: true,
        message: "saved".to_string(),
        id,
    }))
}

async fn load(
    State(state): State<AppState>,
    query: Result<Query<LoadQuery>, QueryRejection>,
) -> Result<Json<LoadResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let service = SyncService::new(state.store.clone());
    let record = service.load(query.id).await?;

    Ok(Json(LoadResponse {
        success: true,
        data: record.data,
        timestamp: record.timestamp,
    }))
}
