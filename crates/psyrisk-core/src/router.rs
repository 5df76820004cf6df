use std::io::Cursor;
use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppError;
use crate::intake::{IntakeLayout, ResponseImporter};
use crate::scoring::{BatchReport, ScoringEngine, ScoringMode};

/// CSV export submitted for scoring.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub csv: String,
    #[serde(default)]
    pub by_unit: bool,
    #[serde(default)]
    pub layout: IntakeLayout,
}

/// Router builder exposing batch scoring over HTTP.
pub fn report_router(engine: Arc<ScoringEngine>) -> Router {
    Router::new()
        .route("/api/v1/reports", post(report_handler))
        .with_state(engine)
}

pub(crate) async fn report_handler(
    State(engine): State<Arc<ScoringEngine>>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let ReportRequest {
        csv,
        by_unit,
        layout,
    } = request;

    let rows =
        ResponseImporter::from_reader(Cursor::new(csv.into_bytes()), &layout, engine.config())?;
    let mode = if by_unit {
        ScoringMode::Unit
    } else {
        ScoringMode::Respondent
    };

    Ok(Json(engine.score_batch(&rows, mode, Utc::now())))
}
