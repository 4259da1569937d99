//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{body::Bytes, extract::{Path, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(%exam_id))]
pub async fn http_start_exam(
  State(state): State<Arc<AppState>>,
  Path(exam_id): Path<String>,
) -> ApiResult<Json<StartExamOut>> {
  let out = start_exam(&state, &exam_id).await?;
  info!(target: "exam", %exam_id, attempt_id = %out.attempt_id, "HTTP exam started");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(%exam_id, attempt_id = %body.attempt_id, answers = body.answers.len()))]
pub async fn http_submit_exam(
  State(state): State<Arc<AppState>>,
  Path(exam_id): Path<String>,
  Json(body): Json<SubmitExamIn>,
) -> ApiResult<Json<ExamResultOut>> {
  let out = submit_exam(&state, &exam_id, &body.attempt_id, &body.answers).await?;
  info!(target: "exam", %exam_id, attempt_id = %body.attempt_id, pass = out.pass, score = %format!("{:.1}", out.percentage), "HTTP exam submitted");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%exam_id))]
pub async fn http_exam_bias(
  State(state): State<Arc<AppState>>,
  Path(exam_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
  Ok(Json(exam_bias(&state, &exam_id).await?))
}

/// An empty body distributes the stored pool. Anything else must be a valid
/// `AssignIn`, with or without a JSON content type.
#[instrument(level = "info", skip(state, body), fields(body_len = body.len()))]
pub async fn http_assign_concepts(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> ApiResult<Json<AssignOut>> {
  let items = parse_assign_body(&body)?.concepts;
  let out = assign_concepts(&state, items).await?;
  info!(target: "concepts", total = out.coverage.total_items, shortfalls = out.shortfalls.len(), "HTTP concepts assigned");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%level))]
pub async fn http_level_concepts(
  State(state): State<Arc<AppState>>,
  Path(level): Path<u32>,
) -> ApiResult<Json<LevelOut>> {
  Ok(Json(level_concepts(&state, level).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_coverage(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
  Ok(Json(current_coverage(&state).await?))
}

fn parse_assign_body(body: &[u8]) -> ApiResult<AssignIn> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(AssignIn::default());
  }
  serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid concept pool: {e}")))
}
