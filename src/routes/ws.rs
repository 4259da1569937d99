//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::ApiError;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "aigp_prep_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "aigp_prep_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "aigp_prep_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { code: "BAD_REQUEST".into(), message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "code": "INTERNAL_ERROR", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "aigp_prep_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "aigp_prep_backend", "WebSocket disconnected");
}

fn ws_error(e: ApiError) -> ServerWsMessage {
  ServerWsMessage::Error { code: e.code().into(), message: e.to_string() }
}

#[instrument(level = "info", skip(state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartExam { exam_id } => match start_exam(state, &exam_id).await {
      Ok(exam) => {
        info!(target: "exam", %exam_id, attempt_id = %exam.attempt_id, "WS exam started");
        ServerWsMessage::ExamStarted { exam }
      }
      Err(e) => ws_error(e),
    },

    ClientWsMessage::SubmitExam { exam_id, attempt_id, answers } => {
      match submit_exam(state, &exam_id, &attempt_id, &answers).await {
        Ok(result) => {
          info!(target: "exam", %exam_id, %attempt_id, pass = result.pass, "WS exam submitted");
          ServerWsMessage::ExamResult { result }
        }
        Err(e) => ws_error(e),
      }
    }

    ClientWsMessage::ExamBias { exam_id } => match exam_bias(state, &exam_id).await {
      Ok(report) => ServerWsMessage::Bias { report },
      Err(e) => ws_error(e),
    },

    ClientWsMessage::AssignConcepts { concepts } => match assign_concepts(state, concepts).await {
      Ok(result) => ServerWsMessage::Assignment { result },
      Err(e) => ws_error(e),
    },

    ClientWsMessage::LevelConcepts { level } => match level_concepts(state, level).await {
      Ok(level) => ServerWsMessage::Level { level },
      Err(e) => ws_error(e),
    },

    ClientWsMessage::Coverage => match current_coverage(state).await {
      Ok(report) => ServerWsMessage::Coverage { report },
      Err(e) => ws_error(e),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(json: &str) -> ClientWsMessage {
    serde_json::from_str(json).expect("client message")
  }

  #[tokio::test]
  async fn ws_round_trip_start_and_submit() {
    let state = AppState::from_config(None).expect("state");
    let reply = handle_client_ws(parse(r#"{"type":"start_exam","examId":"exam-l2"}"#), &state).await;
    let ServerWsMessage::ExamStarted { exam } = reply else { panic!("expected exam_started") };

    let submit = serde_json::json!({
      "type": "submit_exam",
      "examId": "exam-l2",
      "attemptId": exam.attempt_id,
      "answers": [{ "questionId": "l2-q1", "selectedOptionId": "A" }],
    });
    let reply = handle_client_ws(parse(&submit.to_string()), &state).await;
    let ServerWsMessage::ExamResult { result } = reply else { panic!("expected exam_result") };
    assert_eq!(result.total_questions, 4);
    assert!(result.correct_count <= 1);
  }

  #[tokio::test]
  async fn ws_errors_carry_codes() {
    let state = AppState::from_config(None).expect("state");
    let reply = handle_client_ws(parse(r#"{"type":"coverage"}"#), &state).await;
    let out = serde_json::to_value(&reply).expect("json");
    assert_eq!(out["type"], "error");
    assert_eq!(out["code"], "NOT_FOUND");

    let reply = handle_client_ws(parse(r#"{"type":"ping"}"#), &state).await;
    assert!(matches!(reply, ServerWsMessage::Pong));
  }
}
