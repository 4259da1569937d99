//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::coverage::CoverageReport;
use crate::distribute::LevelShortfall;
use crate::domain::{ConceptItem, QuestionOption};
use crate::shuffle::{BiasReport, ShuffledQuestion};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartExam {
        #[serde(rename = "examId")]
        exam_id: String,
    },
    SubmitExam {
        #[serde(rename = "examId")]
        exam_id: String,
        #[serde(rename = "attemptId")]
        attempt_id: String,
        answers: Vec<AnswerIn>,
    },
    ExamBias {
        #[serde(rename = "examId")]
        exam_id: String,
    },
    AssignConcepts {
        #[serde(default)]
        concepts: Option<Vec<ConceptItem>>,
    },
    LevelConcepts {
        level: u32,
    },
    Coverage,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    ExamStarted {
        exam: StartExamOut,
    },
    ExamResult {
        result: ExamResultOut,
    },
    Bias {
        report: BiasReport,
    },
    Assignment {
        result: AssignOut,
    },
    Level {
        level: LevelOut,
    },
    Coverage {
        report: CoverageReport,
    },
    Error {
        code: String,
        message: String,
    },
}

/// A question as the learner sees it: labelled options, no answer key.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: String,
    pub stem: String,
    pub options: Vec<QuestionOption>,
}

/// Strip the translation tables and answer key from a shuffled question.
pub fn to_out(q: &ShuffledQuestion) -> QuestionOut {
    QuestionOut {
        id: q.question_id.clone(),
        stem: q.stem.clone(),
        options: q.shuffled_options.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Serialize)]
pub struct StartExamOut {
    #[serde(rename = "attemptId")]
    pub attempt_id: String,
    #[serde(rename = "examId")]
    pub exam_id: String,
    pub level: u32,
    pub title: String,
    pub questions: Vec<QuestionOut>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnswerIn {
    #[serde(rename = "questionId")]
    pub question_id: String,
    /// Label as shown to the learner ("A", "B", ...).
    #[serde(rename = "selectedOptionId")]
    pub selected_option_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitExamIn {
    #[serde(rename = "attemptId")]
    pub attempt_id: String,
    #[serde(default)]
    pub answers: Vec<AnswerIn>,
}

#[derive(Debug, Serialize)]
pub struct QuestionFeedbackOut {
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub selected_label: Option<String>,
    /// Bank option id the selected label translated to.
    pub selected_option_id: Option<String>,
    pub correct: bool,
    pub correct_label: String,
    pub rationale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExamResultOut {
    #[serde(rename = "attemptId")]
    pub attempt_id: String,
    pub correct_count: usize,
    pub total_questions: usize,
    pub percentage: f64,
    pub pass: bool,
    pub feedback: Vec<QuestionFeedbackOut>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignIn {
    #[serde(default)]
    pub concepts: Option<Vec<ConceptItem>>,
}

#[derive(Debug, Serialize)]
pub struct AssignOut {
    pub coverage: CoverageReport,
    pub shortfalls: Vec<LevelShortfall>,
    pub overfull_levels: Vec<u32>,
    pub spilled_items: usize,
    pub late_covered_items: usize,
}

#[derive(Debug, Serialize)]
pub struct LevelOut {
    pub level: u32,
    pub concept_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
