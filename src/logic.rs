//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Starting an exam attempt (bias check on the bank, fresh shuffle per question)
//!   - Scoring a submission through the attempt's reverse maps
//!   - Running the concept distributor and reporting coverage

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::coverage::{coverage_report, CoverageReport};
use crate::distribute::distribute;
use crate::domain::ConceptItem;
use crate::error::{ApiError, ApiResult};
use crate::protocol::{
    to_out, AnswerIn, AssignOut, ExamResultOut, LevelOut, QuestionFeedbackOut, StartExamOut,
};
use crate::shuffle::{analyze_answer_distribution, shuffle_all, BiasReport};
use crate::state::{AppState, Attempt};

#[instrument(level = "info", skip(state), fields(%exam_id))]
pub async fn start_exam(state: &AppState, exam_id: &str) -> ApiResult<StartExamOut> {
    let exam = state
        .get_exam(exam_id)
        .ok_or_else(|| ApiError::NotFound(format!("exam '{exam_id}'")))?;

    let bias = analyze_answer_distribution(&exam.questions, state.bias_tolerance);
    if bias.is_balanced {
        debug!(target: "exam", %exam_id, distribution = ?bias.distribution, "Answer distribution is balanced");
    } else {
        warn!(target: "exam", %exam_id, distribution = ?bias.distribution, "{}", bias.recommendation);
    }

    let shuffled = shuffle_all(&exam.questions)?;
    let questions = shuffled.iter().map(to_out).collect();
    let attempt_id = Uuid::new_v4().to_string();
    state
        .insert_attempt(Attempt::new(
            attempt_id.clone(),
            exam.id.clone(),
            shuffled.into_iter().map(|q| (q.question_id.clone(), q)).collect(),
        ))
        .await;

    let open_attempts = state.open_attempts().await;
    info!(
        target: "exam",
        %exam_id,
        %attempt_id,
        questions = exam.questions.len(),
        open_attempts,
        "Exam attempt started"
    );
    Ok(StartExamOut {
        attempt_id,
        exam_id: exam.id.clone(),
        level: exam.level,
        title: exam.title.clone(),
        questions,
    })
}

/// Translate each selected label back to the bank option and score it against the
/// bank's answer key. Unanswered questions and unknown labels count as wrong.
#[instrument(level = "info", skip(state, answers), fields(%exam_id, %attempt_id, answers = answers.len()))]
pub async fn submit_exam(state: &AppState, exam_id: &str, attempt_id: &str, answers: &[AnswerIn]) -> ApiResult<ExamResultOut> {
    let exam = state
        .get_exam(exam_id)
        .ok_or_else(|| ApiError::NotFound(format!("exam '{exam_id}'")))?;
    let attempt = state
        .take_attempt(attempt_id, exam_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("open attempt '{attempt_id}' for exam '{exam_id}'")))?;

    let selected: HashMap<&str, &str> = answers
        .iter()
        .map(|a| (a.question_id.as_str(), a.selected_option_id.as_str()))
        .collect();

    let mut feedback = Vec::with_capacity(exam.questions.len());
    for q in &exam.questions {
        let shuffled = attempt
            .questions
            .get(&q.id)
            .ok_or_else(|| ApiError::NotFound(format!("question '{}' in attempt '{attempt_id}'", q.id)))?;
        let label = selected.get(q.id.as_str()).copied();
        let original = label.and_then(|l| shuffled.original_option_id(l));
        let correct = original == Some(q.correct_option_id.as_str());
        debug!(target: "exam", question_id = %q.id, ?label, ?original, correct, "Answer translated");
        feedback.push(QuestionFeedbackOut {
            question_id: q.id.clone(),
            selected_label: label.map(str::to_string),
            selected_option_id: original.map(str::to_string),
            correct,
            correct_label: shuffled.correct_option_id.clone(),
            rationale: q.rationale.clone(),
        });
    }

    let total_questions = feedback.len();
    let correct_count = feedback.iter().filter(|f| f.correct).count();
    let percentage = if total_questions == 0 {
        0.0
    } else {
        correct_count as f64 * 100.0 / total_questions as f64
    };
    let pass = total_questions > 0 && percentage >= state.pass_mark;

    info!(target: "exam", %exam_id, %attempt_id, correct_count, total_questions, pass, "Exam attempt evaluated");
    Ok(ExamResultOut {
        attempt_id: attempt.id,
        correct_count,
        total_questions,
        percentage,
        pass,
        feedback,
    })
}

#[instrument(level = "info", skip(state), fields(%exam_id))]
pub async fn exam_bias(state: &AppState, exam_id: &str) -> ApiResult<BiasReport> {
    let exam = state
        .get_exam(exam_id)
        .ok_or_else(|| ApiError::NotFound(format!("exam '{exam_id}'")))?;
    Ok(analyze_answer_distribution(&exam.questions, state.bias_tolerance))
}

/// Distribute the given pool (which then replaces the stored one) or the stored pool.
#[instrument(level = "info", skip(state, items), fields(supplied = items.as_ref().map(Vec::len)))]
pub async fn assign_concepts(state: &AppState, items: Option<Vec<ConceptItem>>) -> ApiResult<AssignOut> {
    let pool = match items {
        Some(items) => items,
        None => state.concepts().await,
    };
    let distribution = distribute(&pool, &state.policy)?;
    let coverage = coverage_report(&pool, &distribution.assignment, state.policy.band);

    info!(
        target: "concepts",
        total = coverage.total_items,
        assigned = coverage.assigned_items,
        coverage = %format!("{:.2}", coverage.coverage_percentage),
        levels_in_band = coverage.levels_in_band,
        "Concept assignment stored"
    );

    let out = AssignOut {
        coverage,
        shortfalls: distribution.shortfalls.clone(),
        overfull_levels: distribution.overfull_levels.clone(),
        spilled_items: distribution.spilled_items,
        late_covered_items: distribution.late_covered_items,
    };
    state.store_assignment(pool, distribution).await;
    Ok(out)
}

#[instrument(level = "debug", skip(state))]
pub async fn level_concepts(state: &AppState, level: u32) -> ApiResult<LevelOut> {
    if level == 0 || level > state.policy.level_count {
        return Err(ApiError::BadRequest(format!(
            "level {level} outside 1..={}",
            state.policy.level_count
        )));
    }
    let distribution = state
        .distribution()
        .await
        .ok_or_else(|| ApiError::NotFound("no concept assignment computed yet".into()))?;
    let concept_ids = distribution
        .assignment
        .items_at(level)
        .ok_or_else(|| ApiError::NotFound(format!("level {level}")))?
        .to_vec();
    Ok(LevelOut { level, concept_ids })
}

#[instrument(level = "debug", skip(state))]
pub async fn current_coverage(state: &AppState) -> ApiResult<CoverageReport> {
    let (pool, distribution) = state
        .assignment()
        .await
        .ok_or_else(|| ApiError::NotFound("no concept assignment computed yet".into()))?;
    Ok(coverage_report(&pool, &distribution.assignment, state.policy.band))
}
