//! Option shuffling for exam questions.
//!
//! Every presentation of a question gets its own Fisher–Yates permutation of the
//! options, relabelled to canonical positions (A, B, C, ...). The forward and
//! reverse tables let a submitted label be scored against the original option.
//!
//! The bias analysis at the bottom measures the *source* bank: how often each
//! position holds the correct answer before any shuffling.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::Serialize;

use crate::domain::{position_label, Question, QuestionOption};
use crate::error::ShuffleError;

/// Default allowed deviation from the uniform expectation, as a fraction of it.
pub const DEFAULT_BIAS_TOLERANCE: f64 = 0.20;

/// A question as presented once. Never persisted beyond the attempt it belongs to.
#[derive(Clone, Debug, Serialize)]
pub struct ShuffledQuestion {
  pub question_id: String,
  pub stem: String,
  /// Option payloads in presentation order; `id` is the canonical label.
  pub shuffled_options: Vec<QuestionOption>,
  /// original option id -> label
  pub forward_map: BTreeMap<String, String>,
  /// label -> original option id
  pub reverse_map: BTreeMap<String, String>,
  /// Label that now holds the correct option.
  pub correct_option_id: String,
}

impl ShuffledQuestion {
  pub fn original_option_id(&self, label: &str) -> Option<&str> {
    self.reverse_map.get(label).map(String::as_str)
  }

  #[allow(dead_code)]
  pub fn label_for(&self, original_id: &str) -> Option<&str> {
    self.forward_map.get(original_id).map(String::as_str)
  }

  pub fn is_correct(&self, label: &str) -> bool {
    label == self.correct_option_id
  }
}

/// Reject questions that cannot be shuffled without losing their answer key.
pub fn validate_question(question: &Question) -> Result<(), ShuffleError> {
  if question.options.is_empty() {
    return Err(ShuffleError::EmptyOptions { question_id: question.id.clone() });
  }
  let mut seen = HashSet::with_capacity(question.options.len());
  for opt in &question.options {
    if !seen.insert(opt.id.as_str()) {
      return Err(ShuffleError::DuplicateOptionId {
        question_id: question.id.clone(),
        option_id: opt.id.clone(),
      });
    }
  }
  if !seen.contains(question.correct_option_id.as_str()) {
    return Err(ShuffleError::CorrectOptionMissing {
      question_id: question.id.clone(),
      correct_option_id: question.correct_option_id.clone(),
    });
  }
  Ok(())
}

/// Shuffle with the calling thread's generator.
#[allow(dead_code)]
pub fn shuffle_question(question: &Question) -> Result<ShuffledQuestion, ShuffleError> {
  shuffle_question_with(&mut rand::thread_rng(), question)
}

pub fn shuffle_question_with<R: Rng + ?Sized>(rng: &mut R, question: &Question) -> Result<ShuffledQuestion, ShuffleError> {
  validate_question(question)?;

  let mut order: Vec<&QuestionOption> = question.options.iter().collect();
  fisher_yates(rng, &mut order);

  let mut forward_map = BTreeMap::new();
  let mut reverse_map = BTreeMap::new();
  let mut shuffled_options = Vec::with_capacity(order.len());
  for (index, opt) in order.into_iter().enumerate() {
    let label = position_label(index);
    forward_map.insert(opt.id.clone(), label.clone());
    reverse_map.insert(label.clone(), opt.id.clone());
    shuffled_options.push(QuestionOption { id: label, text: opt.text.clone() });
  }

  let correct_option_id = forward_map
    .get(&question.correct_option_id)
    .cloned()
    .ok_or_else(|| ShuffleError::CorrectOptionMissing {
      question_id: question.id.clone(),
      correct_option_id: question.correct_option_id.clone(),
    })?;

  Ok(ShuffledQuestion {
    question_id: question.id.clone(),
    stem: question.stem.clone(),
    shuffled_options,
    forward_map,
    reverse_map,
    correct_option_id,
  })
}

/// Shuffle each question with its own fresh permutation.
pub fn shuffle_all(questions: &[Question]) -> Result<Vec<ShuffledQuestion>, ShuffleError> {
  let mut rng = rand::thread_rng();
  shuffle_all_with(&mut rng, questions)
}

pub fn shuffle_all_with<R: Rng + ?Sized>(rng: &mut R, questions: &[Question]) -> Result<Vec<ShuffledQuestion>, ShuffleError> {
  questions.iter().map(|q| shuffle_question_with(rng, q)).collect()
}

fn fisher_yates<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
  for i in (1..items.len()).rev() {
    let j = rng.gen_range(0..=i);
    items.swap(i, j);
  }
}

/// Per-position tally of where the correct answer sits in the source bank.
#[derive(Clone, Debug, Serialize)]
pub struct BiasReport {
  pub total_questions: usize,
  pub distribution: BTreeMap<String, usize>,
  pub expected: BTreeMap<String, f64>,
  pub flagged_positions: Vec<String>,
  pub is_balanced: bool,
  pub max_share_label: Option<String>,
  pub max_share_percent: f64,
  pub recommendation: String,
}

/// Count correct answers per original position and flag positions whose count
/// differs from the uniform expectation by more than `tolerance * expected`.
///
/// Each question adds `1/len` to the expectation of every position it has, so
/// banks that mix option counts are measured fairly. Questions whose correct
/// option cannot be found are skipped.
pub fn analyze_answer_distribution(questions: &[Question], tolerance: f64) -> BiasReport {
  let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
  let mut expected: BTreeMap<String, f64> = BTreeMap::new();
  let mut total = 0usize;

  for q in questions {
    let Some(pos) = q.options.iter().position(|o| o.id == q.correct_option_id) else {
      continue;
    };
    total += 1;
    let share = 1.0 / q.options.len() as f64;
    for i in 0..q.options.len() {
      let label = position_label(i);
      *expected.entry(label.clone()).or_insert(0.0) += share;
      distribution.entry(label).or_insert(0);
    }
    *distribution.entry(position_label(pos)).or_insert(0) += 1;
  }

  let flagged_positions: Vec<String> = distribution
    .iter()
    .filter(|(label, count)| {
      let exp = expected.get(*label).copied().unwrap_or(0.0);
      (**count as f64 - exp).abs() > tolerance * exp
    })
    .map(|(label, _)| label.clone())
    .collect();

  // Ties resolve to the earliest label.
  let max = distribution
    .iter()
    .fold(None::<(&String, usize)>, |best, (label, &count)| match best {
      Some((_, c)) if c >= count => best,
      _ => Some((label, count)),
    });
  let (max_share_label, max_share_percent) = match max {
    Some((label, count)) if total > 0 => (Some(label.clone()), count as f64 * 100.0 / total as f64),
    _ => (None, 0.0),
  };

  let is_balanced = flagged_positions.is_empty();
  let recommendation = match (&max_share_label, is_balanced) {
    (Some(label), false) => format!(
      "Warning: {:.1}% of answers are option {}. Consider regenerating with more balanced distribution.",
      max_share_percent, label
    ),
    _ => "Answer distribution is balanced.".to_string(),
  };

  BiasReport {
    total_questions: total,
    distribution,
    expected,
    flagged_positions,
    is_balanced,
    max_share_label,
    max_share_percent,
    recommendation,
  }
}
