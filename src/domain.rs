//! Domain models used by the backend: exam questions, concept items and their tiers.

use serde::{Deserialize, Serialize};

/// One answer option as authored in the question bank.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionOption {
  pub id: String,
  pub text: String,
}

/// Multiple-choice question. `correct_option_id` must name one of `options`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  #[serde(default)] pub stem: String,
  pub options: Vec<QuestionOption>,
  #[serde(rename = "correctOptionId", alias = "correct_option_id")]
  pub correct_option_id: String,
  #[serde(default, rename = "conceptId", alias = "concept_id")]
  pub concept_id: Option<String>,
  #[serde(default)] pub rationale: Option<String>,
}

/// A level exam: the question set served when a learner starts level `level`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exam {
  pub id: String,
  pub level: u32,
  #[serde(default)] pub title: String,
  pub questions: Vec<Question>,
}

/// Difficulty tier of a concept card.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
  Expert,
}

impl Difficulty {
  pub const ALL: [Difficulty; 4] = [
    Difficulty::Beginner,
    Difficulty::Intermediate,
    Difficulty::Advanced,
    Difficulty::Expert,
  ];

  /// Case-insensitive; anything unrecognised is treated as expert content.
  pub fn parse_lenient(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "beginner" => Difficulty::Beginner,
      "intermediate" => Difficulty::Intermediate,
      "advanced" => Difficulty::Advanced,
      _ => Difficulty::Expert,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Beginner => "beginner",
      Difficulty::Intermediate => "intermediate",
      Difficulty::Advanced => "advanced",
      Difficulty::Expert => "expert",
    }
  }
}

impl From<String> for Difficulty {
  fn from(s: String) -> Self { Difficulty::parse_lenient(&s) }
}

/// Importance of a concept card. Only `High` items recur across levels.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Importance {
  Low,
  #[default]
  Medium,
  High,
}

impl Importance {
  /// Empty means "not set" (medium); unknown values fall to low.
  pub fn parse_lenient(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "high" => Importance::High,
      "medium" | "" => Importance::Medium,
      _ => Importance::Low,
    }
  }
}

impl From<String> for Importance {
  fn from(s: String) -> Self { Importance::parse_lenient(&s) }
}

/// Content item to be spread across levels.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConceptItem {
  pub id: String,
  pub domain: String,
  pub difficulty: Difficulty,
  #[serde(default)] pub importance: Importance,
  #[serde(default)] pub title: Option<String>,
}

impl ConceptItem {
  #[allow(dead_code)]
  pub fn new(id: impl Into<String>, domain: impl Into<String>, difficulty: Difficulty, importance: Importance) -> Self {
    Self { id: id.into(), domain: domain.into(), difficulty, importance, title: None }
  }
}

/// Canonical position label for a zero-based option index: A..Z, then AA, AB, ...
pub fn position_label(index: usize) -> String {
  let mut n = index + 1;
  let mut out = Vec::new();
  while n > 0 {
    let rem = (n - 1) % 26;
    out.push(b'A' + rem as u8);
    n = (n - 1) / 26;
  }
  out.reverse();
  String::from_utf8_lossy(&out).into_owned()
}
