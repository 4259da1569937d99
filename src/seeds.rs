//! Seed data: a small built-in exam bank and concept pool so the service is
//! usable without a config file.

use crate::domain::{ConceptItem, Difficulty, Exam, Importance, Question, QuestionOption};

macro_rules! concept {
  ($id:expr, $domain:expr, $difficulty:ident, $importance:ident, $title:expr) => {
    ConceptItem {
      id: $id.into(),
      domain: $domain.into(),
      difficulty: Difficulty::$difficulty,
      importance: Importance::$importance,
      title: Some($title.into()),
    }
  };
}

fn question(id: &str, stem: &str, options: [(&str, &str); 4], correct: &str, concept_id: &str) -> Question {
  Question {
    id: id.into(),
    stem: stem.into(),
    options: options
      .iter()
      .map(|(id, text)| QuestionOption { id: (*id).into(), text: (*text).into() })
      .collect(),
    correct_option_id: correct.into(),
    concept_id: Some(concept_id.into()),
    rationale: None,
  }
}

/// Built-in level exams. The authored correct answers lean towards option B,
/// which is exactly what the bias report is there to show.
pub fn seed_exams() -> Vec<Exam> {
  vec![
    Exam {
      id: "exam-l1".into(),
      level: 1,
      title: "Foundations of AI governance".into(),
      questions: vec![
        question(
          "l1-q1",
          "Which role is primarily accountable for how an AI system is used in a given context?",
          [("a", "The model vendor"), ("b", "The deployer"), ("c", "The end user"), ("d", "The regulator")],
          "b",
          "gov-roles",
        ),
        question(
          "l1-q2",
          "What is the main purpose of an AI inventory?",
          [("a", "Licence auditing"), ("b", "Knowing which AI systems exist and who owns them"), ("c", "Cost control"), ("d", "Marketing")],
          "b",
          "gov-inventory",
        ),
        question(
          "l1-q3",
          "Which document typically states an organisation's overall stance on AI use?",
          [("a", "Incident log"), ("b", "AI policy"), ("c", "Model card"), ("d", "Data sheet")],
          "b",
          "gov-policy",
        ),
        question(
          "l1-q4",
          "Risk is usually assessed as a combination of likelihood and ...",
          [("a", "Cost"), ("b", "Latency"), ("c", "Severity"), ("d", "Accuracy")],
          "c",
          "risk-basics",
        ),
      ],
    },
    Exam {
      id: "exam-l2".into(),
      level: 2,
      title: "Risk and impact".into(),
      questions: vec![
        question(
          "l2-q1",
          "Which assessment looks at effects on individuals' rights before deployment?",
          [("a", "Penetration test"), ("b", "Impact assessment"), ("c", "Load test"), ("d", "Code review")],
          "b",
          "risk-impact",
        ),
        question(
          "l2-q2",
          "Human oversight is most important for systems that are ...",
          [("a", "High risk"), ("b", "Open source"), ("c", "Cheap to run"), ("d", "Internal only")],
          "a",
          "oversight",
        ),
        question(
          "l2-q3",
          "Which practice helps detect model drift after release?",
          [("a", "Version pinning"), ("b", "Post-deployment monitoring"), ("c", "Data minimisation"), ("d", "Red teaming only at launch")],
          "b",
          "monitoring",
        ),
        question(
          "l2-q4",
          "A documented record of training data sources supports mainly ...",
          [("a", "Transparency"), ("b", "Throughput"), ("c", "Caching"), ("d", "Pricing")],
          "a",
          "transparency",
        ),
      ],
    },
  ]
}

/// Minimal concept pool spanning all tiers and a few spiral candidates.
pub fn seed_concepts() -> Vec<ConceptItem> {
  vec![
    concept!("gov-roles", "governance", Beginner, High, "Roles: developer, deployer, user"),
    concept!("gov-inventory", "governance", Beginner, Medium, "AI system inventory"),
    concept!("gov-policy", "governance", Beginner, Medium, "Organisational AI policy"),
    concept!("risk-basics", "risk", Beginner, High, "Likelihood and severity"),
    concept!("ai-definitions", "foundations", Beginner, Low, "What counts as an AI system"),
    concept!("ml-lifecycle", "foundations", Beginner, Medium, "ML lifecycle stages"),
    concept!("risk-impact", "risk", Intermediate, High, "Impact assessments"),
    concept!("oversight", "risk", Intermediate, Medium, "Human oversight"),
    concept!("monitoring", "operations", Intermediate, Medium, "Post-deployment monitoring"),
    concept!("transparency", "law", Intermediate, Medium, "Transparency obligations"),
    concept!("data-governance", "data", Intermediate, Medium, "Training data governance"),
    concept!("privacy-by-design", "data", Intermediate, Low, "Privacy by design"),
    concept!("bias-testing", "operations", Intermediate, Medium, "Bias and fairness testing"),
    concept!("vendor-due-diligence", "governance", Intermediate, Low, "Third-party AI due diligence"),
    concept!("eu-ai-act-tiers", "law", Advanced, High, "EU AI Act risk tiers"),
    concept!("conformity-assessment", "law", Advanced, Medium, "Conformity assessment"),
    concept!("incident-response", "operations", Advanced, Medium, "AI incident response"),
    concept!("red-teaming", "operations", Advanced, Low, "Red teaming generative models"),
    concept!("gpai-obligations", "law", Expert, Medium, "General-purpose AI obligations"),
    concept!("cross-border", "law", Expert, Low, "Cross-border regulatory alignment"),
    concept!("board-reporting", "governance", Expert, Medium, "Board-level AI risk reporting"),
  ]
}
