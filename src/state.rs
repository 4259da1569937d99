//! Application state: exam bank, open attempts, concept pool and the latest distribution.
//!
//! This module owns:
//!   - the exam bank (from TOML or built-in seeds), fixed after startup
//!   - open attempts with their shuffled questions (discarded at submission)
//!   - the concept pool and the last computed level distribution
//!   - the distribution policy and exam settings
//!
//! Nothing here is persisted; a restart starts from config and seeds again.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::config::{load_config_from_env, PrepConfig};
use crate::distribute::{Distribution, DistributionPolicy};
use crate::domain::{ConceptItem, Exam};
use crate::error::ConfigError;
use crate::seeds::{seed_concepts, seed_exams};
use crate::shuffle::{validate_question, ShuffledQuestion};

/// One presentation of an exam. Holds the per-question translation tables until
/// submission or until it expires.
#[derive(Clone, Debug)]
pub struct Attempt {
    pub id: String,
    pub exam_id: String,
    pub questions: HashMap<String, ShuffledQuestion>,
    pub created_at: Instant,
}

impl Attempt {
    pub fn new(id: String, exam_id: String, questions: HashMap<String, ShuffledQuestion>) -> Self {
        Self { id, exam_id, questions, created_at: Instant::now() }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

/// The concept pool and the distribution computed from it. Always replaced together.
#[derive(Clone, Debug)]
pub struct ConceptStore {
    pub pool: Vec<ConceptItem>,
    pub distribution: Option<Distribution>,
}

#[derive(Clone)]
pub struct AppState {
    pub exams: Arc<HashMap<String, Exam>>,
    pub attempts: Arc<RwLock<HashMap<String, Attempt>>>,
    pub concepts: Arc<RwLock<ConceptStore>>,
    pub policy: DistributionPolicy,
    pub pass_mark: f64,
    pub bias_tolerance: f64,
    pub attempt_ttl: Duration,
}

/// Why a configured exam cannot be served, if it cannot.
fn exam_defect(exam: &Exam) -> Option<String> {
    let mut ids = HashSet::with_capacity(exam.questions.len());
    for q in &exam.questions {
        if let Err(e) = validate_question(q) {
            return Some(e.to_string());
        }
        if !ids.insert(q.id.as_str()) {
            return Some(format!("question id '{}' appears more than once", q.id));
        }
    }
    None
}

impl AppState {
    /// Build state from env: load config, seed banks, validate the policy.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(load_config_from_env())
    }

    /// Broken settings fail startup; broken bank entries are skipped.
    pub fn from_config(cfg_opt: Option<PrepConfig>) -> Result<Self, ConfigError> {
        let cfg = cfg_opt.unwrap_or_default();
        cfg.validate()?;

        let mut exams = HashMap::<String, Exam>::new();
        for exam in cfg.exams {
            if let Some(bad) = exam_defect(&exam) {
                error!(target: "exam", exam_id = %exam.id, error = %bad, "Skipping bank exam: invalid question.");
                continue;
            }
            exams.insert(exam.id.clone(), exam);
        }

        // Always insert built-in exams, but don't overwrite configured ids.
        for exam in seed_exams() {
            exams.entry(exam.id.clone()).or_insert(exam);
        }
        for exam in exams.values() {
            info!(target: "exam", exam_id = %exam.id, level = exam.level, questions = exam.questions.len(), "Startup exam inventory");
        }

        let concepts = if cfg.concepts.is_empty() {
            seed_concepts()
        } else {
            cfg.concepts
        };
        info!(
            target: "concepts",
            concepts = concepts.len(),
            level_count = cfg.distribution.level_count,
            band_min = cfg.distribution.band.min,
            band_max = cfg.distribution.band.max,
            "Startup concept pool"
        );

        Ok(Self {
            exams: Arc::new(exams),
            attempts: Arc::new(RwLock::new(HashMap::new())),
            concepts: Arc::new(RwLock::new(ConceptStore { pool: concepts, distribution: None })),
            policy: cfg.distribution,
            pass_mark: cfg.exam.pass_mark,
            bias_tolerance: cfg.shuffle.bias_tolerance,
            attempt_ttl: Duration::from_secs(cfg.exam.attempt_ttl_secs),
        })
    }

    pub fn get_exam(&self, id: &str) -> Option<&Exam> {
        self.exams.get(id)
    }

    #[instrument(level = "debug", skip(self, attempt), fields(attempt_id = %attempt.id, exam_id = %attempt.exam_id))]
    pub async fn insert_attempt(&self, attempt: Attempt) {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, a| !a.is_expired(self.attempt_ttl));
        let expired = before - attempts.len();
        if expired > 0 {
            debug!(target: "exam", expired, "Dropped expired attempts");
        }
        attempts.insert(attempt.id.clone(), attempt);
    }

    /// Remove and return the attempt if it exists, has not expired and belongs to
    /// `exam_id`. A mismatched attempt stays open.
    #[instrument(level = "debug", skip(self))]
    pub async fn take_attempt(&self, attempt_id: &str, exam_id: &str) -> Option<Attempt> {
        let mut attempts = self.attempts.write().await;
        match attempts.get(attempt_id) {
            Some(a) if a.is_expired(self.attempt_ttl) => {
                debug!(target: "exam", %attempt_id, "Attempt expired");
                attempts.remove(attempt_id);
                None
            }
            Some(a) if a.exam_id == exam_id => attempts.remove(attempt_id),
            Some(a) => {
                debug!(target: "exam", %attempt_id, expected = %exam_id, actual = %a.exam_id, "Attempt belongs to another exam");
                None
            }
            None => None,
        }
    }

    pub async fn open_attempts(&self) -> usize {
        self.attempts.read().await.len()
    }

    pub async fn concepts(&self) -> Vec<ConceptItem> {
        self.concepts.read().await.pool.clone()
    }

    /// Replace the pool and its distribution under one write.
    pub async fn store_assignment(&self, pool: Vec<ConceptItem>, distribution: Distribution) {
        *self.concepts.write().await = ConceptStore { pool, distribution: Some(distribution) };
    }

    pub async fn distribution(&self) -> Option<Distribution> {
        self.concepts.read().await.distribution.clone()
    }

    /// The stored pool with the distribution computed from it, if any.
    pub async fn assignment(&self) -> Option<(Vec<ConceptItem>, Distribution)> {
        let store = self.concepts.read().await;
        store.distribution.clone().map(|d| (store.pool.clone(), d))
    }
}
