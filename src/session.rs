//! Session bookkeeping and aggregation.
//!
//! The session exclusively owns the ordered turn history; evaluation results
//! are appended once and never mutated. The summary is recomputed from the
//! history on demand rather than maintained incrementally, so it can never go
//! stale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluate::{Difficulty, EvalMode, EvaluationResult};
use crate::lexicon::Lexicon;
use crate::rubric::round2;

/// Run metadata, serialized with the export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMeta {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub model: String,
    pub temperature: f32,
    pub max_rounds: usize,
    pub difficulty: Difficulty,
    pub scenario: String,
    pub eval_mode: EvalMode,
}

impl SessionMeta {
    pub fn new(
        model: impl Into<String>,
        temperature: f32,
        max_rounds: usize,
        difficulty: Difficulty,
        scenario: impl Into<String>,
        eval_mode: EvalMode,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            model: model.into(),
            temperature,
            max_rounds,
            difficulty,
            scenario: scenario.into(),
            eval_mode,
        }
    }
}

/// Whole-session coaching summary, derived from the turn history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Mean of the per-turn weighted totals, 0.0 for an empty session.
    pub avg_total: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub tip: String,
}

impl SessionSummary {
    pub fn empty() -> Self {
        Self {
            avg_total: 0.0,
            strengths: Vec::new(),
            improvements: Vec::new(),
            tip: String::new(),
        }
    }
}

/// Export document: run metadata, the full per-turn history, and the summary.
/// Serializes losslessly to UTF-8 JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    pub meta: SessionMeta,
    pub turns: Vec<EvaluationResult>,
    pub summary: SessionSummary,
}

/// One practice session: metadata plus the append-only turn history.
#[derive(Debug, Clone)]
pub struct Session {
    meta: SessionMeta,
    turns: Vec<EvaluationResult>,
    finished: bool,
}

impl Session {
    pub fn new(meta: SessionMeta) -> Self {
        Self {
            meta,
            turns: Vec::new(),
            finished: false,
        }
    }

    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    pub fn turns(&self) -> &[EvaluationResult] {
        &self.turns
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Append the newest turn's result. Marks the session finished when the
    /// round limit is reached.
    pub fn record_turn(&mut self, result: EvaluationResult) {
        self.turns.push(result);
        if self.turns.len() >= self.meta.max_rounds {
            self.finish();
        }
    }

    /// Mark the session over and stamp the end time.
    pub fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.meta.ended_at = Some(Utc::now());
        }
    }

    /// Recompute the session summary from the full history.
    pub fn summary(&self, lexicon: &Lexicon) -> SessionSummary {
        summarize(&self.turns, &lexicon.feedback.closing_tip)
    }

    /// Build the export document.
    pub fn export(&self, lexicon: &Lexicon) -> SessionExport {
        SessionExport {
            meta: self.meta.clone(),
            turns: self.turns.clone(),
            summary: self.summary(lexicon),
        }
    }
}

/// Fold per-turn results into a session summary.
///
/// Strengths and improvements are concatenated in turn order, deduplicated
/// preserving first occurrence, and capped at three each. The tip is the
/// fixed closing-coaching sentence, not derived from the data.
pub fn summarize(results: &[EvaluationResult], closing_tip: &str) -> SessionSummary {
    if results.is_empty() {
        return SessionSummary::empty();
    }

    let avg_total = round2(results.iter().map(|r| r.total).sum::<f64>() / results.len() as f64);

    let mut strengths: Vec<String> = Vec::new();
    let mut improvements: Vec<String> = Vec::new();
    for result in results {
        for s in &result.feedback.strengths {
            if !strengths.contains(s) {
                strengths.push(s.clone());
            }
        }
        for s in &result.feedback.improvements {
            if !improvements.contains(s) {
                improvements.push(s.clone());
            }
        }
    }
    strengths.truncate(3);
    improvements.truncate(3);

    SessionSummary {
        avg_total,
        strengths,
        improvements,
        tip: closing_tip.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::Engine;
    use crate::rubric::{FeedbackBundle, ScoreRecord};

    fn result(total_seed: f64, strengths: &[&str], improvements: &[&str]) -> EvaluationResult {
        let scores = ScoreRecord::new(total_seed, total_seed, total_seed, total_seed, 0.0);
        EvaluationResult {
            total: scores.weighted_total(),
            scores,
            feedback: FeedbackBundle {
                strengths: strengths.iter().map(|s| s.to_string()).collect(),
                improvements: improvements.iter().map(|s| s.to_string()).collect(),
                tip: "t".into(),
                rewrite_example: None,
            },
            engine: Engine::Heuristic,
            evaluated_text: "text".into(),
        }
    }

    fn meta() -> SessionMeta {
        SessionMeta::new(
            "gemma3:4b",
            0.7,
            3,
            Difficulty::Normal,
            "소개팅",
            EvalMode::Auto,
        )
    }

    #[test]
    fn empty_history_yields_zero_summary() {
        let summary = summarize(&[], "closing");
        assert_eq!(summary.avg_total, 0.0);
        assert!(summary.strengths.is_empty());
        assert!(summary.improvements.is_empty());
        assert!(summary.tip.is_empty());
    }

    #[test]
    fn identical_results_mean_their_own_total() {
        let r = result(6.0, &["s1"], &["i1"]);
        let batch = vec![r.clone(), r.clone(), r.clone()];
        let summary = summarize(&batch, "closing");
        assert_eq!(summary.avg_total, r.total);
        assert_eq!(summary.strengths, vec!["s1"]);
        assert_eq!(summary.improvements, vec!["i1"]);
        assert_eq!(summary.tip, "closing");
    }

    #[test]
    fn dedup_preserves_first_occurrence_order_and_caps() {
        let batch = vec![
            result(5.0, &["a", "b"], &["x"]),
            result(7.0, &["b", "c", "d"], &["x", "y"]),
        ];
        let summary = summarize(&batch, "closing");
        assert_eq!(summary.strengths, vec!["a", "b", "c"]);
        assert_eq!(summary.improvements, vec!["x", "y"]);
    }

    #[test]
    fn session_finishes_at_round_limit() {
        let mut session = Session::new(meta());
        assert!(!session.is_finished());
        for _ in 0..3 {
            session.record_turn(result(5.0, &[], &[]));
        }
        assert!(session.is_finished());
        assert!(session.meta().ended_at.is_some());
        assert_eq!(session.turns().len(), 3);
    }

    #[test]
    fn export_round_trips_through_json() {
        let lexicon = Lexicon::korean();
        let mut session = Session::new(meta());
        session.record_turn(result(8.0, &["강점"], &["개선"]));
        let export = session.export(&lexicon);

        let json = serde_json::to_string(&export).unwrap();
        let back: SessionExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.turns.len(), 1);
        assert_eq!(back.turns[0].feedback.strengths, vec!["강점"]);
        assert_eq!(back.summary, export.summary);
        assert_eq!(back.meta.scenario, "소개팅");
    }

    #[test]
    fn summary_uses_fixed_closing_tip() {
        let lexicon = Lexicon::korean();
        let mut session = Session::new(meta());
        session.record_turn(result(5.0, &[], &[]));
        let summary = session.summary(&lexicon);
        assert_eq!(summary.tip, lexicon.feedback.closing_tip);
    }
}
