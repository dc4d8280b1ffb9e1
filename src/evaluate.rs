//! Evaluation orchestrator: pick an engine, never fail.
//!
//! Exactly one scorer's output is used per turn. The model path is taken in
//! model-only mode, or in auto mode when a gateway is configured; any failure
//! on that path (call error, unparsable output, incomplete schema) silently
//! falls back to the rule-based engine. The worst case is a degraded
//! evaluation, always reported with its provenance tag.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::gateway::ChatGateway;
use crate::heuristic::heuristic_score;
use crate::lexicon::Lexicon;
use crate::model_eval::model_score;
use crate::rubric::{FeedbackBundle, ScoreRecord};

/// Conversation difficulty, carried into the evaluation prompt and session
/// metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Korean display label, as shown to the model and in exports.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "쉬움",
            Difficulty::Normal => "보통",
            Difficulty::Hard => "어려움",
        }
    }
}

/// Which engine the orchestrator should prefer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    /// Model path when a gateway is configured, heuristic otherwise.
    #[default]
    Auto,
    /// Model path; still falls back per turn if the attempt is unusable.
    Model,
    /// Rule-based engine only; never calls out.
    Heuristic,
}

/// Which engine actually produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Model,
    Heuristic,
}

/// One turn's evaluation: scores, feedback, weighted total, provenance, and
/// an echo of the text that was scored. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub scores: ScoreRecord,
    pub feedback: FeedbackBundle,
    pub total: f64,
    pub engine: Engine,
    pub evaluated_text: String,
}

impl EvaluationResult {
    fn assemble(
        scores: ScoreRecord,
        feedback: FeedbackBundle,
        engine: Engine,
        text: &str,
    ) -> Self {
        Self {
            total: scores.weighted_total(),
            scores,
            feedback,
            engine,
            evaluated_text: text.to_string(),
        }
    }
}

/// Turn evaluator. Holds the engine-selection policy and the lexicon; one
/// instance serves a whole session (or several).
pub struct Evaluator {
    gateway: Option<Arc<dyn ChatGateway>>,
    model: String,
    mode: EvalMode,
    lexicon: Lexicon,
}

impl Evaluator {
    /// Heuristic-only evaluator: no gateway, no network.
    pub fn heuristic(lexicon: Lexicon) -> Self {
        Self {
            gateway: None,
            model: String::new(),
            mode: EvalMode::Heuristic,
            lexicon,
        }
    }

    /// Evaluator with a model gateway.
    pub fn with_gateway(
        gateway: Arc<dyn ChatGateway>,
        model: impl Into<String>,
        mode: EvalMode,
        lexicon: Lexicon,
    ) -> Self {
        Self {
            gateway: Some(gateway),
            model: model.into(),
            mode,
            lexicon,
        }
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Evaluate one user turn. Never fails: any model-path problem degrades
    /// to the heuristic engine for this turn.
    pub async fn evaluate(
        &self,
        user_text: &str,
        npc_text: &str,
        difficulty: Difficulty,
    ) -> EvaluationResult {
        let use_model = match self.mode {
            EvalMode::Model => true,
            EvalMode::Auto => self.gateway.is_some(),
            EvalMode::Heuristic => false,
        };

        if use_model {
            if let Some(gateway) = &self.gateway {
                match model_score(
                    gateway.as_ref(),
                    &self.model,
                    user_text,
                    npc_text,
                    difficulty.label(),
                    &self.lexicon,
                )
                .await
                {
                    Ok((scores, feedback)) => {
                        debug!(model = %self.model, "model evaluation succeeded");
                        return EvaluationResult::assemble(
                            scores,
                            feedback,
                            Engine::Model,
                            user_text,
                        );
                    }
                    Err(err) => {
                        warn!(error = %err, "model evaluation unusable; falling back to heuristic");
                    }
                }
            } else {
                warn!("model mode requested but no gateway configured; using heuristic");
            }
        }

        let (scores, feedback) = heuristic_score(user_text, &self.lexicon);
        EvaluationResult::assemble(scores, feedback, Engine::Heuristic, user_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{ChatRequest, ChatResponse, ProviderError};
    use std::time::Duration;

    /// Gateway double that replays a canned body (or fails).
    struct CannedGateway {
        body: Result<String, ()>,
    }

    #[async_trait::async_trait]
    impl ChatGateway for CannedGateway {
        async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, ProviderError> {
            match &self.body {
                Ok(content) => Ok(ChatResponse {
                    content: content.clone(),
                    model: req.model,
                    input_tokens: None,
                    output_tokens: None,
                    latency: Duration::from_millis(1),
                }),
                Err(()) => Err(ProviderError::provider("test", "down", true)),
            }
        }
    }

    const VALID_BODY: &str = r#"{"scores":{"공감":8,"호기심":7,"명료성":6,"정중함":9,"레드플래그":0},
        "feedback":{"strengths":["좋은 질문"],"improvements":[],"tip":"계속 이렇게"}}"#;

    fn evaluator(body: Result<String, ()>, mode: EvalMode) -> Evaluator {
        Evaluator::with_gateway(
            Arc::new(CannedGateway { body }),
            "test-model",
            mode,
            Lexicon::korean(),
        )
    }

    #[tokio::test]
    async fn auto_mode_uses_model_when_it_answers() {
        let ev = evaluator(Ok(VALID_BODY.into()), EvalMode::Auto);
        let result = ev.evaluate("안녕하세요", "반가워요", Difficulty::Normal).await;
        assert_eq!(result.engine, Engine::Model);
        assert_eq!(result.scores.empathy, 8.0);
        assert_eq!(result.evaluated_text, "안녕하세요");
        // 8*.25 + 7*.2 + 6*.2 + 9*.2 + (10-0)*.15 = 7.9
        assert_eq!(result.total, 7.9);
    }

    #[tokio::test]
    async fn call_failure_falls_back_to_heuristic() {
        let ev = evaluator(Err(()), EvalMode::Auto);
        let result = ev.evaluate("안녕하세요", "", Difficulty::Normal).await;
        assert_eq!(result.engine, Engine::Heuristic);
    }

    #[tokio::test]
    async fn malformed_body_falls_back_to_heuristic() {
        let ev = evaluator(Ok("not json at all".into()), EvalMode::Model);
        let result = ev.evaluate("안녕하세요", "", Difficulty::Hard).await;
        assert_eq!(result.engine, Engine::Heuristic);
    }

    #[tokio::test]
    async fn heuristic_mode_never_calls_the_model() {
        // A gateway that would succeed is present but must be ignored.
        let ev = evaluator(Ok(VALID_BODY.into()), EvalMode::Heuristic);
        let result = ev.evaluate("야!!", "", Difficulty::Easy).await;
        assert_eq!(result.engine, Engine::Heuristic);
        assert!(result.scores.politeness < 3.0);
    }

    #[tokio::test]
    async fn heuristic_evaluator_without_gateway() {
        let ev = Evaluator::heuristic(Lexicon::korean());
        let result = ev.evaluate("반갑습니다", "", Difficulty::Normal).await;
        assert_eq!(result.engine, Engine::Heuristic);
    }

    #[test]
    fn result_serializes_with_lowercase_engine_tag() {
        let (scores, feedback) = crate::heuristic::heuristic_score("안녕하세요", &Lexicon::korean());
        let result = EvaluationResult::assemble(scores, feedback, Engine::Heuristic, "안녕하세요");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["engine"], "heuristic");
        assert_eq!(json["evaluated_text"], "안녕하세요");
    }
}
