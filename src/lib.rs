#![forbid(unsafe_code)]

//! # convo-coach
//!
//! Turn evaluation engine for conversational-practice simulators: each user
//! utterance is scored against a five-dimension rubric (empathy, curiosity,
//! clarity, politeness, red-flag) to produce per-turn and session-level
//! coaching feedback.
//!
//! Two scoring engines share one output schema. The model-assisted path
//! prompts a local chat model and parses its JSON verdict tolerantly; the
//! rule-based path derives scores deterministically from lexical signals.
//! The orchestrator picks one per turn and silently degrades to the
//! rule-based engine whenever the model path is unavailable or unusable.
//! No evaluation ever fails, and every result carries a provenance tag
//! saying which engine produced it.
//!
//! Language-specific keyword tables live in [`lexicon::Lexicon`]; the
//! scoring algorithms themselves are language-agnostic.

pub mod evaluate;
pub mod gateway;
pub mod heuristic;
pub mod lexicon;
pub mod model_eval;
pub mod prompts;
pub mod rubric;
pub mod session;
pub mod signals;

pub use evaluate::{Difficulty, Engine, EvalMode, EvaluationResult, Evaluator};
pub use gateway::{ChatGateway, OllamaAdapter, ProviderError};
pub use heuristic::heuristic_score;
pub use lexicon::Lexicon;
pub use rubric::{FeedbackBundle, RubricDimension, ScoreRecord};
pub use session::{summarize, Session, SessionExport, SessionMeta, SessionSummary};
