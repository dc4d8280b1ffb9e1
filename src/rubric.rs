//! Rubric dimensions, score records, and the weighted total.
//!
//! Five fixed axes score each user utterance. Four are "higher is better";
//! `red_flag` is adverse (higher is worse) and is inverted before weighting.
//! The weights sum to 1.0 so the weighted total stays on the same 0–10 scale
//! as the per-dimension scores.

use serde::{Deserialize, Serialize};

// =============================================================================
// Dimensions
// =============================================================================

/// One axis of the evaluation rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricDimension {
    Empathy,
    Curiosity,
    Clarity,
    Politeness,
    RedFlag,
}

impl RubricDimension {
    /// All dimensions in canonical (display) order.
    pub const ALL: [RubricDimension; 5] = [
        RubricDimension::Empathy,
        RubricDimension::Curiosity,
        RubricDimension::Clarity,
        RubricDimension::Politeness,
        RubricDimension::RedFlag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RubricDimension::Empathy => "empathy",
            RubricDimension::Curiosity => "curiosity",
            RubricDimension::Clarity => "clarity",
            RubricDimension::Politeness => "politeness",
            RubricDimension::RedFlag => "red_flag",
        }
    }

    /// Fixed rubric weight. Sums to 1.0 across [`RubricDimension::ALL`].
    pub fn weight(&self) -> f64 {
        match self {
            RubricDimension::Empathy => 0.25,
            RubricDimension::Curiosity => 0.20,
            RubricDimension::Clarity => 0.20,
            RubricDimension::Politeness => 0.20,
            RubricDimension::RedFlag => 0.15,
        }
    }

    /// Whether a higher raw value indicates worse behaviour.
    pub fn is_adverse(&self) -> bool {
        matches!(self, RubricDimension::RedFlag)
    }
}

// =============================================================================
// Score record
// =============================================================================

/// Per-dimension scores for one utterance, each clamped to [0, 10].
///
/// Every dimension is always present; construction clamps out-of-range
/// values, so a `ScoreRecord` can never violate the bounds invariant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub empathy: f64,
    pub curiosity: f64,
    pub clarity: f64,
    pub politeness: f64,
    pub red_flag: f64,
}

impl ScoreRecord {
    pub fn new(empathy: f64, curiosity: f64, clarity: f64, politeness: f64, red_flag: f64) -> Self {
        Self {
            empathy: empathy.clamp(0.0, 10.0),
            curiosity: curiosity.clamp(0.0, 10.0),
            clarity: clarity.clamp(0.0, 10.0),
            politeness: politeness.clamp(0.0, 10.0),
            red_flag: red_flag.clamp(0.0, 10.0),
        }
    }

    pub fn get(&self, dim: RubricDimension) -> f64 {
        match dim {
            RubricDimension::Empathy => self.empathy,
            RubricDimension::Curiosity => self.curiosity,
            RubricDimension::Clarity => self.clarity,
            RubricDimension::Politeness => self.politeness,
            RubricDimension::RedFlag => self.red_flag,
        }
    }

    /// Weighted total on the 0–10 scale, rounded to 2 decimals.
    ///
    /// The adverse dimension enters as `10 - value` so that a clean utterance
    /// (red_flag = 0) contributes its full weight.
    pub fn weighted_total(&self) -> f64 {
        let mut total = 0.0;
        for dim in RubricDimension::ALL {
            let mut val = self.get(dim);
            if dim.is_adverse() {
                val = 10.0 - val;
            }
            total += val * dim.weight();
        }
        round2(total)
    }
}

/// Round to 1 decimal place (per-dimension score precision).
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to 2 decimal places (weighted-total precision).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// =============================================================================
// Feedback
// =============================================================================

/// Qualitative feedback attached to a score: at most three strengths, at most
/// three improvement points, one coaching tip, and optionally one rewritten
/// example sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackBundle {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub tip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_example: Option<String>,
}

impl FeedbackBundle {
    pub const MAX_ITEMS: usize = 3;

    pub fn empty() -> Self {
        Self::default()
    }

    /// Enforce the list-length invariant in place.
    pub fn cap_lists(&mut self) {
        self.strengths.truncate(Self::MAX_ITEMS);
        self.improvements.truncate(Self::MAX_ITEMS);
    }
}
