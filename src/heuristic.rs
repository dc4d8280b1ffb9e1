//! Rule-based scorer: deterministic rubric scoring from lexical signals.
//!
//! This is the fallback engine when the model path is unavailable or returns
//! malformed output, and the primary engine in heuristic-only mode. It is a
//! pure function of the utterance text and the lexicon: same input, same
//! output, no failure path.
//!
//! Each dimension is assembled as a weighted sum of signal hits, divided by a
//! per-dimension normalizer, clamped to [0, 1], scaled to [0, 10], and
//! rounded to one decimal.

use crate::lexicon::Lexicon;
use crate::rubric::{round1, FeedbackBundle, ScoreRecord};
use crate::signals::{extract, Signals};

// Per-dimension normalizers. The raw weighted sums saturate around these
// values for strong utterances.
const EMPATHY_NORM: f64 = 4.0;
const CURIOSITY_NORM: f64 = 3.0;
const CLARITY_NORM: f64 = 2.2;
const POLITENESS_NORM: f64 = 2.0;
const RED_FLAG_NORM: f64 = 4.0;

/// Threshold above which a dimension counts as a strength (and below which it
/// draws an improvement suggestion).
const STRENGTH_THRESHOLD: f64 = 7.0;

/// Red-flag level that triggers the tone-moderation warning.
const RED_FLAG_WARN: f64 = 4.0;

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Normalize a raw weighted sum onto the 0–10 rubric scale.
fn to10(raw: f64, norm: f64) -> f64 {
    round1(10.0 * clamp01(raw / norm))
}

/// Score an utterance with the rule-based engine.
///
/// Total: always returns a result, including for empty or degenerate input
/// (which produces a low-information but well-formed record).
pub fn heuristic_score(text: &str, lexicon: &Lexicon) -> (ScoreRecord, FeedbackBundle) {
    let sig = extract(text, lexicon);

    let empathy = to10(empathy_raw(&sig), EMPATHY_NORM);
    let curiosity = to10(curiosity_raw(&sig), CURIOSITY_NORM);
    let clarity = to10(clarity_raw(&sig), CLARITY_NORM);
    let politeness = to10(politeness_raw(&sig), POLITENESS_NORM);
    let red_flag = to10(red_flag_raw(&sig), RED_FLAG_NORM);

    let scores = ScoreRecord::new(empathy, curiosity, clarity, politeness, red_flag);
    let feedback = derive_feedback(&scores, &sig, lexicon);
    (scores, feedback)
}

fn empathy_raw(sig: &Signals) -> f64 {
    let mut raw = 0.0;
    raw += 0.6 * sig.empathy_positive_hits as f64;
    raw += 0.7 * sig.empathy_reflective_hits as f64;
    raw += 0.5 * sig.softener_hits as f64;
    if sig.expressive {
        raw += 0.4;
    }
    raw -= 0.2 * (sig.exclamations.saturating_sub(2)) as f64;
    raw
}

fn curiosity_raw(sig: &Signals) -> f64 {
    let mut raw = 0.0;
    if sig.question_marks >= 1 {
        raw += 0.9;
    }
    raw += 0.6 * sig.curiosity_hits as f64;
    if sig.question_suffix {
        raw += 0.6;
    }
    raw -= 0.2 * (sig.question_marks.saturating_sub(2)) as f64;
    raw
}

fn clarity_raw(sig: &Signals) -> f64 {
    let mut raw = if sig.is_very_short() {
        0.3
    } else if sig.is_long() {
        0.6
    } else {
        1.0
    };
    if sig.multi_sentence {
        raw += 0.4;
    }
    if sig.ellipses >= 1 {
        raw -= 0.3;
    }
    raw -= 0.3 * (sig.exclamations.saturating_sub(1)) as f64;
    raw -= 1.0 * clamp01(sig.all_caps_ratio);
    raw
}

fn politeness_raw(sig: &Signals) -> f64 {
    let mut raw = 1.5;
    raw += 0.2 * sig.softener_hits as f64;
    raw -= 1.2 * sig.boundary_hits as f64;
    if sig.urgent_meet_demand {
        raw -= 1.0;
    }
    if sig.private_location {
        raw -= 1.0;
    }
    if sig.rude_vocative {
        raw -= 1.5;
    }
    if sig.blunt_ending {
        raw -= 1.2;
    }
    if sig.honorific_hits == 0 && sig.chars <= 3 {
        raw -= 0.9;
    }
    if sig.honorific_hits == 0 && sig.chars >= 8 {
        raw -= 0.6;
    }
    raw
}

fn red_flag_raw(sig: &Signals) -> f64 {
    let mut raw = 0.0;
    raw += 1.5 * sig.rude_hits as f64;
    raw += 0.8 * (sig.exclamations.saturating_sub(2)) as f64;
    raw += 1.0 * clamp01(sig.all_caps_ratio * 2.0);
    raw
}

fn derive_feedback(scores: &ScoreRecord, sig: &Signals, lexicon: &Lexicon) -> FeedbackBundle {
    let texts = &lexicon.feedback;
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();

    if scores.empathy >= STRENGTH_THRESHOLD {
        strengths.push(texts.strength_empathy.clone());
    }
    if scores.curiosity >= STRENGTH_THRESHOLD {
        strengths.push(texts.strength_curiosity.clone());
    }
    if scores.clarity >= STRENGTH_THRESHOLD {
        strengths.push(texts.strength_clarity.clone());
    }
    if scores.politeness >= STRENGTH_THRESHOLD {
        strengths.push(texts.strength_politeness.clone());
    }

    if scores.empathy < STRENGTH_THRESHOLD {
        improvements.push(texts.improve_empathy.clone());
    }
    if scores.curiosity < STRENGTH_THRESHOLD {
        improvements.push(texts.improve_curiosity.clone());
    }
    if scores.clarity < STRENGTH_THRESHOLD {
        let advice = if sig.is_long() && !sig.multi_sentence {
            &texts.improve_clarity_long
        } else if sig.is_very_short() {
            &texts.improve_clarity_short
        } else {
            &texts.improve_clarity_default
        };
        improvements.push(advice.clone());
    }
    if scores.politeness < STRENGTH_THRESHOLD {
        improvements.push(texts.improve_politeness.clone());
        if sig.rude_vocative || sig.blunt_ending || sig.honorific_hits == 0 {
            improvements.push(texts.improve_blunt_tone.clone());
        }
    }
    if scores.red_flag >= RED_FLAG_WARN {
        improvements.push(texts.improve_red_flag.clone());
    }

    let keyword = sig
        .tokens
        .iter()
        .find(|t| (2..=10).contains(&t.chars().count()))
        .map(|t| t.as_str())
        .unwrap_or(&texts.filler_keyword);

    let mut feedback = FeedbackBundle {
        strengths,
        improvements,
        tip: texts.tip_template.replace("{keyword}", keyword),
        rewrite_example: Some(texts.rewrite_template.replace("{keyword}", keyword)),
    };
    feedback.cap_lists();
    feedback
}
