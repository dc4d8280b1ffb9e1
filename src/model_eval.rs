//! Model-assisted scorer: prompt the model, parse its JSON verdict.
//!
//! The model is asked for a strict JSON object but routinely wraps it in
//! code fences or emits range artifacts like `"0-10"` where a number belongs.
//! Parsing is therefore tolerant: fences are stripped, and a failed parse
//! gets exactly one repair pass before the attempt is declared unusable.
//! Unusable means the caller falls back to the heuristic engine; this module
//! never retries the network call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::gateway::{ChatGateway, ChatRequest, Message, ProviderError};
use crate::lexicon::Lexicon;
use crate::prompts::EVAL_PROMPT;
use crate::rubric::{FeedbackBundle, RubricDimension, ScoreRecord};

/// Sampling temperature for evaluation calls. Low, for schema discipline.
pub const MODEL_EVAL_TEMPERATURE: f32 = 0.2;

/// Code-fence markers the model may wrap its JSON in.
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```json|```").expect("static pattern"));

/// Range artifact like `0-10` or `7 - 10` inside a score field; coerced to
/// the literal upper bound during the repair pass.
static RANGE_ARTIFACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*-\s*10").expect("static pattern"));

/// Why a model evaluation attempt was unusable.
#[derive(Debug, thiserror::Error)]
pub enum ModelEvalError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("schema error: {0}")]
    Schema(String),
}

/// Parse a raw model response into scores and feedback.
///
/// Accepts score keys under either the lexicon's display labels (what the
/// prompt asks for) or the English dimension names. Fails if the `scores`
/// object is missing or any rubric dimension is absent.
pub fn parse_model_response(
    raw: &str,
    lexicon: &Lexicon,
) -> Result<(ScoreRecord, FeedbackBundle), ModelEvalError> {
    let unfenced = FENCE_RE.replace_all(raw, "");
    // Slice to the outermost braces so prose around the object is ignored.
    let cleaned = match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => unfenced[start..=end].to_string(),
        _ => unfenced.trim().to_string(),
    };

    let value: Value = match serde_json::from_str(&cleaned) {
        Ok(v) => v,
        Err(first_err) => {
            // One repair pass: collapse numeric-range artifacts, reparse.
            let repaired = RANGE_ARTIFACT_RE.replace_all(&cleaned, "10");
            serde_json::from_str(&repaired).map_err(|_| {
                ModelEvalError::Parse(format!("unparsable after repair: {first_err}"))
            })?
        }
    };

    let scores_obj = value
        .get("scores")
        .and_then(Value::as_object)
        .ok_or_else(|| ModelEvalError::Schema("missing 'scores' object".into()))?;

    let mut vals = [0.0f64; 5];
    for (i, dim) in RubricDimension::ALL.iter().enumerate() {
        let raw_score = scores_obj
            .get(lexicon.label(*dim))
            .or_else(|| scores_obj.get(dim.as_str()))
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                ModelEvalError::Schema(format!("missing score for '{}'", dim.as_str()))
            })?;
        vals[i] = raw_score;
    }
    let scores = ScoreRecord::new(vals[0], vals[1], vals[2], vals[3], vals[4]);

    let feedback = value
        .get("feedback")
        .map(parse_feedback)
        .unwrap_or_default();

    Ok((scores, feedback))
}

fn parse_feedback(value: &Value) -> FeedbackBundle {
    fn string_list(value: &Value, key: &str) -> Vec<String> {
        value
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    let mut feedback = FeedbackBundle {
        strengths: string_list(value, "strengths"),
        improvements: string_list(value, "improvements"),
        tip: value
            .get("tip")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        rewrite_example: value
            .get("rewrite_example")
            .or_else(|| value.get("rewrite"))
            .and_then(Value::as_str)
            .map(str::to_string),
    };
    feedback.cap_lists();
    feedback
}

/// Score an utterance via the model path: one call, one parse attempt.
pub async fn model_score(
    gateway: &dyn ChatGateway,
    model: &str,
    user_text: &str,
    npc_text: &str,
    difficulty_label: &str,
    lexicon: &Lexicon,
) -> Result<(ScoreRecord, FeedbackBundle), ModelEvalError> {
    let prompt = EVAL_PROMPT.render(user_text, npc_text, difficulty_label);
    let request = ChatRequest::new(model, vec![Message::user(prompt)])
        .temperature(MODEL_EVAL_TEMPERATURE);

    let response = gateway.chat(request).await?;
    parse_model_response(&response.content, lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex() -> Lexicon {
        Lexicon::korean()
    }

    fn full_json(empathy: f64) -> String {
        format!(
            r#"{{"scores":{{"공감":{empathy},"호기심":6,"명료성":7,"정중함":8,"레드플래그":1}},
               "feedback":{{"strengths":["좋아요"],"improvements":["질문을 더"],"tip":"한 문장"}}}}"#
        )
    }

    #[test]
    fn parses_clean_json() {
        let (scores, feedback) = parse_model_response(&full_json(9.0), &lex()).unwrap();
        assert_eq!(scores.empathy, 9.0);
        assert_eq!(scores.red_flag, 1.0);
        assert_eq!(feedback.strengths, vec!["좋아요"]);
        assert_eq!(feedback.tip, "한 문장");
    }

    #[test]
    fn parses_code_fenced_json() {
        let raw = format!("```json\n{}\n```", full_json(7.5));
        let (scores, _) = parse_model_response(&raw, &lex()).unwrap();
        assert_eq!(scores.empathy, 7.5);
    }

    #[test]
    fn accepts_english_dimension_keys() {
        let raw = r#"{"scores":{"empathy":5,"curiosity":5,"clarity":5,"politeness":5,"red_flag":5}}"#;
        let (scores, feedback) = parse_model_response(raw, &lex()).unwrap();
        assert_eq!(scores.politeness, 5.0);
        assert!(feedback.strengths.is_empty());
        assert!(feedback.tip.is_empty());
    }

    #[test]
    fn repair_pass_coerces_range_artifacts() {
        let raw = r#"{"scores":{"공감":0-10,"호기심":6,"명료성":7,"정중함":8,"레드플래그":1}}"#;
        let (scores, _) = parse_model_response(raw, &lex()).unwrap();
        assert_eq!(scores.empathy, 10.0);
    }

    #[test]
    fn prose_around_the_object_is_sliced_away() {
        let raw = format!("물론입니다! 평가 결과입니다:\n{}\n도움이 되었기를 바랍니다.", full_json(6.0));
        let (scores, _) = parse_model_response(&raw, &lex()).unwrap();
        assert_eq!(scores.empathy, 6.0);
    }

    #[test]
    fn unrepairable_garbage_is_a_parse_error() {
        let err = parse_model_response("I think the user did great!", &lex()).unwrap_err();
        assert!(matches!(err, ModelEvalError::Parse(_)));
    }

    #[test]
    fn missing_scores_object_is_a_schema_error() {
        let err = parse_model_response(r#"{"feedback":{"tip":"x"}}"#, &lex()).unwrap_err();
        assert!(matches!(err, ModelEvalError::Schema(_)));
    }

    #[test]
    fn missing_dimension_is_a_schema_error() {
        let raw = r#"{"scores":{"공감":9,"호기심":6,"명료성":7,"정중함":8}}"#;
        let err = parse_model_response(raw, &lex()).unwrap_err();
        assert!(matches!(err, ModelEvalError::Schema(_)));
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let raw = r#"{"scores":{"공감":14,"호기심":-2,"명료성":7,"정중함":8,"레드플래그":1}}"#;
        let (scores, _) = parse_model_response(raw, &lex()).unwrap();
        assert_eq!(scores.empathy, 10.0);
        assert_eq!(scores.curiosity, 0.0);
    }

    #[test]
    fn feedback_lists_are_capped() {
        let raw = r#"{"scores":{"공감":9,"호기심":6,"명료성":7,"정중함":8,"레드플래그":1},
                      "feedback":{"strengths":["a","b","c","d","e"],"improvements":[],"tip":"t"}}"#;
        let (_, feedback) = parse_model_response(raw, &lex()).unwrap();
        assert_eq!(feedback.strengths.len(), 3);
    }
}
