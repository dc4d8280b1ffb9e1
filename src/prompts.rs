//! Prompt template for the model-assisted evaluation call.
//!
//! A fixed instructional template that explains the rubric, embeds the
//! utterance under evaluation and the counterpart's utterance (marked
//! reference-only), states the difficulty, and spells out the required JSON
//! output schema. Rendered as a single user-role message; the evaluation
//! call never carries conversation history.

/// A prompt template with `{placeholder}` slots.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub slug: &'static str,
    pub body: &'static str,
}

impl PromptTemplate {
    pub fn render(&self, user_text: &str, npc_text: &str, difficulty_label: &str) -> String {
        self.body
            .replace("{user_text}", user_text.trim())
            .replace("{npc_text}", npc_text.trim())
            .replace("{difficulty}", difficulty_label)
            .trim()
            .to_string()
    }
}

/// The Korean coaching-evaluation prompt. Scores only the user's utterance on
/// the five rubric dimensions and demands a strict JSON object in reply.
pub const EVAL_PROMPT: PromptTemplate = PromptTemplate {
    slug: "coach_eval_v1",
    body: r#"너는 소개팅/사회적 대화 코치야. 아래 '평가대상' 발화만 평가해.
오직 평가대상의 문장만 점수화하고 피드백을 작성해.
'상대 발화'는 맥락 참고용일 뿐이고, 강점/개선/팁에 인용하거나 근거로 사용하지 마.

[평가대상] 나(사용자)

[평가대상 발화]
{user_text}

[상대 발화(참고용, 인용 금지)]
{npc_text}

[평가 기준]
- 공감(0~10): 상대의 감정/내용을 이해하고 반영했는가?
- 호기심(0~10): 자연스러운 관심 질문이 있는가?
- 명료성(0~10): 구체적이고 분명한가?
- 정중함(0~10): 예의를 갖추었는가? (반말/명령형/호칭 무시/무례어/비격식 강한 슬랭 사용 시 크게 감점)
- 레드플래그(0~10): 무례/과몰입/사생활침해/거짓말/셀프디스 등(높을수록 나쁨)

[난이도]
{difficulty}

[출력 형식(JSON strict)]
{
  "scores": {
    "공감": 0-10,
    "호기심": 0-10,
    "명료성": 0-10,
    "정중함": 0-10,
    "레드플래그": 0-10
  },
  "feedback": {
    "strengths": ["짧은 문장", "최대 3개"],
    "improvements": ["짧은 문장", "최대 3개"],
    "tip": "다음 턴에 바로 쓸 한 문장 코칭"
  }
}
반드시 유효한 JSON만 출력해. 주석/설명/추가 텍스트 금지.
"#,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_all_placeholders() {
        let prompt = EVAL_PROMPT.render("  안녕하세요  ", "반가워요", "보통");
        assert!(prompt.contains("안녕하세요"));
        assert!(prompt.contains("반가워요"));
        assert!(prompt.contains("[난이도]\n보통"));
        assert!(!prompt.contains("{user_text}"));
        assert!(!prompt.contains("{npc_text}"));
        assert!(!prompt.contains("{difficulty}"));
    }

    #[test]
    fn render_keeps_schema_block() {
        let prompt = EVAL_PROMPT.render("a", "b", "쉬움");
        assert!(prompt.contains(r#""scores""#));
        assert!(prompt.contains(r#""feedback""#));
        assert!(prompt.contains("레드플래그"));
    }
}
