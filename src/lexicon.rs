//! Locale-specific trigger tables for the rule-based scorer.
//!
//! The scoring formulas in `heuristic` are language-agnostic; everything that
//! depends on a particular language (keyword lists, sentence-ending
//! patterns, dimension display labels, canned feedback sentences) lives
//! here as an injectable configuration table. The shipped default is the
//! Korean lexicon the simulator was built around.

use regex::Regex;

use crate::rubric::RubricDimension;

/// Fixed per-dimension feedback sentences and the tip/rewrite templates.
///
/// Templates substitute `{keyword}` with a token picked from the utterance.
#[derive(Debug, Clone)]
pub struct FeedbackTexts {
    /// One strength sentence per positive dimension (empathy, curiosity,
    /// clarity, politeness), emitted when that dimension scores >= 7.
    pub strength_empathy: String,
    pub strength_curiosity: String,
    pub strength_clarity: String,
    pub strength_politeness: String,

    pub improve_empathy: String,
    pub improve_curiosity: String,
    /// Clarity improvement branches on how the text failed.
    pub improve_clarity_long: String,
    pub improve_clarity_short: String,
    pub improve_clarity_default: String,
    pub improve_politeness: String,
    /// Second politeness improvement when a blunt-tone signal fired.
    pub improve_blunt_tone: String,
    /// Appended when the red-flag dimension reaches the warning threshold.
    pub improve_red_flag: String,

    /// Per-turn coaching tip template (`{keyword}` placeholder).
    pub tip_template: String,
    /// Rewritten-example template (`{keyword}` placeholder).
    pub rewrite_template: String,
    /// Substituted when the utterance has no usable keyword token.
    pub filler_keyword: String,
    /// Fixed closing tip for the session summary.
    pub closing_tip: String,
}

/// Keyword lists and sentence patterns for one language.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Politeness softeners (hedges, thanks, apologies).
    pub softeners: Vec<String>,
    /// Positive-empathy vocabulary.
    pub empathy_positive: Vec<String>,
    /// Reflective-empathy vocabulary (mirroring the counterpart).
    pub empathy_reflective: Vec<String>,
    /// Curiosity / open-question vocabulary.
    pub curiosity_words: Vec<String>,
    /// Boundary-violating phrases (contact demands, private meetups).
    pub boundary_violations: Vec<String>,
    /// Outright rude vocabulary.
    pub rude_words: Vec<String>,
    /// Honorific sentence-ending markers.
    pub honorific_markers: Vec<String>,
    /// Rude address terms that also count as rude when inline.
    pub rude_vocatives_inline: Vec<String>,

    /// Question-style sentence suffix (applied to the lowercased text end).
    pub question_suffix: Regex,
    /// Casual/blunt sentence-ending grammatical patterns.
    pub blunt_endings: Vec<Regex>,
    /// A short address term standing alone (with optional trailing punctuation).
    pub rude_vocative_alone: Regex,
    /// Demand to meet immediately (now/right-away + meet/come verbs).
    pub urgent_meet_demand: Regex,
    /// Reference to a private location (home/room/hotel).
    pub private_location: Regex,

    /// Display label per rubric dimension, used in prompts and accepted as a
    /// score key when parsing model output.
    labels: [String; 5],

    pub feedback: FeedbackTexts,
}

impl Lexicon {
    /// Display label for a dimension (e.g. "공감" for empathy in Korean).
    pub fn label(&self, dim: RubricDimension) -> &str {
        let idx = match dim {
            RubricDimension::Empathy => 0,
            RubricDimension::Curiosity => 1,
            RubricDimension::Clarity => 2,
            RubricDimension::Politeness => 3,
            RubricDimension::RedFlag => 4,
        };
        &self.labels[idx]
    }

    /// The default Korean lexicon.
    pub fn korean() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        // Patterns are fixed literals; compilation cannot fail at runtime.
        fn re(pattern: &str) -> Regex {
            Regex::new(pattern).expect("static lexicon pattern")
        }

        Self {
            softeners: strings(&[
                "혹시",
                "괜찮다면",
                "실례지만",
                "가능할까요",
                "바쁘시면",
                "천천히",
                "부탁",
                "고맙",
                "감사",
                "죄송",
                "미안",
            ]),
            empathy_positive: strings(&[
                "좋", "재밌", "대단", "멋지", "축하", "응원", "이해", "그렇군", "알겠", "수고",
                "고생",
            ]),
            empathy_reflective: strings(&[
                "말씀", "얘기", "이야기", "포인트", "공감", "맞아요", "맞다", "그렇죠",
            ]),
            curiosity_words: strings(&[
                "왜",
                "언제",
                "어디",
                "무엇",
                "무슨",
                "어떤",
                "어떻게",
                "어때",
                "가능할까요",
                "물어봐도",
            ]),
            boundary_violations: strings(&[
                "카톡아이디",
                "카카오톡",
                "집주소",
                "만나자지금",
                "지금만나",
                "번호줘",
                "연락처줘",
                "숙소",
                "방잡",
                "술자리 강요",
            ]),
            rude_words: strings(&[
                "싫", "꺼져", "닥쳐", "미친", "뭐래", "멍청", "병신", "야 ", "돈자랑",
            ]),
            honorific_markers: strings(&[
                "요",
                "입니다",
                "합니다",
                "하세요",
                "십시오",
                "합니까",
                "해요",
                "드립니다",
            ]),
            rude_vocatives_inline: strings(&["야 ", "야,", "야?", "야!"]),

            question_suffix: re(r"(나요|니요|죠\?|지요\?)$"),
            blunt_endings: vec![
                re(r"[가-힣A-Za-z0-9]+다$"),
                re(r"[가-힣]+해$"),
                re(r"[가-힣]+해\?"),
                re(r"[가-힣]+해라$"),
                re(r"[가-힣]+해봐$"),
                re(r"[가-힣]+해줘$"),
                re(r"[가-힣]+해줄래"),
                re(r"[가-힣]+냐\?$"),
                re(r"[가-힣]+니\?$"),
                re(r"[가-힣]+해라\?$"),
                re(r".*빨리.*"),
                re(r".*지금.*해$"),
                re(r".*와라$"),
                re(r".*보자$"),
            ],
            rude_vocative_alone: re(r"^\s*야+[!?.]?\s*$"),
            urgent_meet_demand: re(r"(지금|바로|당장).*(만나|오|보자)"),
            private_location: re(r"(우리집|내방|호텔|모텔)"),

            labels: [
                "공감".to_string(),
                "호기심".to_string(),
                "명료성".to_string(),
                "정중함".to_string(),
                "레드플래그".to_string(),
            ],

            feedback: FeedbackTexts {
                strength_empathy: "상대의 포인트를 인정·반영하는 표현이 좋아요.".into(),
                strength_curiosity: "대화를 확장하는 질문이 자연스럽습니다.".into(),
                strength_clarity: "문장이 간결하고 읽기 쉬워요.".into(),
                strength_politeness: "존중감 있는 어투로 예의를 잘 지켰어요.".into(),

                improve_empathy: "공감 1구(“말씀 듣고 보니 공감돼요”) 후 관련 질문 1개로 이어보세요."
                    .into(),
                improve_curiosity: "문장 끝에 구체 질문 1개만 덧붙여 대화를 확장해 보세요.".into(),
                improve_clarity_long: "길다면 문장을 나누고 생략부호/느낌표를 줄여 가독성을 높이세요."
                    .into(),
                improve_clarity_short: "핵심 정보(언제/어디/무엇)를 1–2개만 보강해 주세요.".into(),
                improve_clarity_default: "짧은 문장 1–2개로 정리하고 생략부호/느낌표를 줄여보세요."
                    .into(),
                improve_politeness: "존댓말(요/습니다)과 완곡한 표현을 사용해 톤을 부드럽게 해보세요."
                    .into(),
                improve_blunt_tone: "반말/명령형을 피하고 “혹시…”, “괜찮으시면…” 같은 완곡어를 활용하세요."
                    .into(),
                improve_red_flag: "강한 단어·올캡·느낌표 남용을 피하고 톤을 부드럽게 하세요.".into(),

                tip_template: "'{keyword}'를 받아 한 문장으로: 공감 1구 → 존댓말 질문 1개.".into(),
                rewrite_template:
                    "“{keyword}” 말씀 공감돼요. 혹시 {keyword}에서 가장 좋았던 점은 무엇이었나요?"
                        .into(),
                filler_keyword: "이야기".into(),
                closing_tip: "상대의 마지막 문장에서 키워드 1개를 골라 공감 + 존댓말 질문으로 이어가세요."
                    .into(),
            },
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::korean()
    }
}
