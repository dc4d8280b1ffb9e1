//! Lexical signal extraction from a raw utterance.
//!
//! `extract` is pure and total: any input, including empty or whitespace-only
//! text, yields a well-formed `Signals` record. Everything downstream (the
//! rule-based scorer) works off these signals rather than re-scanning text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::Lexicon;

/// Maximal runs of Hangul / Latin / digit characters.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[가-힣A-Za-z0-9]+").expect("static pattern")
});

/// Latin-only tokens, for the all-caps ratio.
static LATIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("static pattern"));

/// Sentence-terminal punctuation (ASCII and fullwidth), used for the
/// multi-sentence signal.
static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?？！。…]+").expect("static pattern"));

/// Expressive markers: a small emoji set, kaomoji-style faces, or a repeated
/// tilde.
static EXPRESSIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[😊😂🤣😍😘🥰🙌👍✨❤💕💘😉😅🙏]|[^\w\s][)D]|~{2,}").expect("static pattern")
});

/// Lexical signals derived from one utterance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signals {
    /// Character count of the trimmed text.
    pub chars: usize,
    /// Lowercased Hangul/Latin/digit token runs, in order.
    pub tokens: Vec<String>,
    pub question_marks: usize,
    pub exclamations: usize,
    /// Literal ellipsis characters plus three-period runs.
    pub ellipses: usize,
    /// Fraction of fully upper-cased Latin tokens (length >= 3).
    pub all_caps_ratio: f64,
    /// Emoji / kaomoji / repeated-tilde presence.
    pub expressive: bool,
    /// Splitting on sentence-terminal punctuation yields >= 2 non-empty parts.
    pub multi_sentence: bool,

    pub softener_hits: usize,
    pub empathy_positive_hits: usize,
    pub empathy_reflective_hits: usize,
    pub curiosity_hits: usize,
    pub boundary_hits: usize,
    pub rude_hits: usize,
    pub honorific_hits: usize,

    /// Polite question-suffix at the end of the text.
    pub question_suffix: bool,
    /// Any casual/blunt sentence-ending pattern matched.
    pub blunt_ending: bool,
    /// A rude address term stood alone or appeared inline.
    pub rude_vocative: bool,
    /// Now/right-away + meet/come demand.
    pub urgent_meet_demand: bool,
    /// Home/room/hotel reference.
    pub private_location: bool,
}

impl Signals {
    pub fn is_very_short(&self) -> bool {
        self.chars < 8
    }

    pub fn is_long(&self) -> bool {
        self.chars > 120
    }
}

/// Count how many entries of `list` occur as substrings of `haystack`.
///
/// Presence count, not occurrence count: each keyword contributes at most one
/// hit regardless of how often it repeats.
fn category_hits(haystack: &str, list: &[String]) -> usize {
    list.iter().filter(|k| haystack.contains(k.as_str())).count()
}

/// Extract lexical signals from raw text. Never fails.
pub fn extract(text: &str, lexicon: &Lexicon) -> Signals {
    let text = text.trim();
    if text.is_empty() {
        return Signals::default();
    }
    let low = text.to_lowercase();

    let tokens: Vec<String> = TOKEN_RE
        .find_iter(&low)
        .map(|m| m.as_str().to_string())
        .collect();

    let question_marks = text.matches('?').count();
    let exclamations = text.matches('!').count();
    let ellipses = text.matches('…').count() + text.matches("...").count();

    let cap_tokens: Vec<&str> = LATIN_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|t| t.len() >= 3)
        .collect();
    let all_caps_ratio = if cap_tokens.is_empty() {
        0.0
    } else {
        let upper = cap_tokens
            .iter()
            .filter(|t| t.chars().all(|c| c.is_ascii_uppercase()))
            .count();
        upper as f64 / cap_tokens.len() as f64
    };

    let multi_sentence = SENTENCE_SPLIT_RE
        .split(text)
        .filter(|part| !part.trim().is_empty())
        .count()
        >= 2;

    let rude_vocative = lexicon.rude_vocative_alone.is_match(text)
        || lexicon
            .rude_vocatives_inline
            .iter()
            .any(|rv| text.contains(rv.as_str()));

    Signals {
        chars: text.chars().count(),
        question_marks,
        exclamations,
        ellipses,
        all_caps_ratio,
        expressive: EXPRESSIVE_RE.is_match(text),
        multi_sentence,

        softener_hits: category_hits(&low, &lexicon.softeners),
        empathy_positive_hits: category_hits(&low, &lexicon.empathy_positive),
        empathy_reflective_hits: category_hits(&low, &lexicon.empathy_reflective),
        curiosity_hits: category_hits(&low, &lexicon.curiosity_words),
        boundary_hits: category_hits(&low, &lexicon.boundary_violations),
        rude_hits: category_hits(&low, &lexicon.rude_words),
        honorific_hits: category_hits(text, &lexicon.honorific_markers),

        question_suffix: lexicon.question_suffix.is_match(&low),
        blunt_ending: lexicon.blunt_endings.iter().any(|p| p.is_match(text)),
        rude_vocative,
        urgent_meet_demand: lexicon.urgent_meet_demand.is_match(&low),
        private_location: lexicon.private_location.is_match(&low),

        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex() -> Lexicon {
        Lexicon::korean()
    }

    #[test]
    fn empty_and_whitespace_yield_zero_signals() {
        assert_eq!(extract("", &lex()), Signals::default());
        assert_eq!(extract("   \n\t", &lex()), Signals::default());
    }

    #[test]
    fn token_runs_cross_scripts() {
        let s = extract("오늘 coffee 2잔 마셨어요", &lex());
        assert_eq!(s.tokens, vec!["오늘", "coffee", "2잔", "마셨어요"]);
        assert_eq!(s.chars, "오늘 coffee 2잔 마셨어요".chars().count());
    }

    #[test]
    fn punctuation_counts() {
        let s = extract("정말요?? 와!!! 그게... 음…", &lex());
        assert_eq!(s.question_marks, 2);
        assert_eq!(s.exclamations, 3);
        assert_eq!(s.ellipses, 2);
    }

    #[test]
    fn all_caps_ratio_ignores_short_tokens() {
        // "OK" is below the length-3 cutoff; "WOW" and "nice" count.
        let s = extract("OK WOW nice", &lex());
        assert!((s.all_caps_ratio - 0.5).abs() < 1e-9);

        let none = extract("한글만 있어요", &lex());
        assert_eq!(none.all_caps_ratio, 0.0);
    }

    #[test]
    fn multi_sentence_requires_two_nonempty_parts() {
        assert!(extract("반가워요. 영화 좋아하세요?", &lex()).multi_sentence);
        // Trailing punctuation alone does not make a second sentence.
        assert!(!extract("반가워요.", &lex()).multi_sentence);
        assert!(!extract("야!!", &lex()).multi_sentence);
    }

    #[test]
    fn expressive_markers() {
        assert!(extract("좋아요~~", &lex()).expressive);
        assert!(extract("반가워요 :)", &lex()).expressive);
        assert!(extract("축하해요 😊", &lex()).expressive);
        assert!(!extract("반갑습니다", &lex()).expressive);
    }

    #[test]
    fn category_hits_count_presence_once() {
        // "감사" appears twice but counts once.
        let s = extract("감사해요 정말 감사합니다", &lex());
        assert_eq!(s.softener_hits, 1);
    }

    #[test]
    fn rude_vocative_detection() {
        assert!(extract("야!!", &lex()).rude_vocative);
        assert!(extract("야", &lex()).rude_vocative);
        assert!(extract("야 뭐해", &lex()).rude_vocative);
        assert!(!extract("야구 좋아하세요?", &lex()).rude_vocative);
    }

    #[test]
    fn honorific_and_blunt_signals() {
        let polite = extract("혹시 괜찮다면 여쭤봐도 될까요?", &lex());
        assert!(polite.honorific_hits > 0);
        assert!(!polite.rude_vocative);

        let blunt = extract("지금 그거 해", &lex());
        assert!(blunt.blunt_ending);
        assert_eq!(blunt.honorific_hits, 0);
    }
}
