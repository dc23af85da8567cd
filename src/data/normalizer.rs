// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Canonicalizes noisy repetition in raw sentences before
// tokenisation.
//
// User-written STS data is full of expressive repetition:
// "진짜???????", "대박!!!!!!", "ㅋㅋㅋㅋㅋㅋㅋ". Each distinct run
// length would otherwise produce a distinct token sequence, so
// the vocabulary fragments over noise the model cannot use.
// Collapsing every run to a fixed canonical length maps all of
// them onto one surface form.
//
// Rules (applied in a fixed order, one regex pass each):
//   !! or longer  → !!!      ?? or longer → ???
//   .. or longer  → ...      ~  or longer → ~
//   ;  or longer  → ;
//   ㅎㅎ or longer → ㅎㅎㅎ    ㅋㅋ or longer → ㅋㅋㅋ
//   ㄷㄷ or longer → ㄷㄷㄷ
//
// A single `!`, `?` or `.` is meaningful punctuation and is
// left untouched; only runs of two or more collapse. The whole
// function is total over strings and idempotent: every
// replacement output is itself a fixed point of its rule.

use once_cell::sync::Lazy;
use regex::Regex;

// Rule table, compiled once. Order is fixed so the pass is
// reproducible, though no rule's output overlaps another's
// input.
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"!!+").unwrap(), "!!!"),
        (Regex::new(r"\?\?+").unwrap(), "???"),
        (Regex::new(r"\.\.+").unwrap(), "..."),
        (Regex::new(r"~+").unwrap(), "~"),
        (Regex::new(r";+").unwrap(), ";"),
        (Regex::new(r"ㅎㅎ+").unwrap(), "ㅎㅎㅎ"),
        (Regex::new(r"ㅋㅋ+").unwrap(), "ㅋㅋㅋ"),
        (Regex::new(r"ㄷㄷ+").unwrap(), "ㄷㄷㄷ"),
    ]
});

/// Canonicalizes punctuation/emoticon runs. Stateless; one
/// instance can be shared freely.
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Apply every rule in sequence. Deterministic, pure, and
    /// total: any string in, a string out, no error path.
    pub fn normalize(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (pattern, replacement) in RULES.iter() {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
        out
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
