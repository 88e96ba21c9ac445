use std::sync::LazyLock;

use regex::Regex;

/// Maximal runs of ASCII word characters (`[0-9A-Za-z_]`).
///
/// Non-ASCII letters survive lower-casing but act as separators, so `café`
/// yields `caf`. One definition only; no locale-aware segmentation.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9A-Za-z_]+").expect("word pattern is valid"));

/// Lower-cases `text` and extracts its word tokens in order of appearance.
///
/// Never fails: empty, whitespace-only or punctuation-only input gives an
/// empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_owned())
        .collect()
}
