use regex::Regex;
use std::sync::OnceLock;

/// First run of ASCII digits, e.g. "400" in "x400".
const DIGIT_RUN_PATTERN: &str = r"[0-9]+";

fn digit_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DIGIT_RUN_PATTERN).expect("digit pattern is valid"))
}

/// Parses the first digit run of recognized quantity text.
///
/// Returns `None` when the text has no digits or the number does not fit in u32.
pub fn parse_quantity(text: &str) -> Option<u32> {
    digit_run_regex()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Normalizes OCR output of the song title to a single line.
///
/// Lines are trimmed, empty lines dropped and the rest joined by one space.
/// Returns `None` if nothing is left.
pub fn clean_song_name(text: &str) -> Option<String> {
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() { None } else { Some(joined) }
}
