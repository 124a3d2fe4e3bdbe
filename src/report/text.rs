use std::sync::LazyLock;

use regex::Regex;

static RE_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?-?\d+\.\d+\)?%?").expect("valid decimal regex"));
static RE_TICKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{2,5}$").expect("valid ticker regex"));
static RE_WATCH_PLACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*Fund has been placed on watchlist for not meeting \d+ out of \d+ criteria\.?")
        .expect("valid watchlist regex")
});
static RE_WATCH_MEETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*Fund Meets Watchlist Criteria\.?").expect("valid watchlist regex")
});

const PROTECTED_ABBREVIATIONS: [&str; 5] = ["U.S.", "U.K.", "e.g.", "i.e.", "etc."];
const DOT_MASK: char = '\u{2024}';

pub fn decimal_tokens(line: &str) -> Vec<String> {
    RE_DECIMAL
        .find_iter(line)
        .map(|token| clean_number(token.as_str()))
        .collect()
}

pub fn clean_number(raw: &str) -> String {
    raw.chars()
        .filter(|character| !matches!(character, '(' | ')' | '%'))
        .collect()
}

/// Tickers are 2-5 uppercase alphanumerics with at least one letter, so that
/// bare years and counts are never mistaken for one.
pub fn is_ticker(token: &str) -> bool {
    RE_TICKER.is_match(token) && token.chars().any(|character| character.is_ascii_uppercase())
}

pub fn contains_token(line: &str, token: &str) -> bool {
    !token.is_empty() && line.split_whitespace().any(|candidate| candidate == token)
}

pub fn contains_word(line: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    line.match_indices(word).any(|(start, _)| {
        let before = line[..start].chars().next_back();
        let after = line[start + word.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric())
            && !after.is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

pub fn strip_watch_phrases(raw: &str) -> String {
    let stripped = RE_WATCH_PLACED.replace_all(raw, "");
    let stripped = RE_WATCH_MEETS.replace_all(&stripped, "");
    condense_whitespace(&stripped)
}

pub fn is_watch_phrase(raw: &str) -> bool {
    !raw.trim().is_empty() && strip_watch_phrases(raw).is_empty()
}

pub fn normalize_name(raw: &str) -> String {
    let stripped = strip_watch_phrases(raw);
    let kept = stripped
        .chars()
        .filter(|character| character.is_alphanumeric() || character.is_whitespace())
        .collect::<String>();
    condense_whitespace(&kept).to_lowercase()
}

pub fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Splits prose into sentences on `.`, `!` or `?` followed by whitespace,
/// leaving the dots of common abbreviations intact.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut masked = condense_whitespace(text);
    for abbreviation in PROTECTED_ABBREVIATIONS {
        masked = masked.replace(abbreviation, &abbreviation.replace('.', &DOT_MASK.to_string()));
    }

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = masked.chars().peekable();
    while let Some(character) = chars.next() {
        current.push(character);
        let at_boundary = matches!(character, '.' | '!' | '?')
            && chars.peek().is_none_or(|next| next.is_whitespace());
        if at_boundary {
            let sentence = current.trim().replace(DOT_MASK, ".");
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }

    let tail = current.trim().replace(DOT_MASK, ".");
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

pub fn first_sentences(text: &str, count: usize) -> String {
    split_sentences(text)
        .into_iter()
        .take(count)
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn is_heading_like(line: &str) -> bool {
    let words = line.split_whitespace().collect::<Vec<&str>>();
    if words.is_empty() || words.len() > 7 {
        return false;
    }
    if line.chars().any(|character| character.is_ascii_digit()) {
        return false;
    }

    let letters = line
        .chars()
        .filter(|character| character.is_alphabetic())
        .collect::<Vec<char>>();
    if letters.is_empty() {
        return false;
    }
    let all_caps = letters.iter().all(|character| character.is_uppercase());
    let title_case = words.iter().all(|word| {
        word.chars()
            .find(|character| character.is_alphabetic())
            .is_none_or(|first| first.is_uppercase())
    });

    all_caps || title_case
}
