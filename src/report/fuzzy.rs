use std::collections::BTreeSet;

fn process(raw: &str) -> String {
    let mapped = raw
        .chars()
        .map(|character| {
            if character.is_alphanumeric() {
                character.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>();
    mapped.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub fn ratio(left: &str, right: &str) -> u8 {
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    (strsim::normalized_levenshtein(left, right) * 100.0).round() as u8
}

pub fn token_sort_ratio(left: &str, right: &str) -> u8 {
    ratio(&sorted_tokens(left), &sorted_tokens(right))
}

/// Similarity of the shared token set against each side's full token set;
/// 100 when one side's tokens are a subset of the other's.
pub fn token_set_ratio(left: &str, right: &str) -> u8 {
    let left = process(left);
    let right = process(right);
    let left_tokens = left.split_whitespace().collect::<BTreeSet<&str>>();
    let right_tokens = right.split_whitespace().collect::<BTreeSet<&str>>();
    if left_tokens.is_empty() || right_tokens.is_empty() {
        return 0;
    }

    let shared = left_tokens
        .intersection(&right_tokens)
        .copied()
        .collect::<Vec<&str>>();
    let only_left = left_tokens
        .difference(&right_tokens)
        .copied()
        .collect::<Vec<&str>>();
    let only_right = right_tokens
        .difference(&left_tokens)
        .copied()
        .collect::<Vec<&str>>();

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100;
    }

    let base = shared.join(" ");
    let with_left = join_nonempty(&base, &only_left.join(" "));
    let with_right = join_nonempty(&base, &only_right.join(" "));

    ratio(&base, &with_left)
        .max(ratio(&base, &with_right))
        .max(ratio(&with_left, &with_right))
}

fn sorted_tokens(raw: &str) -> String {
    let processed = process(raw);
    let mut tokens = processed.split_whitespace().collect::<Vec<&str>>();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_nonempty(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{left} {right}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_sort_ignores_order_and_case() {
        assert_eq!(token_sort_ratio("Index 500 Vanguard", "vanguard 500 index"), 100);
        assert!(token_sort_ratio("vanguard 500 index", "vanguard 500 index adm") >= 70);
        assert!(token_sort_ratio("vanguard 500 index", "fidelity contrafund") < 50);
    }

    #[test]
    fn token_set_is_full_for_subsets() {
        assert_eq!(
            token_set_ratio("American Funds Growth Fund R6", "American Funds Growth Fund R6 RGAGX Pass"),
            100
        );
        assert_eq!(token_set_ratio("", "anything"), 0);
    }
}
