//! Small text helpers shared by the compiler, repairer and validator.

/// Character count, not byte length. Editor limits are in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Collapse runs of whitespace into single spaces and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate `text` to at most `max` characters.
///
/// Cuts at the last space when that keeps more than 70% of the limit,
/// otherwise cuts mid-word. No ellipsis is appended since it would eat into
/// the budget the Editor enforces.
pub fn truncate_at_word(text: &str, max: usize) -> String {
    let text = text.trim();
    if char_len(text) <= max {
        return text.to_owned();
    }

    let hard: String = text.chars().take(max).collect();
    let threshold = max * 7 / 10;
    let at_word = hard
        .rfind(' ')
        .and_then(|idx| hard.get(..idx))
        .filter(|head| char_len(head) > threshold);
    at_word.unwrap_or(hard.as_str()).trim_end().to_owned()
}

/// Hard-cut to `max` characters with no word-boundary search.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.trim().chars().take(max).collect::<String>().trim_end().to_owned()
}

/// Turn a campaign name into a filesystem-safe filename stem.
///
/// Lowercases, replaces anything non-alphanumeric with `_`, collapses
/// repeated underscores and trims them from the ends.
pub fn sanitize_filename(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut last_was_underscore = false;
    for c in name.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            last_was_underscore = false;
        } else if !last_was_underscore {
            result.push('_');
            last_was_underscore = true;
        }
    }

    let result = result.trim_matches('_');
    if result.is_empty() {
        "campaign".to_owned()
    } else {
        result.to_owned()
    }
}

/// Upper-case the first letter of every word ("high_intent" -> "High Intent").
pub fn title_case(text: &str) -> String {
    text.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
