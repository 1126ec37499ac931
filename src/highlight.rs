use regex::{Regex, RegexBuilder};

/// Case-insensitive literal matcher for the active search keyword.
pub fn build_highlight_regex(keyword: &str) -> Option<Regex> {
    if keyword.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Split `text` into `(matched, segment)` pieces, in order.
pub fn split_matches<'t>(text: &'t str, regex: Option<&Regex>) -> Vec<(bool, &'t str)> {
    let Some(regex) = regex else {
        return vec![(false, text)];
    };
    let mut segments = Vec::new();
    let mut last = 0;
    for found in regex.find_iter(text) {
        if found.start() > last {
            segments.push((false, &text[last..found.start()]));
        }
        segments.push((true, found.as_str()));
        last = found.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push((false, &text[last..]));
    }
    segments
}
