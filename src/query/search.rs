use crate::problem::Problem;

/// Case-insensitive substring match over id, title and the comma-joined tags.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    needle: String,
}

impl KeywordMatcher {
    /// `None` when the keyword is empty; an empty search means "no narrowing".
    pub fn new(keyword: &str) -> Option<Self> {
        if keyword.is_empty() {
            return None;
        }
        Some(Self {
            needle: keyword.to_lowercase(),
        })
    }

    pub fn matches(&self, problem: &Problem) -> bool {
        [
            problem.id.to_lowercase(),
            problem.title.to_lowercase(),
            problem.joined_tags().to_lowercase(),
        ]
        .iter()
        .any(|haystack| haystack.contains(&self.needle))
    }
}
