use crate::problem::Problem;

use super::Category;

impl Category {
    pub fn matches(&self, problem: &Problem) -> bool {
        match self {
            Category::All => true,
            Category::Premium => problem.premium,
            Category::Prefixed(prefix) => problem.id.starts_with(prefix.literal()),
            Category::Plain => problem.prefix().is_none(),
            Category::Tag(tag) => problem.has_tag(tag),
        }
    }
}
