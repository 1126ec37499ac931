use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::parser::ListingLayout;
use crate::problem::{IdPrefix, PREMIUM_MARKER};

mod filter;
mod search;
mod sort;

pub use search::KeywordMatcher;
pub use sort::{compare_ids, compare_problems, IdBucket, IdSortKey};

pub const ALL_LABEL: &str = "全部";
pub const PLAIN_LABEL: &str = "普通题";

/// Named predicate over problems. Any name that is not a built-in category is a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    All,
    Plain,
    Prefixed(IdPrefix),
    Premium,
    Tag(String),
}

impl Category {
    pub fn builtin() -> Vec<Category> {
        let mut categories = vec![Category::All, Category::Plain];
        categories.extend(IdPrefix::ALL.into_iter().map(Category::Prefixed));
        categories.push(Category::Premium);
        categories
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            ALL_LABEL => Category::All,
            PLAIN_LABEL => Category::Plain,
            PREMIUM_MARKER => Category::Premium,
            other => IdPrefix::from_literal(other)
                .map(Category::Prefixed)
                .unwrap_or_else(|| Category::Tag(other.to_string())),
        }
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Category::from_name(name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str(ALL_LABEL),
            Category::Plain => f.write_str(PLAIN_LABEL),
            Category::Prefixed(prefix) => f.write_str(prefix.literal()),
            Category::Premium => f.write_str(PREMIUM_MARKER),
            Category::Tag(tag) => f.write_str(tag),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum SortKey {
    #[default]
    #[strum(to_string = "题号", serialize = "id", serialize = "identifier")]
    Identifier,
    #[strum(to_string = "评论数", serialize = "comments")]
    Comments,
    #[strum(to_string = "提交数", serialize = "submits")]
    Submits,
    #[strum(to_string = "点赞数", serialize = "likes")]
    Likes,
    #[strum(to_string = "频度", serialize = "frequency")]
    Frequency,
}

impl SortKey {
    pub fn applies_to(self, layout: ListingLayout) -> bool {
        match self {
            SortKey::Identifier => true,
            SortKey::Comments | SortKey::Submits | SortKey::Likes => {
                layout == ListingLayout::Popularity
            }
            SortKey::Frequency => layout == ListingLayout::Frequency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    #[default]
    #[strum(to_string = "升序")]
    Ascending,
    #[strum(to_string = "降序")]
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }

    pub fn toggled(self) -> Self {
        Self::from_ascending(!self.is_ascending())
    }

    /// Turn an ascending ordering into one for this direction.
    pub fn orient(self, ascending: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ascending,
            SortDirection::Descending => ascending.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, ascending: bool) -> Self {
        Self {
            key,
            direction: SortDirection::from_ascending(ascending),
        }
    }
}
