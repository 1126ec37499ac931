use serde::Serialize;

/// Marker field that flags a members-only problem.
pub const PREMIUM_MARKER: &str = "会员";
/// Header label of the id column; a line starting with it is a header echo.
pub const HEADER_ID_LABEL: &str = "题号";

/// Recognised identifier prefixes, in collation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    Lcp,
    Lcr,
    Lcs,
    Interview,
}

impl IdPrefix {
    pub const ALL: [IdPrefix; 4] = [IdPrefix::Lcp, IdPrefix::Lcr, IdPrefix::Lcs, IdPrefix::Interview];

    pub fn literal(self) -> &'static str {
        match self {
            IdPrefix::Lcp => "LCP",
            IdPrefix::Lcr => "LCR",
            IdPrefix::Lcs => "LCS",
            IdPrefix::Interview => "面试题",
        }
    }

    pub fn from_literal(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|prefix| prefix.literal() == token)
    }

    /// Prefix the id starts with, if any.
    pub fn of(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|prefix| id.starts_with(prefix.literal()))
    }
}

/// Popularity figures carried by a listing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metrics {
    Popularity { comments: u64, submits: u64, likes: u64 },
    Frequency(u64),
}

impl Metrics {
    pub fn comments(&self) -> u64 {
        match self {
            Metrics::Popularity { comments, .. } => *comments,
            Metrics::Frequency(_) => 0,
        }
    }

    pub fn submits(&self) -> u64 {
        match self {
            Metrics::Popularity { submits, .. } => *submits,
            Metrics::Frequency(_) => 0,
        }
    }

    pub fn likes(&self) -> u64 {
        match self {
            Metrics::Popularity { likes, .. } => *likes,
            Metrics::Frequency(_) => 0,
        }
    }

    pub fn frequency(&self) -> u64 {
        match self {
            Metrics::Frequency(value) => *value,
            Metrics::Popularity { .. } => 0,
        }
    }
}

/// One problem entry from the listing. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    pub premium: bool,
    pub tags: Vec<String>,
    pub metrics: Metrics,
}

impl Problem {
    pub fn prefix(&self) -> Option<IdPrefix> {
        IdPrefix::of(&self.id)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    pub fn joined_tags(&self) -> String {
        self.tags.join(",")
    }
}
