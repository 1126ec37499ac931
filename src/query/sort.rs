use std::cmp::Ordering;

use crate::problem::{IdPrefix, Problem};

use super::{SortKey, SortSpec};

/// Collation tier of an identifier. Tiers sort in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IdBucket {
    Numeric = 0,
    Lcp = 1,
    Lcr = 2,
    Lcs = 3,
    Interview = 4,
    Other = 9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank<'a> {
    Number(u64),
    Text(&'a str),
}

/// Derived ordering key for an identifier: bucket first, then number or remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IdSortKey<'a> {
    bucket: IdBucket,
    rank: Rank<'a>,
}

impl<'a> IdSortKey<'a> {
    pub fn new(id: &'a str) -> Self {
        if let Some(number) = parse_digits(id) {
            return Self::number(IdBucket::Numeric, number);
        }
        match IdPrefix::of(id) {
            Some(IdPrefix::Interview) => {
                let rest = id[IdPrefix::Interview.literal().len()..].trim_start();
                Self {
                    bucket: IdBucket::Interview,
                    rank: Rank::Text(rest),
                }
            }
            Some(prefix) => {
                let bucket = match prefix {
                    IdPrefix::Lcp => IdBucket::Lcp,
                    IdPrefix::Lcr => IdBucket::Lcr,
                    _ => IdBucket::Lcs,
                };
                match parse_digits(id[prefix.literal().len()..].trim_start()) {
                    Some(number) => Self::number(bucket, number),
                    None => Self::other(id),
                }
            }
            None => Self::other(id),
        }
    }

    pub fn bucket(&self) -> IdBucket {
        self.bucket
    }

    fn number(bucket: IdBucket, number: u64) -> Self {
        Self {
            bucket,
            rank: Rank::Number(number),
        }
    }

    fn other(id: &'a str) -> Self {
        Self {
            bucket: IdBucket::Other,
            rank: Rank::Text(id),
        }
    }
}

fn parse_digits(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Ascending identifier collation.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    IdSortKey::new(a).cmp(&IdSortKey::new(b))
}

/// Full comparator for a sort selection; descending is the exact reverse of ascending.
///
/// Ties on the key fall back to identifier collation and then the raw id, so
/// only records with identical ids compare equal.
pub fn compare_problems(a: &Problem, b: &Problem, spec: SortSpec) -> Ordering {
    let primary = match spec.key {
        SortKey::Identifier => compare_ids(&a.id, &b.id),
        SortKey::Comments => a.metrics.comments().cmp(&b.metrics.comments()),
        SortKey::Submits => a.metrics.submits().cmp(&b.metrics.submits()),
        SortKey::Likes => a.metrics.likes().cmp(&b.metrics.likes()),
        SortKey::Frequency => a.metrics.frequency().cmp(&b.metrics.frequency()),
    };
    let ascending = primary
        .then_with(|| compare_ids(&a.id, &b.id))
        .then_with(|| a.id.cmp(&b.id));
    spec.direction.orient(ascending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Metrics;

    fn sorted(ids: &[&str]) -> Vec<String> {
        let mut ids: Vec<&str> = ids.to_vec();
        ids.sort_by(|a, b| compare_ids(a, b));
        ids.into_iter().map(String::from).collect()
    }

    #[test]
    fn buckets_follow_prefix_order() {
        assert_eq!(
            sorted(&["10", "LCP 1", "2", "LCR 3"]),
            vec!["2", "10", "LCP 1", "LCR 3"]
        );
        assert_eq!(
            sorted(&["zzz", "面试题 01.02", "LCS 1", "LCR 100", "LCP 99", "3000"]),
            vec!["3000", "LCP 99", "LCR 100", "LCS 1", "面试题 01.02", "zzz"]
        );
    }

    #[test]
    fn numbers_compare_by_value_not_text() {
        assert_eq!(sorted(&["100", "9", "20"]), vec!["9", "20", "100"]);
        assert_eq!(sorted(&["LCR 010", "LCR 9"]), vec!["LCR 9", "LCR 010"]);
        assert_eq!(compare_ids("12345678901", "9"), Ordering::Greater);
    }

    #[test]
    fn bucket_assignment() {
        assert_eq!(IdSortKey::new("42").bucket(), IdBucket::Numeric);
        assert_eq!(IdSortKey::new("LCP 7").bucket(), IdBucket::Lcp);
        assert_eq!(IdSortKey::new("LCR 7").bucket(), IdBucket::Lcr);
        assert_eq!(IdSortKey::new("LCS 7").bucket(), IdBucket::Lcs);
        assert_eq!(IdSortKey::new("面试题 17.10").bucket(), IdBucket::Interview);
        assert_eq!(IdSortKey::new("LCP abc").bucket(), IdBucket::Other);
        assert_eq!(IdSortKey::new("-3").bucket(), IdBucket::Other);
        assert_eq!(IdSortKey::new("剑指 Offer 03").bucket(), IdBucket::Other);
    }

    #[test]
    fn interview_ids_compare_lexically_on_remainder() {
        assert_eq!(
            sorted(&["面试题 17.10", "面试题 01.02", "面试题 04.01"]),
            vec!["面试题 01.02", "面试题 04.01", "面试题 17.10"]
        );
    }

    #[test]
    fn descending_is_exact_reverse() {
        let problems: Vec<Problem> = [("3", 5), ("LCP 1", 1), ("1", 9), ("面试题 02.01", 3)]
            .into_iter()
            .map(|(id, likes)| Problem {
                id: id.into(),
                title: id.into(),
                difficulty: String::new(),
                premium: false,
                tags: Vec::new(),
                metrics: Metrics::Popularity {
                    comments: 0,
                    submits: 0,
                    likes,
                },
            })
            .collect();
        for key in [SortKey::Identifier, SortKey::Likes] {
            let mut ascending: Vec<&Problem> = problems.iter().collect();
            ascending.sort_by(|a, b| compare_problems(a, b, SortSpec::new(key, true)));
            let mut descending: Vec<&Problem> = problems.iter().collect();
            descending.sort_by(|a, b| compare_problems(a, b, SortSpec::new(key, false)));
            descending.reverse();
            assert_eq!(ascending, descending);
        }
    }

    #[test]
    fn ties_break_on_identifier_in_both_directions() {
        let problems: Vec<Problem> = [("2", 5), ("1", 5), ("3", 1), ("LCP 1", 1), ("LCP 01", 1)]
            .into_iter()
            .map(|(id, likes)| Problem {
                id: id.into(),
                title: id.into(),
                difficulty: String::new(),
                premium: false,
                tags: Vec::new(),
                metrics: Metrics::Popularity {
                    comments: 0,
                    submits: 0,
                    likes,
                },
            })
            .collect();
        let order = |ascending: bool| {
            let mut rows: Vec<&str> = problems.iter().map(|p| p.id.as_str()).collect();
            rows.sort_by(|a, b| {
                let a = problems.iter().find(|p| p.id == *a).expect("row");
                let b = problems.iter().find(|p| p.id == *b).expect("row");
                compare_problems(a, b, SortSpec::new(SortKey::Likes, ascending))
            });
            rows
        };
        assert_eq!(order(true), vec!["3", "LCP 01", "LCP 1", "1", "2"]);
        let mut descending = order(false);
        descending.reverse();
        assert_eq!(descending, order(true));
        assert_eq!(compare_ids("LCP 01", "LCP 1"), Ordering::Equal);
    }

    #[test]
    fn absent_metric_sorts_as_zero() {
        let frequency = Problem {
            id: "1".into(),
            title: "a".into(),
            difficulty: String::new(),
            premium: false,
            tags: Vec::new(),
            metrics: Metrics::Frequency(50),
        };
        let popularity = Problem {
            metrics: Metrics::Popularity {
                comments: 1,
                submits: 1,
                likes: 1,
            },
            ..frequency.clone()
        };
        let spec = SortSpec::new(SortKey::Likes, true);
        assert_eq!(compare_problems(&frequency, &popularity, spec), Ordering::Less);
    }
}
