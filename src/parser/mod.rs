//! Line parser for the whitespace-aligned problem listing.
//!
//! Columns are separated by runs of two or more whitespace characters, so a
//! single space inside a title survives. After the id, title and difficulty
//! columns the layout is ambiguous: the premium marker, the comma-joined tag
//! list and the leading metric columns are each optional. The trailing metric
//! columns are anchored to the end of the line and whatever sits between the
//! difficulty and the metrics is consumed by a small state machine:
//!
//! ```text
//! Marker --"会员"--> Tags --any--> Surplus
//!   |                               ^
//!   +------------any----------------+   (field becomes the tag list)
//! ```

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::problem::{IdPrefix, Metrics, Problem, HEADER_ID_LABEL, PREMIUM_MARKER};

/// Lines with fewer fields than this are never records.
pub const MIN_FIELDS: usize = 4;

static FIELD_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid field gap regex"));

/// Which metric columns trail each listing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ListingLayout {
    /// comments, submits, likes
    #[default]
    Popularity,
    /// a single frequency figure
    Frequency,
}

impl ListingLayout {
    pub fn metric_count(self) -> usize {
        match self {
            ListingLayout::Popularity => 3,
            ListingLayout::Frequency => 1,
        }
    }
}

/// Parse one raw listing line. Returns `None` for anything that is not a record.
pub fn parse_line(line: &str, layout: ListingLayout) -> Option<Problem> {
    let fields = split_fields(line);
    if fields.first() == Some(&HEADER_ID_LABEL) {
        tracing::trace!("skipping header echo");
        return None;
    }
    let (id, rest) = take_id(&fields)?;
    if 1 + rest.len() < MIN_FIELDS {
        tracing::trace!(fields = 1 + rest.len(), "skipping short line");
        return None;
    }

    let title = rest[0].to_string();
    let difficulty = rest[1].to_string();
    let tail = resolve_tail(&rest[2..], layout.metric_count());

    Some(Problem {
        id,
        title,
        difficulty,
        premium: tail.premium,
        tags: tail.tags.map(split_tags).unwrap_or_default(),
        metrics: build_metrics(tail.metrics, layout),
    })
}

fn split_fields(line: &str) -> Vec<&str> {
    FIELD_GAP
        .split(line)
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect()
}

/// Rejoin an id such as `LCP 12` that the column splitter tore apart.
fn take_id<'a, 'f>(fields: &'a [&'f str]) -> Option<(String, &'a [&'f str])> {
    let (first, rest) = fields.split_first()?;
    if let (Some(prefix), Some(number)) = (IdPrefix::from_literal(first), rest.first()) {
        if is_numeric_like(number) {
            return Some((format!("{} {}", prefix.literal(), number), &rest[1..]));
        }
    }
    Some((first.to_string(), rest))
}

fn is_numeric_like(field: &str) -> bool {
    field.starts_with(|ch: char| ch.is_ascii_digit())
        && field
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Marker,
    Tags,
    Surplus,
}

#[derive(Debug, Default)]
struct TailFields<'a> {
    premium: bool,
    tags: Option<&'a str>,
    metrics: &'a [&'a str],
}

fn resolve_tail<'a>(tail: &'a [&'a str], metric_count: usize) -> TailFields<'a> {
    let (head, metrics) = tail.split_at(tail.len().saturating_sub(metric_count));
    let mut resolved = TailFields {
        metrics,
        ..TailFields::default()
    };
    let mut slot = Slot::Marker;
    for field in head {
        slot = match slot {
            Slot::Marker if *field == PREMIUM_MARKER => {
                resolved.premium = true;
                Slot::Tags
            }
            Slot::Marker | Slot::Tags => {
                resolved.tags = Some(*field);
                Slot::Surplus
            }
            Slot::Surplus => {
                tracing::trace!(field = *field, "ignoring surplus field");
                Slot::Surplus
            }
        };
    }
    resolved
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_count(field: &str) -> u64 {
    field.parse().unwrap_or(0)
}

// Missing leading metric columns count as zero.
fn build_metrics(fields: &[&str], layout: ListingLayout) -> Metrics {
    let count = layout.metric_count();
    let mut values = vec![0u64; count];
    let offset = count - fields.len();
    for (slot, field) in values[offset..].iter_mut().zip(fields) {
        *slot = parse_count(field);
    }
    match layout {
        ListingLayout::Popularity => Metrics::Popularity {
            comments: values[0],
            submits: values[1],
            likes: values[2],
        },
        ListingLayout::Frequency => Metrics::Frequency(values[0]),
    }
}
