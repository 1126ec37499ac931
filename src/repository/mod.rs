use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::parser::{parse_line, ListingLayout};
use crate::problem::Problem;
use crate::query::{compare_problems, Category, KeywordMatcher, SortKey, SortSpec};

/// Leading lines of a listing that never carry records.
pub const HEADER_LINES: usize = 3;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed opening listing {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed reading listing {path} at line {line}: {source}")]
    Read {
        path: String,
        line: usize,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingFormat {
    pub header_lines: usize,
    pub layout: ListingLayout,
}

impl Default for ListingFormat {
    fn default() -> Self {
        Self {
            header_lines: HEADER_LINES,
            layout: ListingLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub records: usize,
    pub skipped: usize,
}

/// Loaded problems plus the filtered view derived from them.
///
/// The view holds indices into the loaded set and is rebuilt from scratch by
/// every filter, sort and search call. The active category, sort selection
/// and keyword are remembered so later calls can re-apply them.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    format: ListingFormat,
    problems: Vec<Problem>,
    view: Vec<usize>,
    category: Category,
    sort: SortSpec,
    keyword: String,
}

impl Repository {
    pub fn new(format: ListingFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_problems(format: ListingFormat, problems: Vec<Problem>) -> Self {
        let mut repo = Self::new(format);
        repo.replace_problems(problems);
        repo
    }

    pub fn format(&self) -> ListingFormat {
        self.format
    }

    /// Replace the loaded set with the contents of `path`.
    ///
    /// On success the view holds every record in load order with the category
    /// reset to all; the sort selection is kept but not applied until the next
    /// filter, sort, search or [`Repository::resort`]. On failure the
    /// previously loaded set and view are left untouched.
    pub fn load(&mut self, path: &Path) -> Result<LoadReport, LoadError> {
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: origin.clone(),
            source,
        })?;
        self.load_from_reader(BufReader::new(file), &origin)
    }

    pub fn load_from_reader<R: BufRead>(
        &mut self,
        mut reader: R,
        origin: &str,
    ) -> Result<LoadReport, LoadError> {
        let mut problems = Vec::new();
        let mut skipped = 0;
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| LoadError::Read {
                    path: origin.to_string(),
                    line: line_no + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_no += 1;
            if line_no <= self.format.header_lines {
                continue;
            }
            match parse_line(&decode_line(&buf), self.format.layout) {
                Some(problem) => problems.push(problem),
                None => skipped += 1,
            }
        }

        let report = LoadReport {
            records: problems.len(),
            skipped,
        };
        tracing::info!(
            path = origin,
            records = report.records,
            skipped = report.skipped,
            "loaded problem listing"
        );
        self.replace_problems(problems);
        Ok(report)
    }

    fn replace_problems(&mut self, problems: Vec<Problem>) {
        self.view = (0..problems.len()).collect();
        self.problems = problems;
        self.category = Category::All;
        self.keyword.clear();
    }

    /// Show the problems in `category`, re-applying the active sort. Clears any keyword.
    pub fn filter(&mut self, category: Category) -> usize {
        self.keyword.clear();
        self.view = self.matching(&category, None);
        self.category = category;
        self.apply_sort();
        tracing::debug!(category = %self.category, shown = self.view.len(), "applied filter");
        self.view.len()
    }

    pub fn sort(&mut self, key: SortKey, ascending: bool) {
        self.set_sort(SortSpec::new(key, ascending));
    }

    pub fn set_sort(&mut self, spec: SortSpec) {
        self.sort = spec;
        self.apply_sort();
    }

    /// Narrow the active category by `keyword`; an empty keyword re-applies the category.
    pub fn search(&mut self, keyword: &str) -> usize {
        let Some(matcher) = KeywordMatcher::new(keyword) else {
            return self.filter(self.category.clone());
        };
        self.view = self.matching(&self.category, Some(&matcher));
        self.keyword = keyword.to_string();
        self.apply_sort();
        tracing::debug!(keyword, shown = self.view.len(), "applied search");
        self.view.len()
    }

    fn matching(&self, category: &Category, matcher: Option<&KeywordMatcher>) -> Vec<usize> {
        self.problems
            .iter()
            .enumerate()
            .filter(|(_, problem)| category.matches(problem))
            .filter(|(_, problem)| matcher.map_or(true, |matcher| matcher.matches(problem)))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Re-apply the remembered sort selection to the current view.
    pub fn resort(&mut self) {
        self.apply_sort();
    }

    // Load position settles records with identical ids, so descending mirrors ascending.
    fn apply_sort(&mut self) {
        let problems = &self.problems;
        let spec = self.sort;
        self.view.sort_by(|&a, &b| {
            compare_problems(&problems[a], &problems[b], spec)
                .then_with(|| spec.direction.orient(a.cmp(&b)))
        });
    }

    pub fn current_view(&self) -> impl ExactSizeIterator<Item = &Problem> + '_ {
        self.view.iter().map(|&idx| &self.problems[idx])
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn view_get(&self, position: usize) -> Option<&Problem> {
        self.view.get(position).map(|&idx| &self.problems[idx])
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let mut end = raw.len();
    while end > 0 && matches!(raw[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    String::from_utf8_lossy(&raw[..end])
}
