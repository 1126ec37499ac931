use std::path::Path;

use crate::catalog;
use crate::parser::ListingLayout;
use crate::problem::Problem;
use crate::query::{Category, SortKey, SortSpec};
use crate::repository::{LoadError, LoadReport, Repository};

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct CategoryPicker {
    pub items: Vec<Category>,
    pub selected: usize,
}

impl CategoryPicker {
    fn open(current: &Category) -> Self {
        let items = catalog::categories();
        let selected = items
            .iter()
            .position(|category| category == current)
            .unwrap_or(0);
        Self { items, selected }
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.items.get(self.selected)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub repo: Repository,
    pub selected: usize,
    pub search: SearchState,
    pub picker: Option<CategoryPicker>,
    /// Outcome of the last load, filter or search.
    pub summary: String,
    pub status_message: Option<String>,
    pub highlight_matches: bool,
}

impl AppState {
    pub fn new(
        mut repo: Repository,
        category: Category,
        sort: SortSpec,
        highlight_matches: bool,
    ) -> Self {
        repo.set_sort(sort);
        repo.filter(category);
        let summary = loaded_summary(repo.len());
        Self {
            repo,
            selected: 0,
            search: SearchState::default(),
            picker: None,
            summary,
            status_message: None,
            highlight_matches,
        }
    }

    pub fn len(&self) -> usize {
        self.repo.view_len()
    }

    pub fn is_empty(&self) -> bool {
        self.repo.view_len() == 0
    }

    pub fn layout(&self) -> ListingLayout {
        self.repo.format().layout
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &Problem> + '_ {
        self.repo.current_view()
    }

    pub fn selected(&self) -> Option<&Problem> {
        self.repo.view_get(self.selected)
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.repo.sort_spec()
    }

    pub fn category(&self) -> &Category {
        self.repo.category()
    }

    /// Keyword to highlight in the table, if highlighting is on.
    pub fn highlight_keyword(&self) -> Option<&str> {
        if !self.highlight_matches || self.repo.keyword().is_empty() {
            None
        } else {
            Some(self.repo.keyword())
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.is_empty() {
            return;
        }
        let last = self.len() as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, last) as usize;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.len().saturating_sub(1);
    }

    pub fn apply_category(&mut self, category: Category) {
        self.search.query.clear();
        let shown = self.repo.filter(category);
        self.summary = format!("筛选: {} | {} 道", self.repo.category(), shown);
        self.selected = 0;
    }

    pub fn cycle_sort_key(&mut self) -> SortKey {
        let keys = catalog::sort_keys(self.layout());
        let spec = self.repo.sort_spec();
        let next = keys
            .iter()
            .position(|key| *key == spec.key)
            .map(|idx| keys[(idx + 1) % keys.len()])
            .unwrap_or_default();
        self.repo.set_sort(SortSpec { key: next, ..spec });
        self.normalize_selection();
        next
    }

    pub fn toggle_direction(&mut self) {
        let spec = self.repo.sort_spec();
        self.repo.set_sort(SortSpec {
            direction: spec.direction.toggled(),
            ..spec
        });
        self.normalize_selection();
    }

    pub fn begin_search(&mut self) {
        self.search.active = true;
        self.picker = None;
    }

    pub fn finish_search(&mut self) {
        self.search.active = false;
    }

    pub fn cancel_search(&mut self) {
        self.search.active = false;
        self.search.query.clear();
        self.apply_search();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.query.push(ch);
        self.apply_search();
    }

    pub fn pop_search_char(&mut self) {
        if self.search.query.pop().is_some() {
            self.apply_search();
        }
    }

    fn apply_search(&mut self) {
        let shown = self.repo.search(&self.search.query);
        self.summary = if self.search.query.is_empty() {
            format!("筛选: {} | {} 道", self.repo.category(), shown)
        } else {
            format!("搜索: {} 道", shown)
        };
        self.selected = 0;
    }

    pub fn open_category_picker(&mut self) {
        self.picker = Some(CategoryPicker::open(self.repo.category()));
    }

    pub fn close_category_picker(&mut self) {
        self.picker = None;
    }

    pub fn picker_move(&mut self, delta: isize) {
        if let Some(picker) = self.picker.as_mut() {
            if picker.items.is_empty() {
                return;
            }
            let last = picker.items.len() as isize - 1;
            picker.selected = (picker.selected as isize + delta).clamp(0, last) as usize;
        }
    }

    pub fn apply_picker(&mut self) {
        let Some(category) = self
            .picker
            .take()
            .and_then(|picker| picker.selected_category().cloned())
        else {
            return;
        };
        self.apply_category(category);
    }

    /// Reload the listing; on failure the current data stays on screen.
    pub fn reload(&mut self, path: &Path) -> Result<LoadReport, LoadError> {
        let report = self.repo.load(path)?;
        self.search = SearchState::default();
        self.picker = None;
        self.repo.resort();
        self.summary = loaded_summary(report.records);
        self.selected = 0;
        Ok(report)
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    fn normalize_selection(&mut self) {
        if self.selected >= self.len() {
            self.selected = self.len().saturating_sub(1);
        }
    }
}

fn loaded_summary(records: usize) -> String {
    format!("共 {} 道题目 | 标签 {} 个", records, catalog::TAGS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Metrics;
    use crate::query::SortDirection;
    use crate::repository::ListingFormat;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn problem(id: &str, title: &str, premium: bool, likes: u64) -> Problem {
        Problem {
            id: id.into(),
            title: title.into(),
            difficulty: "简单".into(),
            premium,
            tags: vec!["数组".into()],
            metrics: Metrics::Popularity {
                comments: 0,
                submits: 0,
                likes,
            },
        }
    }

    fn state() -> AppState {
        let repo = Repository::with_problems(
            ListingFormat::default(),
            vec![
                problem("3", "三数之和", false, 10),
                problem("1", "两数之和", true, 30),
                problem("LCP 2", "两数游戏", false, 20),
            ],
        );
        AppState::new(repo, Category::All, SortSpec::default(), true)
    }

    fn ids(state: &AppState) -> Vec<String> {
        state.rows().map(|problem| problem.id.clone()).collect()
    }

    #[test]
    fn startup_applies_sort_and_reports_totals() {
        let state = state();
        assert_eq!(ids(&state), vec!["1", "3", "LCP 2"]);
        assert_eq!(state.summary, format!("共 3 道题目 | 标签 {} 个", catalog::TAGS.len()));
    }

    #[test]
    fn selection_is_clamped() {
        let mut state = state();
        state.move_selection(10);
        assert_eq!(state.selected, 2);
        state.move_selection(-10);
        assert_eq!(state.selected, 0);
        state.select_last();
        assert_eq!(state.selected().map(|p| p.id.as_str()), Some("LCP 2"));
    }

    #[test]
    fn live_search_updates_view_and_summary() {
        let mut state = state();
        state.begin_search();
        for ch in "两数".chars() {
            state.push_search_char(ch);
        }
        assert_eq!(ids(&state), vec!["1", "LCP 2"]);
        assert_eq!(state.summary, "搜索: 2 道");
        assert_eq!(state.highlight_keyword(), Some("两数"));

        state.cancel_search();
        assert!(!state.search.active);
        assert_eq!(state.len(), 3);
        assert_eq!(state.highlight_keyword(), None);
    }

    #[test]
    fn picker_applies_selected_category() {
        let mut state = state();
        state.open_category_picker();
        let premium_idx = state
            .picker
            .as_ref()
            .and_then(|picker| picker.items.iter().position(|c| *c == Category::Premium))
            .expect("premium entry");
        state.picker_move(premium_idx as isize);
        state.apply_picker();
        assert!(state.picker.is_none());
        assert_eq!(ids(&state), vec!["1"]);
        assert_eq!(state.summary, "筛选: 会员 | 1 道");
    }

    #[test]
    fn sort_cycling_skips_keys_missing_from_layout() {
        let mut state = state();
        assert_eq!(state.cycle_sort_key(), SortKey::Comments);
        assert_eq!(state.cycle_sort_key(), SortKey::Submits);
        assert_eq!(state.cycle_sort_key(), SortKey::Likes);
        assert_eq!(ids(&state), vec!["3", "LCP 2", "1"]);
        state.toggle_direction();
        assert_eq!(state.sort_spec().direction, SortDirection::Descending);
        assert_eq!(ids(&state), vec!["1", "LCP 2", "3"]);
        assert_eq!(state.cycle_sort_key(), SortKey::Identifier);
    }

    #[test]
    fn reload_replaces_data_and_keeps_sort() -> Result<()> {
        let mut state = state();
        state.toggle_direction();
        state.apply_category(Category::Premium);

        let mut file = NamedTempFile::new()?;
        write!(file, "a\nb\nc\n5  五  简单  1  2  3\n9  九  简单  1  2  3\n")?;
        let report = state.reload(file.path())?;
        assert_eq!(report.records, 2);
        assert_eq!(ids(&state), vec!["9", "5"]);
        assert_eq!(state.category(), &Category::All);
        Ok(())
    }

    #[test]
    fn failed_reload_keeps_current_rows() -> Result<()> {
        let mut state = state();
        let dir = tempfile::tempdir()?;
        assert!(state.reload(&dir.path().join("absent.txt")).is_err());
        assert_eq!(state.len(), 3);
        Ok(())
    }
}
