use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use indexmap::IndexMap;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::catalog;
use crate::config::AppConfig;
use crate::parser::ListingLayout;
use crate::problem::Problem;
use crate::query::{Category, SortDirection, SortKey, SortSpec};
use crate::repository::Repository;

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Category or tag name (全部, 普通题, LCP, LCR, LCS, 面试题, 会员, or any tag)
    #[arg(long, short)]
    pub category: Option<String>,
    /// Sort key (题号/id, 评论数/comments, 提交数/submits, 点赞数/likes, 频度/frequency)
    #[arg(long, short)]
    pub sort: Option<String>,
    /// Sort ascending
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Keep only problems whose id, title or tags contain this text
    #[arg(long)]
    pub search: Option<String>,
    /// Limit the number of rows printed (0 prints everything)
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
    /// Print the rows as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Show how many loaded problems fall into each entry
    #[arg(long)]
    pub counts: bool,
}

pub fn load_repository(config: &AppConfig) -> Result<Repository> {
    let mut repo = Repository::new(config.listing_format());
    repo.load(&config.data_file)
        .with_context(|| format!("加载失败: {}", config.data_file.display()))?;
    Ok(repo)
}

pub fn run_tui(config: Arc<AppConfig>, repo: Repository) -> Result<()> {
    let category = config.default_category();
    let data_file = config.data_file.clone();
    let mut app = App::new(config, data_file, repo, category);
    app.run()
}

pub fn list_problems(config: &AppConfig, repo: Repository, args: ListArgs) -> Result<()> {
    let output = run_list(config, repo, &args)?;
    print!("{output}");
    Ok(())
}

/// The static catalog needs no data; the listing is only read for `--counts`.
pub fn print_catalog(config: &AppConfig, args: CatalogArgs) -> Result<()> {
    let repo = if args.counts {
        Some(load_repository(config)?)
    } else {
        None
    };
    print!("{}", run_catalog(config.layout, repo.as_ref()));
    Ok(())
}

fn run_list(config: &AppConfig, mut repo: Repository, args: &ListArgs) -> Result<String> {
    let layout = repo.format().layout;
    let spec = resolve_sort(config.default_sort, args, layout)?;
    let category = args
        .category
        .as_deref()
        .map(|name| Category::from_name(name.trim()))
        .unwrap_or_else(|| config.default_category());

    repo.set_sort(spec);
    let mut shown = repo.filter(category);
    let mut footer = format!("筛选: {} | {} 道", repo.category(), shown);
    if let Some(keyword) = args.search.as_deref().filter(|keyword| !keyword.is_empty()) {
        shown = repo.search(keyword);
        footer = format!("搜索: {} 道", shown);
    }

    let limit = if args.limit == 0 { usize::MAX } else { args.limit };
    let rows: Vec<&Problem> = repo.current_view().take(limit).collect();
    if args.json {
        let mut json = serde_json::to_string_pretty(&rows).context("serializing problems")?;
        json.push('\n');
        return Ok(json);
    }
    if rows.is_empty() {
        return Ok(format!("No problems matched.\n{footer}\n"));
    }

    let mut out = format_table(&rows, layout);
    if rows.len() < shown {
        let _ = writeln!(&mut out, "… {} more", shown - rows.len());
    }
    let _ = writeln!(&mut out, "{footer}");
    Ok(out)
}

fn resolve_sort(default: SortSpec, args: &ListArgs, layout: ListingLayout) -> Result<SortSpec> {
    let mut spec = default;
    if let Some(name) = args.sort.as_deref() {
        let Ok(key) = SortKey::from_str(name.trim()) else {
            bail!("unknown sort key '{name}'");
        };
        spec.key = key;
    }
    if !spec.key.applies_to(layout) {
        bail!("sort key '{}' is not available for {layout:?} listings", spec.key);
    }
    if args.asc {
        spec.direction = SortDirection::Ascending;
    } else if args.desc {
        spec.direction = SortDirection::Descending;
    }
    Ok(spec)
}

fn format_table(rows: &[&Problem], layout: ListingLayout) -> String {
    let mut header = vec!["序号", "题号", "难度", "会员", "题目名称"];
    match layout {
        ListingLayout::Popularity => header.extend(["评论数", "提交数", "点赞数"]),
        ListingLayout::Frequency => header.push("频度"),
    }
    header.push("标签");

    let mut table: Vec<Vec<String>> = vec![header.iter().map(|title| title.to_string()).collect()];
    for (idx, problem) in rows.iter().enumerate() {
        let mut cells = vec![
            (idx + 1).to_string(),
            problem.id.clone(),
            problem.difficulty.clone(),
            if problem.premium { "是" } else { "否" }.to_string(),
            problem.title.clone(),
        ];
        match layout {
            ListingLayout::Popularity => cells.extend([
                problem.metrics.comments().to_string(),
                problem.metrics.submits().to_string(),
                problem.metrics.likes().to_string(),
            ]),
            ListingLayout::Frequency => cells.push(problem.metrics.frequency().to_string()),
        }
        cells.push(problem.joined_tags());
        table.push(cells);
    }

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            table
                .iter()
                .map(|row| UnicodeWidthStr::width(row[col].as_str()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in &table {
        let last = row.len() - 1;
        for (col, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if col < last {
                let pad = widths[col] - UnicodeWidthStr::width(cell.as_str()) + 2;
                out.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push('\n');
    }
    out
}

fn run_catalog(layout: ListingLayout, repo: Option<&Repository>) -> String {
    let mut out = String::new();
    let Some(repo) = repo else {
        let _ = writeln!(&mut out, "排序: {}", sort_key_names(layout));
        for name in catalog::category_names() {
            let _ = writeln!(&mut out, "{name}");
        }
        return out;
    };

    let mut counts: IndexMap<String, usize> = catalog::categories()
        .into_iter()
        .map(|category| {
            let count = repo
                .problems()
                .iter()
                .filter(|problem| category.matches(problem))
                .count();
            (category.to_string(), count)
        })
        .collect();
    let known = counts.len();
    for problem in repo.problems() {
        for tag in &problem.tags {
            if !catalog::TAGS.contains(&tag.as_str()) {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
    }

    let width = counts
        .keys()
        .map(|name| UnicodeWidthStr::width(name.as_str()))
        .max()
        .unwrap_or(0);
    for (idx, (name, count)) in counts.iter().enumerate() {
        let pad = width - UnicodeWidthStr::width(name.as_str()) + 2;
        let marker = if idx >= known { "  (未收录)" } else { "" };
        let _ = writeln!(&mut out, "{name}{}{count}{marker}", " ".repeat(pad));
    }
    out
}

fn sort_key_names(layout: ListingLayout) -> String {
    catalog::sort_keys(layout)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Metrics;
    use crate::repository::ListingFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    type TestResult<T = ()> = Result<T>;

    fn problem(id: &str, title: &str, premium: bool, tags: &[&str], likes: u64) -> Problem {
        Problem {
            id: id.into(),
            title: title.into(),
            difficulty: "简单".into(),
            premium,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            metrics: Metrics::Popularity {
                comments: 1,
                submits: 2,
                likes,
            },
        }
    }

    fn repo() -> Repository {
        Repository::with_problems(
            ListingFormat::default(),
            vec![
                problem("10", "正则表达式匹配", true, &["字符串", "动态规划"], 5),
                problem("LCP 1", "猜数字", false, &["模拟"], 50),
                problem("2", "两数相加", false, &["链表", "自定义"], 500),
            ],
        )
    }

    #[test]
    fn cli_list_prints_sorted_table_with_footer() -> TestResult {
        let output = run_list(&AppConfig::default(), repo(), &ListArgs::default())?;
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("序号"));
        assert!(lines[1].contains("两数相加"));
        assert!(lines[2].contains("正则表达式匹配"));
        assert!(lines[3].contains("猜数字"));
        assert_eq!(lines[4], "筛选: 全部 | 3 道");
        Ok(())
    }

    #[test]
    fn cli_list_aligns_wide_characters() -> TestResult {
        let output = run_list(&AppConfig::default(), repo(), &ListArgs::default())?;
        let lines: Vec<&str> = output.lines().collect();
        let column = |line: &str| {
            let idx = line.find("简单").or_else(|| line.find("难度")).expect("column");
            UnicodeWidthStr::width(&line[..idx])
        };
        assert_eq!(column(lines[0]), column(lines[1]));
        assert_eq!(column(lines[1]), column(lines[3]));
        Ok(())
    }

    #[test]
    fn cli_list_filters_searches_and_sorts() -> TestResult {
        let args = ListArgs {
            category: Some("普通题".into()),
            sort: Some("likes".into()),
            desc: true,
            search: Some("两数".into()),
            ..ListArgs::default()
        };
        let output = run_list(&AppConfig::default(), repo(), &args)?;
        assert!(output.contains("两数相加"));
        assert!(!output.contains("猜数字"));
        assert!(output.ends_with("搜索: 1 道\n"));
        Ok(())
    }

    #[test]
    fn cli_list_limit_and_json() -> TestResult {
        let args = ListArgs {
            sort: Some("点赞数".into()),
            desc: true,
            limit: 1,
            json: true,
            ..ListArgs::default()
        };
        let output = run_list(&AppConfig::default(), repo(), &args)?;
        let rows: serde_json::Value = serde_json::from_str(&output)?;
        let rows = rows.as_array().expect("array");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "2");
        assert_eq!(rows[0]["metrics"]["popularity"]["likes"], 500);

        let args = ListArgs {
            limit: 2,
            ..ListArgs::default()
        };
        let output = run_list(&AppConfig::default(), repo(), &args)?;
        assert!(output.contains("… 1 more"));
        Ok(())
    }

    #[test]
    fn cli_list_rejects_unknown_or_unavailable_sort_keys() {
        let args = ListArgs {
            sort: Some("stars".into()),
            ..ListArgs::default()
        };
        assert!(run_list(&AppConfig::default(), repo(), &args).is_err());

        let args = ListArgs {
            sort: Some("frequency".into()),
            ..ListArgs::default()
        };
        assert!(run_list(&AppConfig::default(), repo(), &args).is_err());
    }

    #[test]
    fn cli_list_reports_empty_result() -> TestResult {
        let args = ListArgs {
            category: Some("不存在".into()),
            ..ListArgs::default()
        };
        let output = run_list(&AppConfig::default(), repo(), &args)?;
        assert_eq!(output, "No problems matched.\n筛选: 不存在 | 0 道\n");
        Ok(())
    }

    #[test]
    fn cli_catalog_lists_menu_and_counts() {
        let plain = run_catalog(ListingLayout::Popularity, None);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines[0], "排序: 题号, 评论数, 提交数, 点赞数");
        assert_eq!(lines[1], "全部");
        assert_eq!(lines.len(), 1 + 7 + catalog::TAGS.len());

        let repo = repo();
        let counted = run_catalog(repo.format().layout, Some(&repo));
        let count_of = |name: &str| {
            counted
                .lines()
                .find(|line| line.split_whitespace().next() == Some(name))
                .and_then(|line| line.split_whitespace().nth(1))
                .map(str::to_string)
        };
        assert_eq!(count_of("全部").as_deref(), Some("3"));
        assert_eq!(count_of("会员").as_deref(), Some("1"));
        assert_eq!(count_of("LCP").as_deref(), Some("1"));
        assert_eq!(count_of("普通题").as_deref(), Some("2"));
        assert_eq!(count_of("链表").as_deref(), Some("1"));
        assert!(counted.lines().last().is_some_and(|line| line.starts_with("自定义")
            && line.ends_with("(未收录)")));
    }

    #[test]
    fn cli_catalog_without_counts_skips_missing_listing() -> TestResult {
        let dir = tempfile::tempdir()?;
        let config = AppConfig {
            data_file: dir.path().join("absent.txt"),
            layout: ListingLayout::Frequency,
            ..AppConfig::default()
        };
        print_catalog(&config, CatalogArgs::default())?;
        assert!(print_catalog(&config, CatalogArgs { counts: true }).is_err());
        assert!(run_catalog(config.layout, None).starts_with("排序: 题号, 频度\n"));
        Ok(())
    }

    #[test]
    fn load_repository_reports_missing_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let config = AppConfig {
            data_file: dir.path().join("absent.txt"),
            ..AppConfig::default()
        };
        let err = load_repository(&config).expect_err("missing listing");
        assert!(format!("{err:#}").contains("加载失败"));

        let mut file = NamedTempFile::new()?;
        write!(file, "x\ny\nz\n1  两数之和  简单  数组  1  2  3\n")?;
        let config = AppConfig {
            data_file: file.path().to_path_buf(),
            ..AppConfig::default()
        };
        assert_eq!(load_repository(&config)?.len(), 1);
        Ok(())
    }
}
