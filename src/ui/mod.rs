use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
};
use ratatui::Frame;
use regex::Regex;

use crate::app::state::{AppState, CategoryPicker};
use crate::highlight::{build_highlight_regex, split_matches};
use crate::parser::ListingLayout;
use crate::problem::Problem;

pub fn draw_app(frame: &mut Frame, state: &AppState, table_state: &mut TableState) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(frame.size());

    let regex = state.highlight_keyword().and_then(build_highlight_regex);
    let highlight_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let layout = state.layout();
    let header = Row::new(
        column_titles(layout)
            .into_iter()
            .map(|title| Cell::from(title).style(Style::default().add_modifier(Modifier::BOLD))),
    )
    .style(Style::default().fg(Color::Cyan));

    let rows: Vec<Row> = state
        .rows()
        .enumerate()
        .map(|(idx, problem)| build_row(idx + 1, problem, layout, regex.as_ref(), highlight_style))
        .collect();

    let title = format!("LeetCodeTop · {}", state.category());
    let table = Table::new(rows, column_widths(layout))
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, vertical[0], table_state);

    let status = Paragraph::new(build_status_line(state)).style(Style::default().fg(Color::Gray));
    frame.render_widget(status, vertical[1]);

    if let Some(picker) = &state.picker {
        render_category_picker(frame, picker);
    }
}

fn column_titles(layout: ListingLayout) -> Vec<&'static str> {
    let mut titles = vec!["序号", "题号", "难度", "会员", "题目名称"];
    match layout {
        ListingLayout::Popularity => titles.extend(["评论数", "提交数", "点赞数"]),
        ListingLayout::Frequency => titles.push("频度"),
    }
    titles.push("标签");
    titles
}

fn column_widths(layout: ListingLayout) -> Vec<Constraint> {
    let mut widths = vec![
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Min(24),
    ];
    match layout {
        ListingLayout::Popularity => widths.extend([
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(9),
        ]),
        ListingLayout::Frequency => widths.push(Constraint::Length(9)),
    }
    widths.push(Constraint::Percentage(25));
    widths
}

fn build_row(
    position: usize,
    problem: &Problem,
    layout: ListingLayout,
    regex: Option<&Regex>,
    highlight_style: Style,
) -> Row<'static> {
    let premium = if problem.premium {
        Cell::from("是").style(Style::default().fg(Color::Yellow))
    } else {
        Cell::from("否")
    };
    let mut cells = vec![
        Cell::from(position.to_string()),
        Cell::from(highlight_line(&problem.id, regex, highlight_style, Style::default())),
        Cell::from(problem.difficulty.clone()).style(difficulty_style(&problem.difficulty)),
        premium,
        Cell::from(highlight_line(
            &problem.title,
            regex,
            highlight_style,
            Style::default(),
        )),
    ];
    match layout {
        ListingLayout::Popularity => cells.extend([
            Cell::from(problem.metrics.comments().to_string()),
            Cell::from(problem.metrics.submits().to_string()),
            Cell::from(problem.metrics.likes().to_string()),
        ]),
        ListingLayout::Frequency => cells.push(Cell::from(problem.metrics.frequency().to_string())),
    }
    cells.push(Cell::from(highlight_line(
        &problem.joined_tags(),
        regex,
        highlight_style,
        Style::default().fg(Color::Green),
    )));
    Row::new(cells)
}

fn difficulty_style(difficulty: &str) -> Style {
    match difficulty {
        "简单" | "Easy" => Style::default().fg(Color::Green),
        "中等" | "Medium" => Style::default().fg(Color::Yellow),
        "困难" | "Hard" => Style::default().fg(Color::Red),
        _ => Style::default(),
    }
}

fn highlight_line(
    text: &str,
    regex: Option<&Regex>,
    highlight_style: Style,
    base_style: Style,
) -> Line<'static> {
    Line::from(
        split_matches(text, regex)
            .into_iter()
            .map(|(matched, segment)| {
                let style = if matched { highlight_style } else { base_style };
                Span::styled(segment.to_string(), style)
            })
            .collect::<Vec<_>>(),
    )
}

fn build_status_line(state: &AppState) -> Text<'static> {
    let position = if state.is_empty() {
        "0/0".to_string()
    } else {
        format!("{}/{}", state.selected + 1, state.len())
    };
    let spec = state.sort_spec();

    let mut spans = vec![
        Span::styled(
            state.summary.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | 行: "),
        Span::raw(position),
        Span::raw(" | 排序: "),
        Span::styled(
            format!("{} {}", spec.key, spec.direction),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    if state.search.active || !state.search.query.is_empty() {
        let label_style = if state.search.active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::raw(" | 搜索 "));
        spans.push(Span::styled("/", label_style));
        if state.search.query.is_empty() {
            spans.push(Span::styled(
                "(题号/名称/标签)",
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(
                state.search.query.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        if state.search.active {
            spans.push(Span::styled(" ▌", Style::default().fg(Color::Cyan)));
        }
    }

    if let Some(message) = &state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Cyan),
        ));
    }

    let hints = Line::from(Span::styled(
        "j/k move • / search • c category • s sort • o order • Ctrl-r reload • q quit",
        Style::default().fg(Color::DarkGray),
    ));
    Text::from(vec![Line::from(spans), hints])
}

fn render_category_picker(frame: &mut Frame, picker: &CategoryPicker) {
    let area = centered_rect(40, 70, frame.size());
    frame.render_widget(Clear, area);
    let items: Vec<ListItem> = picker
        .items
        .iter()
        .map(|category| ListItem::new(category.to_string()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title("筛选 · Enter apply • Esc cancel")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default();
    list_state.select(Some(picker.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}
