use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::planner::{Task, TaskFilter, TaskStats};
use crate::theme;

pub struct TaskListView;

impl TaskListView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        tasks: &[&Task],
        filter: TaskFilter,
        stats: TaskStats,
        selected: usize,
        today: NaiveDate,
    ) {
        let theme = theme::current();

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

        let summary = Line::from(vec![
            Span::styled(" Total ", theme.dim),
            Span::styled(stats.total.to_string(), theme.header),
            Span::styled("  Completed ", theme.dim),
            Span::styled(stats.completed.to_string(), Style::default().fg(theme.rest)),
            Span::styled("  Pending ", theme.dim),
            Span::styled(stats.pending.to_string(), Style::default().fg(theme.focus)),
            Span::styled("  Overdue ", theme.dim),
            Span::styled(stats.overdue.to_string(), Style::default().fg(theme.error)),
        ]);
        frame.render_widget(Paragraph::new(summary), rows[0]);

        let filter_idx = TaskFilter::ALL.iter().position(|f| *f == filter).unwrap_or(0);
        let tabs = Tabs::new(TaskFilter::ALL.iter().map(|f| f.label()))
            .select(filter_idx)
            .style(theme.dim)
            .highlight_style(theme.selected)
            .divider("|");
        frame.render_widget(tabs, rows[1]);

        let block = Block::default()
            .title(format!(" {} ({}) ", filter.label(), tasks.len()))
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(
                " n:New Space:Done d:Delete f:Filter ",
                theme.dim,
            )))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if tasks.is_empty() {
            let inner = block.inner(rows[2]);
            frame.render_widget(block, rows[2]);
            let msg = match filter {
                TaskFilter::All => "No tasks yet. Add your first task above!",
                _ => "No tasks in this view",
            };
            frame.render_widget(Paragraph::new(msg).style(theme.dim), inner);
            return;
        }

        let items: Vec<ListItem> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| format_task(task, i == selected, today))
            .collect();

        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(List::new(items).block(block), rows[2], &mut state);
    }
}

fn format_task(task: &Task, is_selected: bool, today: NaiveDate) -> ListItem<'static> {
    let theme = theme::current();

    let checkbox = if task.completed { " [x] " } else { " [ ] " };
    let title_style = if is_selected {
        theme.selected
    } else if task.completed {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(checkbox, if is_selected { theme.selected } else { Style::default() }),
        Span::styled(task.title.clone(), title_style),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", task.priority.label()),
            Style::default().fg(theme::priority_color(task.priority)),
        ),
        Span::styled(format!(" {}", task.category.label()), theme.dim),
    ];

    if let Some(due) = task.due_date {
        let overdue = task.is_overdue(today);
        let style = if overdue {
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
        } else {
            theme.dim
        };
        let label = if overdue { " overdue " } else { " due " };
        spans.push(Span::styled(format!("{label}{}", due.format("%b %d, %Y")), style));
    }

    let mut lines = vec![Line::from(spans)];
    if !task.description.is_empty() {
        lines.push(Line::from(Span::styled(format!("     {}", task.description), theme.dim)));
    }
    ListItem::new(lines)
}
