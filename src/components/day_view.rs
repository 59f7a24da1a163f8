use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::planner::StudyEvent;
use crate::theme;

pub struct DayView;

impl DayView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        events: &[&StudyEvent],
        selected: usize,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count_str = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {n} events "),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No events. Press n to add one.").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let mut items: Vec<ListItem> = Vec::new();

        for (i, ev) in events.iter().enumerate() {
            let is_selected = i == selected;
            let kind_indicator = Span::styled("  ", Style::default().bg(theme::event_kind_color(ev.kind)));
            let time_span = Span::styled(
                format!(" {:<7} ", ev.time_display()),
                Style::default().add_modifier(Modifier::DIM),
            );
            let title_style = if is_selected { theme.selected } else { Style::default() };
            let title_span = Span::styled(ev.title.clone(), title_style);

            let mut spans = vec![kind_indicator, time_span, title_span];
            let used = 2 + 9 + ev.title.len();
            let kind = format!(" [{}]", ev.kind.label());
            if used + kind.len() <= inner_w {
                spans.push(Span::styled(kind, theme.dim));
            }

            let mut lines = vec![Line::from(spans)];
            if !ev.description.is_empty() {
                lines.push(Line::from(Span::styled(format!("           {}", ev.description), theme.dim)));
            }
            items.push(ListItem::new(lines));
        }

        let list = List::new(items).block(block);
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
