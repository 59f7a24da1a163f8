use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::planner::StudyEvent;
use crate::theme;

pub struct UpcomingList;

impl UpcomingList {
    pub fn render(frame: &mut Frame, area: Rect, events: &[&StudyEvent], today: NaiveDate) {
        let theme = theme::current();

        let block = Block::default()
            .title(" Upcoming Events ")
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No upcoming events").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = events
            .iter()
            .map(|ev| {
                let when = if ev.date == today {
                    "Today".to_string()
                } else {
                    ev.date.format("%b %d").to_string()
                };
                let mut spans = vec![
                    Span::styled(" ", Style::default().bg(theme::event_kind_color(ev.kind))),
                    Span::styled(format!(" {:<7}", when), theme.dim),
                    Span::raw(truncate(&ev.title, inner_w.saturating_sub(9))),
                ];
                if let Some(time) = ev.time {
                    let time_str = format!(" {}", time.format("%H:%M"));
                    if spans.iter().map(|s| s.width()).sum::<usize>() + time_str.len() <= inner_w {
                        spans.push(Span::styled(time_str, theme.dim));
                    }
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

/// Cut `s` to at most `max` characters, ending in "..." when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}
