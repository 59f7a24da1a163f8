use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::QUICK_ACTIONS;
use crate::theme;

pub struct HomeView;

impl HomeView {
    pub fn render(frame: &mut Frame, area: Rect, quote: &str, selected: usize) {
        let theme = theme::current();

        let rows = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(6),
        ])
        .split(area);

        let hero = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Welcome to Your Academic Journey",
                theme.header.fg(theme.accent),
            )),
            Line::from(Span::styled(
                "Stay organized, focused, and motivated with your personal study companion",
                theme.dim,
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(hero, rows[0]);

        let quote_block = Block::default()
            .title(" Quote ")
            .title_bottom(Line::from(Span::styled(" r:New Quote ", theme.dim)))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);
        let quote = Paragraph::new(Line::from(Span::styled(
            format!("\"{quote}\""),
            Style::default().add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(quote_block);
        frame.render_widget(quote, rows[1]);

        let items: Vec<ListItem> = QUICK_ACTIONS
            .iter()
            .enumerate()
            .map(|(i, (page, description))| {
                let title_style = if i == selected {
                    theme.selected
                } else {
                    theme.header
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!(" [{}] ", page.index() + 1), theme.dim),
                        Span::styled(page.title(), title_style),
                    ]),
                    Line::from(Span::styled(format!("     {description}"), theme.dim)),
                ])
            })
            .collect();

        let actions = List::new(items).block(
            Block::default()
                .title(" Quick Actions ")
                .title_style(theme.header)
                .borders(Borders::ALL)
                .border_style(theme.border),
        );
        frame.render_widget(actions, rows[2]);
    }
}
