use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::planner::Subject;
use crate::theme;

pub struct SubjectList;

impl SubjectList {
    /// Subject list on the left, selected subject's card on the right.
    pub fn render(frame: &mut Frame, area: Rect, subjects: &[Subject], selected: usize) {
        let theme = theme::current();

        let block = Block::default()
            .title(format!(" Academic Subjects ({}) ", subjects.len()))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        if subjects.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new(vec![
                Line::from(Span::styled("No subjects yet", theme.header)),
                Line::from(Span::styled(
                    "Add your first subject to start tracking your academic progress! (n)",
                    theme.dim,
                )),
            ])
            .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        }

        let cols = if area.width >= 70 {
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(area)
        } else {
            Layout::vertical([Constraint::Min(5), Constraint::Length(8)]).split(area)
        };

        let items: Vec<ListItem> = subjects
            .iter()
            .enumerate()
            .map(|(i, subject)| {
                let name_style = if i == selected { theme.selected } else { Style::default() };
                let avg = match subject.average() {
                    Some(avg) => format!(" {:>5.1}", avg),
                    None => "    --".to_string(),
                };
                let avg_style = subject
                    .band()
                    .map(|b| Style::default().fg(theme::band_color(b)))
                    .unwrap_or(theme.dim);
                ListItem::new(Line::from(vec![
                    Span::styled("  ", Style::default().bg(theme::subject_color(subject.color))),
                    Span::raw(" "),
                    Span::styled(subject.name.clone(), name_style),
                    Span::styled(avg, avg_style),
                ]))
            })
            .collect();

        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(List::new(items).block(block), cols[0], &mut state);

        if let Some(subject) = subjects.get(selected) {
            render_card(frame, cols[1], subject);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, subject: &Subject) {
    let theme = theme::current();
    let color = theme::subject_color(subject.color);

    let block = Block::default()
        .title(format!(" {} ", subject.name))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let mut lines: Vec<Line> = Vec::new();

    match (subject.average(), subject.band()) {
        (Some(avg), Some(band)) => {
            lines.push(Line::from(vec![
                Span::styled("Average Grade: ", theme.dim),
                Span::styled(format!("{:.1}", avg), theme.header),
            ]));
            lines.push(Line::from(Span::styled(
                format!(" {} ", band.label()),
                Style::default().fg(theme::band_color(band)).add_modifier(Modifier::REVERSED),
            )));
        }
        _ => lines.push(Line::from(Span::styled("No grades yet", theme.dim))),
    }

    let recent = subject.recent_grades();
    if !recent.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Recent Grades:", theme.dim)));
        let badges: Vec<Span> = recent
            .iter()
            .flat_map(|g| [Span::styled(format!(" {} ", g), theme.highlight), Span::raw(" ")])
            .collect();
        lines.push(Line::from(badges));
        lines.push(Line::from(Span::styled(
            format!("{} grades recorded", subject.grades.len()),
            theme.dim,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("g:Add grade  d:Remove subject", theme.dim)));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}
