use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

use crate::planner::timer::TodayStats;
use crate::planner::{PomodoroTimer, SessionKind, StudySession};
use crate::theme;

/// Sessions listed under "Recent Sessions".
const RECENT_SESSIONS: usize = 10;

pub struct TimerView;

impl TimerView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        timer: &PomodoroTimer,
        sessions: &[StudySession],
        today: TodayStats,
    ) {
        let cols = if area.width >= 80 {
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).split(area)
        } else {
            Layout::vertical([Constraint::Min(12), Constraint::Length(12)]).split(area)
        };

        render_clock(frame, cols[0], timer, today);

        let side = Layout::vertical([Constraint::Length(7), Constraint::Min(3)]).split(cols[1]);
        render_settings(frame, side[0], timer);
        render_sessions(frame, side[1], sessions);
    }
}

fn render_clock(frame: &mut Frame, area: Rect, timer: &PomodoroTimer, today: TodayStats) {
    let theme = theme::current();
    let color = theme.phase_color(timer.phase());

    let block = Block::default()
        .title(format!(" {} ", timer.phase().label()))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .title_bottom(Line::from(Span::styled(" Space:Start/Pause r:Reset ", theme.dim)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let state = if timer.is_running() { "running" } else { "paused" };
    let session = if timer.phase().is_break() { "Break Session" } else { "Focus Session" };

    frame.render_widget(
        Paragraph::new(Span::styled(
            timer.clock(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(format!("{session} ({state})"), theme.dim)).alignment(Alignment::Center),
        rows[2],
    );

    let gauge_area = Rect {
        x: rows[4].x + 2,
        width: rows[4].width.saturating_sub(4),
        ..rows[4]
    };
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(timer.progress().clamp(0.0, 1.0))
            .label(""),
        gauge_area,
    );

    let stats = Line::from(vec![
        Span::styled("Pomodoros Today ", theme.dim),
        Span::styled(today.pomodoros.to_string(), Style::default().fg(theme.focus).add_modifier(Modifier::BOLD)),
        Span::styled("   Study Time Today ", theme.dim),
        Span::styled(today.study_time_display(), Style::default().fg(theme.rest).add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(stats).alignment(Alignment::Center), rows[6]);
}

fn render_settings(frame: &mut Frame, area: Rect, timer: &PomodoroTimer) {
    let theme = theme::current();
    let settings = timer.settings();
    let key_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);

    let row = |key: &'static str, label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {key} "), key_style),
            Span::styled(format!("{label:<18}"), theme.dim),
            Span::raw(value),
        ])
    };

    let lines = vec![
        row("w", "Work Duration", format!("{} min", settings.work_duration)),
        row("s", "Short Break", format!("{} min", settings.short_break)),
        row("l", "Long Break", format!("{} min", settings.long_break)),
        row("e", "Long Break Every", format!("{} sessions", settings.sessions_until_long_break)),
    ];

    let block = Block::default()
        .title(" Settings ")
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.border);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_sessions(frame: &mut Frame, area: Rect, sessions: &[StudySession]) {
    let theme = theme::current();

    let block = Block::default()
        .title(" Recent Sessions ")
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.border);

    if sessions.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new("No sessions yet").style(theme.dim), inner);
        return;
    }

    let items: Vec<ListItem> = sessions
        .iter()
        .take(RECENT_SESSIONS)
        .map(|s| {
            let color = match s.kind {
                SessionKind::Work => theme.focus,
                SessionKind::Break => theme.rest,
            };
            let at = s.completed_at.with_timezone(&chrono::Local);
            ListItem::new(Line::from(vec![
                Span::styled(" \u{25cf} ", Style::default().fg(color)),
                Span::raw(format!("{:<6}", s.kind.label())),
                Span::styled(format!("{:>4}m ", s.duration), theme.header),
                Span::styled(at.format("%b %d %H:%M").to_string(), theme.dim),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
