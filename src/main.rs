mod app;
mod components;
mod config;
mod event;
mod logging;
mod planner;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use app::{App, InputMode, Page};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{AppEvent, Events};
use planner::Store;
use ratatui::layout::{Constraint, Layout, Rect};
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_secs(1);

/// Terminal study planner: subjects and grades, to-do list, calendar and a
/// pomodoro timer.
#[derive(Parser, Debug)]
#[command(name = "study-planner", version, about)]
struct Cli {
    /// Directory holding the JSON slot files.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `study_planner=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Delete all stored data and start again from the sample data.
    #[arg(long)]
    reset: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = config::Config::load(cli.config.as_deref())?;
    let data_dir = config.resolve_data_dir(cli.data_dir)?;
    let level = config.resolve_log_level(cli.log_level);
    let _log_guard = logging::init(&data_dir.join("logs"), &level)?;
    theme::init(&config.theme);
    debug!(theme = %theme::current().name, "theme loaded");

    let store = Store::open(&data_dir).wrap_err("failed to open data directory")?;
    if cli.reset {
        store.clear().wrap_err("failed to reset stored data")?;
    }
    info!(data_dir = %store.dir().display(), reset = cli.reset, "starting");
    let mut app = App::new(store).wrap_err_with(|| format!("failed to load data from {}", data_dir.display()))?;

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    info!("exiting");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = Events::new(TICK_RATE);

    while app.running {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            Some(AppEvent::Tick) => app.on_tick(),
            Some(AppEvent::Key(key)) => handle_key(app, key),
            None => {}
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Clear status message on any key
    app.status_message = None;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // Help overlay takes priority
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Form => handle_form_input(app, key.code),
        InputMode::Normal => handle_normal_input(app, key.code),
    }
}

fn handle_normal_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Tab => {
            app.next_page();
            return;
        }
        KeyCode::BackTab => {
            app.prev_page();
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            app.go_to(Page::ALL[idx]);
            return;
        }
        _ => {}
    }

    match app.page {
        Page::Home => match code {
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Enter => app.open_quick_action(),
            KeyCode::Char('r') => app.new_quote(),
            _ => {}
        },
        Page::Subjects => match code {
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('n') => app.open_subject_form(),
            KeyCode::Char('g') | KeyCode::Enter => app.open_grade_form(),
            KeyCode::Char('d') => app.remove_selected_subject(),
            _ => {}
        },
        Page::Tasks => match code {
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('n') => app.open_task_form(),
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected_task(),
            KeyCode::Char('d') => app.delete_selected_task(),
            KeyCode::Char('f') => app.cycle_task_filter(),
            _ => {}
        },
        Page::Calendar => match code {
            KeyCode::Left | KeyCode::Char('h') => app.prev_day(),
            KeyCode::Right | KeyCode::Char('l') => app.next_day(),
            KeyCode::Up | KeyCode::Char('k') => app.prev_week(),
            KeyCode::Down | KeyCode::Char('j') => app.next_week(),
            KeyCode::Char('[') => app.prev_month(),
            KeyCode::Char(']') => app.next_month(),
            KeyCode::Char('t') => app.go_to_today(),
            KeyCode::Char('K') => app.select_prev(),
            KeyCode::Char('J') => app.select_next(),
            KeyCode::Char('n') | KeyCode::Enter => app.open_event_form(),
            KeyCode::Char('d') => app.delete_selected_event(),
            _ => {}
        },
        Page::Timer => match code {
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_timer(),
            KeyCode::Char('r') => app.reset_timer(),
            KeyCode::Char('w') => app.update_settings(|s| s.cycle_work()),
            KeyCode::Char('s') => app.update_settings(|s| s.cycle_short_break()),
            KeyCode::Char('l') => app.update_settings(|s| s.cycle_long_break()),
            KeyCode::Char('e') => app.update_settings(|s| s.cycle_long_break_every()),
            _ => {}
        },
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form_mut() {
                form.next_field();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form_mut() {
                form.prev_field();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form_mut() {
                form.backspace();
            }
        }
        KeyCode::Left | KeyCode::Right => {
            if let Some(form) = app.form_mut() {
                form.cycle_choice();
            }
        }
        KeyCode::Char(' ') => {
            // Space cycles a choice field, otherwise it is text
            if let Some(form) = app.form_mut() {
                if form.active_is_choice() {
                    form.cycle_choice();
                } else {
                    form.input_char(' ');
                }
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.form_mut() {
                form.input_char(c);
            }
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    // Layout: nav tabs + content + status bar
    let layout = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    components::NavBar::render(frame, layout[0], app.page);

    let content = layout[1];
    match app.page {
        Page::Home => components::HomeView::render(frame, content, app.quote, app.home_selected),
        Page::Subjects => {
            components::SubjectList::render(frame, content, app.subjects.subjects(), app.subject_selected)
        }
        Page::Tasks => components::TaskListView::render(
            frame,
            content,
            &app.visible_tasks(),
            app.task_filter,
            app.tasks.stats(app.today),
            app.task_selected,
            app.today,
        ),
        Page::Calendar => render_calendar_layout(frame, content, app),
        Page::Timer => components::TimerView::render(
            frame,
            content,
            &app.timer,
            app.sessions.sessions(),
            app.today_stats(),
        ),
    }

    if let Some(ref form) = app.form_state {
        components::Form::render(frame, area, form);
    }

    if app.show_help {
        render_help(frame, area);
    }

    components::StatusBar::render(
        frame,
        layout[2],
        app.page,
        app.input_mode,
        app.status_message.as_deref(),
    );
}

fn render_calendar_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let days = app.days_with_events();
    let day_events = app.day_events();
    let upcoming = app.upcoming_events();

    if area.width < 70 {
        let rows = Layout::vertical([
            Constraint::Length(9),
            Constraint::Min(4),
        ])
        .split(area);
        components::MonthView::render(frame, rows[0], app.selected_date, app.today, &days);
        components::DayView::render(frame, rows[1], app.selected_date, &day_events, app.day_selected);
        return;
    }

    let month_w = if area.width >= 100 { 38 } else { 37 };
    let cols = Layout::horizontal([
        Constraint::Length(month_w),
        Constraint::Min(30),
    ])
    .split(area);

    let left = Layout::vertical([
        Constraint::Length(10),
        Constraint::Min(4),
    ])
    .split(cols[0]);

    components::MonthView::render(frame, left[0], app.selected_date, app.today, &days);
    components::UpcomingList::render(frame, left[1], &upcoming, app.today);
    components::DayView::render(frame, cols[1], app.selected_date, &day_events, app.day_selected);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let theme = theme::current();

    let popup_w = area.width.clamp(30, 60).min(area.width);
    let popup_h = area.height.clamp(12, 34).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Pages", section_style)),
        entry("1-5", "Home / Subjects / To-Do / Calendar / Timer"),
        entry("Tab S-Tab", "Next / previous page"),
        Line::from(""),
        Line::from(Span::styled("Lists", section_style)),
        entry("j/k", "Move selection"),
        entry("n", "New subject / task / event"),
        entry("d", "Delete selected"),
        entry("g", "Add grade to selected subject"),
        entry("Space", "Toggle task done"),
        entry("f", "Cycle task filter"),
        Line::from(""),
        Line::from(Span::styled("Calendar", section_style)),
        entry("h/l", "Previous / next day"),
        entry("j/k", "Next / previous week"),
        entry("[/]", "Previous / next month"),
        entry("J/K", "Select event of the day"),
        entry("t", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Timer", section_style)),
        entry("Space", "Start / pause"),
        entry("r", "Reset to focus"),
        entry("w s l e", "Cycle work / short / long / every"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", theme.dim),
            Span::styled("Esc       ", key_style),
            Span::raw("Quit / close popup"),
        ]),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
