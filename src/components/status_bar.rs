use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::app::{InputMode, Page};
use crate::theme;

pub struct NavBar;

impl NavBar {
    pub fn render(frame: &mut Frame, area: Rect, page: Page) {
        let theme = theme::current();
        let titles = Page::ALL
            .iter()
            .map(|p| format!("{} {}", p.index() + 1, p.title()));
        let tabs = Tabs::new(titles)
            .select(page.index())
            .style(theme.status)
            .highlight_style(theme.selected)
            .divider("\u{2502}");
        frame.render_widget(tabs, area);
    }
}

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        page: Page,
        mode: InputMode,
        message: Option<&str>,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let mode_str = match mode {
            InputMode::Form => format!("[{}] [Form]", page.title()),
            InputMode::Normal => format!("[{}]", page.title()),
        };

        // Show status message if present, otherwise context-aware hints
        let right_text = match message {
            Some(msg) => format!(" {} ", msg),
            None => hints(page, w).to_string(),
        };

        let left = format!(" {} ", mode_str);
        let padding = " ".repeat(w.saturating_sub(left.len() + right_text.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right_text, theme.status),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}

fn hints(page: Page, w: usize) -> &'static str {
    match page {
        Page::Home if w >= 60 => " jk:Select Enter:Open r:Quote 1-5:Page ?:Help q:Quit",
        Page::Subjects if w >= 70 => " jk:Select n:New g:Grade d:Delete 1-5:Page ?:Help q:Quit",
        Page::Tasks if w >= 70 => " jk:Select n:New Sp:Done d:Del f:Filter ?:Help q:Quit",
        Page::Calendar if w >= 80 => " hjkl:Day/Week [/]:Mon t:Today JK:Select n:New d:Del ?:Help",
        Page::Timer if w >= 70 => " Sp:Start/Pause r:Reset w/s/l/e:Settings ?:Help q:Quit",
        _ if w >= 30 => " Tab:Page ?:Help q:Quit",
        _ => " q:Quit",
    }
}
