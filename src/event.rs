use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Input for the main loop: a key press, or one elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

/// Polls the terminal and interleaves a fixed-rate tick.
///
/// Ticks that fall behind (a long draw, a suspended process) are emitted
/// back to back until caught up, so a countdown driven by them tracks wall
/// time.
pub struct Events {
    tick_rate: Duration,
    last_tick: Instant,
}

impl Events {
    pub fn new(tick_rate: Duration) -> Self {
        Self {
            tick_rate,
            last_tick: Instant::now(),
        }
    }

    /// Wait at most until the next tick is due.
    pub fn next(&mut self) -> color_eyre::Result<Option<AppEvent>> {
        if self.last_tick.elapsed() >= self.tick_rate {
            self.last_tick += self.tick_rate;
            return Ok(Some(AppEvent::Tick));
        }

        let timeout = self.tick_rate.saturating_sub(self.last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Some(AppEvent::Key(key)));
                }
                _ => return Ok(None),
            }
        }
        Ok(None)
    }
}
