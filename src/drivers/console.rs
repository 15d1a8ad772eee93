use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event, KeyCode,
    KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

/// Reads crossterm events, dropping key releases and repeats so handlers
/// only see presses, and turning Shift+Tab into BackTab. A burst of pointer
/// moves collapses into the last one so label hover tracks the pointer.
#[derive(Default)]
pub struct ConsoleInputDriver {
    event_queue: VecDeque<Event>,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event ahead of the terminal's own input.
    pub fn push_event(&mut self, event: Event) {
        self.event_queue.push_back(event);
    }

    fn normalize(evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }

    fn is_pointer_move(evt: &Event) -> bool {
        matches!(evt, Event::Mouse(m) if m.kind == MouseEventKind::Moved)
    }

    fn next_event(&mut self) -> io::Result<Event> {
        match self.event_queue.pop_front() {
            Some(evt) => Ok(evt),
            None => self.read_internal(),
        }
    }

    fn read_internal(&mut self) -> io::Result<Event> {
        loop {
            let evt = crossterm::event::read()?;
            if let Some(normalized) = Self::normalize(evt) {
                return Ok(normalized);
            }
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.event_queue.is_empty() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        let mut evt = self.next_event()?;
        while Self::is_pointer_move(&evt) && self.poll(Duration::ZERO)? {
            let next = self.next_event()?;
            if Self::is_pointer_move(&next) {
                evt = next;
            } else {
                self.event_queue.push_front(next);
                break;
            }
        }
        Ok(evt)
    }
}

/// Alternate-screen terminal with raw mode, mouse capture and focus
/// reporting, restored on drop.
pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    type Backend = CrosstermBackend<Stdout>;

    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(move |frame| {
                let wrapper = UiFrame::new(frame);
                f(wrapper);
            })
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent};

    #[test]
    fn poll_and_read_from_queue() {
        let mut d = ConsoleInputDriver::new();
        d.push_event(Event::Key(KeyEvent::new(
            KeyCode::Char('z'),
            KeyModifiers::NONE,
        )));
        d.push_event(Event::FocusLost);
        assert!(d.poll(Duration::from_millis(0)).unwrap());
        let ev = d.read().unwrap();
        if let Event::Key(k) = ev {
            assert_eq!(k.code, KeyCode::Char('z'));
        } else {
            panic!("expected key");
        }
        assert_eq!(d.read().unwrap(), Event::FocusLost);
    }

    fn moved(column: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row: 1,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn pointer_moves_collapse_to_the_latest() {
        let mut d = ConsoleInputDriver::new();
        d.push_event(moved(1));
        d.push_event(moved(4));
        d.push_event(moved(9));
        d.push_event(Event::FocusGained);
        d.push_event(moved(12));
        d.push_event(Event::FocusLost);
        assert_eq!(d.read().unwrap(), moved(9));
        assert_eq!(d.read().unwrap(), Event::FocusGained);
        assert_eq!(d.read().unwrap(), moved(12));
        assert_eq!(d.read().unwrap(), Event::FocusLost);
    }

    #[test]
    fn releases_are_dropped_and_backtab_normalized() {
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(ConsoleInputDriver::normalize(Event::Key(key)).is_none());

        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT);
        match ConsoleInputDriver::normalize(Event::Key(tab)) {
            Some(Event::Key(k)) => {
                assert_eq!(k.code, KeyCode::BackTab);
                assert!(!k.modifiers.contains(KeyModifiers::SHIFT));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            ConsoleInputDriver::normalize(Event::Resize(10, 20)),
            Some(Event::Resize(10, 20))
        );
    }
}
