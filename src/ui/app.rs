//! Terminal setup and the main event loop

use crate::events::AppEvent;
use crate::ui::conversation::{ConversationAction, ConversationManager};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Owns the terminal for the lifetime of the chat; restores it on drop
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
    keyboard_enhanced: bool,
}

impl App {
    /// Enter raw mode and the alternate screen
    pub fn new(tick_rate: Duration) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .context("Failed to enter alternate screen")?;

        // lets Shift+Enter reach us as a distinct key where the terminal allows it
        let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
        if keyboard_enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )
            .context("Failed to enable keyboard enhancement")?;
        }
        debug!(keyboard_enhanced, "terminal ready");

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            tick_rate,
            keyboard_enhanced,
        })
    }

    /// Draw, then wait for a key, a background event or the next animation tick
    pub async fn run(
        &mut self,
        manager: &mut ConversationManager,
        mut events: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Result<()> {
        let mut input = EventStream::new();
        let mut ticker = tokio::time::interval(self.tick_rate);

        loop {
            self.terminal
                .draw(|frame| manager.render(frame))
                .context("Failed to draw frame")?;

            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if manager.handle_key(key) == ConversationAction::Exit {
                            info!("exit requested");
                            return Ok(());
                        }
                    }
                    Some(Ok(Event::Paste(text))) => manager.handle_paste(&text),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => return Ok(()),
                },
                Some(event) = events.recv() => manager.handle_app_event(event),
                _ = ticker.tick() => {}
            }
        }
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
        }
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
        self.terminal.show_cursor()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
