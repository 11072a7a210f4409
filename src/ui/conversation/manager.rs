use crate::client::{BackendClient, BackendPayload, HealthStatus};
use crate::config::Config;
use crate::conversation::{Conversation, FollowUp, RequestSeq};
use crate::events::AppEvent;
use crate::handler::{self, Dispatch, InputHandler};
use crate::ui::conversation::{
    get_help_text, ComposerResult, ConversationComposer, MessageList, SlashCommand, TypingIndicator,
};
use crate::ui::sidebar::{Directory, SIDEBAR_WIDTH};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::cell::Cell;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const SCROLL_STEP: usize = 5;

/// Actions that can be requested by the conversation manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
}

/// Reachability of the forecasting backend, shown in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendState {
    Checking,
    Online(HealthStatus),
    Offline,
}

/// Wires the composer, the input handler and the conversation together.
///
/// All state is mutated on the UI task; backend calls and follow-up delays
/// run on spawned tasks and report back through `AppEvent`s.
pub struct ConversationManager {
    conversation: Conversation,
    handler: InputHandler,
    composer: ConversationComposer,
    typing: TypingIndicator,
    events: mpsc::UnboundedSender<AppEvent>,
    follow_up_delay: Duration,
    show_sidebar: bool,
    backend_state: BackendState,
    scroll_back: usize,
    max_scroll_back: Cell<usize>,
}

impl ConversationManager {
    pub fn new(config: &Config, client: BackendClient, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            conversation: Conversation::with_greeting(&config.greeting),
            handler: InputHandler::new(client),
            composer: ConversationComposer::new("Type your message...", config.ui.max_input_chars),
            typing: TypingIndicator::new(),
            events,
            follow_up_delay: config.follow_up_delay(),
            show_sidebar: config.ui.show_sidebar,
            backend_state: BackendState::Checking,
            scroll_back: 0,
            max_scroll_back: Cell::new(0),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn handler(&self) -> &InputHandler {
        &self.handler
    }

    pub fn backend_state(&self) -> &BackendState {
        &self.backend_state
    }

    pub fn is_sidebar_visible(&self) -> bool {
        self.show_sidebar
    }

    /// Probe the backend once in the background
    pub fn spawn_health_probe(&self) {
        let client = self.handler.client().clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let status = match client.health().await {
                Ok(status) => Some(status),
                Err(e) => {
                    warn!(error = %e, "backend health probe failed");
                    None
                }
            };
            let _ = events.send(AppEvent::BackendHealth(status));
        });
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ConversationAction {
        if key.kind != KeyEventKind::Press {
            return ConversationAction::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => return ConversationAction::Exit,
                KeyCode::Char('b') => {
                    self.toggle_sidebar();
                    return ConversationAction::None;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Esc if !self.composer.is_palette_open() => return ConversationAction::Exit,
            KeyCode::PageUp => {
                self.scroll_back = (self.scroll_back + SCROLL_STEP).min(self.max_scroll_back.get());
                return ConversationAction::None;
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(SCROLL_STEP);
                return ConversationAction::None;
            }
            _ => {}
        }

        match self.composer.handle_key(key) {
            ComposerResult::Submitted(text) => {
                self.submit(text);
                ConversationAction::None
            }
            ComposerResult::Command(command) => self.handle_slash_command(command),
            ComposerResult::None => ConversationAction::None,
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.composer.handle_paste(text);
    }

    /// Append the user's turn, then classify and dispatch. Returns the
    /// sequence number the eventual result will carry.
    pub fn submit(&mut self, text: impl Into<String>) -> RequestSeq {
        let text = text.into();
        let seq = self.conversation.send_user_message(text.clone());
        self.typing.restart();
        self.scroll_back = 0;

        match self.handler.dispatch(&text) {
            Dispatch::Local(payload) => self.apply_result(seq, payload),
            Dispatch::Remote(query) => {
                info!(?seq, region = query.region(), crop = query.crop(), "dispatching backend query");
                let client = self.handler.client().clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let payload = handler::execute(&client, &query).await;
                    let _ = events.send(AppEvent::BackendResult { seq, payload });
                });
            }
        }
        seq
    }

    /// Fold an event from a background task into the UI state
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::BackendResult { seq, payload } => self.apply_result(seq, payload),
            AppEvent::FollowUpDue(follow_up) => {
                self.conversation.receive_follow_up(follow_up);
                self.scroll_back = 0;
            }
            AppEvent::BackendHealth(status) => {
                self.backend_state = match status {
                    Some(status) if status.is_healthy() => BackendState::Online(status),
                    Some(status) => {
                        warn!(%status, "backend reports unhealthy");
                        BackendState::Offline
                    }
                    None => BackendState::Offline,
                };
            }
        }
    }

    fn apply_result(&mut self, seq: RequestSeq, payload: BackendPayload) {
        self.scroll_back = 0;
        if let Some(follow_up) = self.conversation.receive_backend_result(seq, payload) {
            self.schedule_follow_up(follow_up);
        }
    }

    fn schedule_follow_up(&self, follow_up: FollowUp) {
        debug!(seq = ?follow_up.seq, "scheduling follow-up");
        let events = self.events.clone();
        let delay = self.follow_up_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(AppEvent::FollowUpDue(follow_up));
        });
    }

    fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
    }

    /// Handle slash commands
    fn handle_slash_command(&mut self, command: SlashCommand) -> ConversationAction {
        match command {
            SlashCommand::Sidebar => {
                self.toggle_sidebar();
                ConversationAction::None
            }
            SlashCommand::Help => {
                self.conversation.append_bot_message(get_help_text());
                self.scroll_back = 0;
                ConversationAction::None
            }
            SlashCommand::Bye => ConversationAction::Exit,
        }
    }

    /// Render header, optional directory, history and composer
    pub fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(frame.size());
        self.render_header(frame, rows[0]);

        let body = if self.show_sidebar {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .split(rows[1]);
            frame.render_widget(Directory, columns[0]);
            columns[1]
        } else {
            rows[1]
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(self.composer.desired_height()),
            ])
            .split(body);

        let history = MessageList::new(&self.conversation, &self.typing);
        let history_inner = chunks[0].height.saturating_sub(2) as usize;
        let total = history.lines(chunks[0].width.saturating_sub(2)).len();
        self.max_scroll_back.set(total.saturating_sub(history_inner));
        frame.render_widget(history.scroll_back(self.scroll_back), chunks[0]);

        frame.render_widget(&self.composer, chunks[1]);

        let palette_height = self.composer.palette_height().min(chunks[0].height);
        if palette_height > 0 {
            let palette_area = Rect {
                x: chunks[1].x,
                y: chunks[1].y.saturating_sub(palette_height),
                width: chunks[1].width,
                height: palette_height,
            };
            self.composer.render_palette(palette_area, frame.buffer_mut());
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let (label, color) = match &self.backend_state {
            BackendState::Checking => ("Connecting…", Color::Yellow),
            BackendState::Online(_) => ("Active", Color::Green),
            BackendState::Offline => ("Offline", Color::Red),
        };
        let typing = if self.conversation.is_typing() { "  · typing…" } else { "" };

        let line = Line::from(vec![
            Span::styled("🌱 BukidMate", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(label, Style::default().fg(color)),
            Span::styled(typing, Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("  {}", self.handler.client().base_url()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }
}
