//! Conversation history display component

use crate::conversation::{Conversation, Entry, Message};
use crate::events::Sender;
use crate::ui::conversation::typing::TypingIndicator;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Bubbles take at most this share of the available width
const BUBBLE_WIDTH_PERCENT: u16 = 80;

/// Renders the conversation as chat bubbles, bot on the left and user on
/// the right, anchored to the bottom.
pub struct MessageList<'a> {
    conversation: &'a Conversation,
    typing: &'a TypingIndicator,
    /// Lines scrolled up from the newest message
    scroll_back: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(conversation: &'a Conversation, typing: &'a TypingIndicator) -> Self {
        Self {
            conversation,
            typing,
            scroll_back: 0,
        }
    }

    pub fn scroll_back(mut self, lines: usize) -> Self {
        self.scroll_back = lines;
        self
    }

    /// Every rendered line for a given inner width, oldest first
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let bubble_width = (width as usize * BUBBLE_WIDTH_PERCENT as usize / 100).max(1);
        let mut lines = Vec::new();
        for entry in self.conversation.entries() {
            match entry {
                Entry::Message(message) => lines.extend(render_message(message, bubble_width)),
                Entry::Typing => lines.extend(self.render_typing()),
            }
            lines.push(Line::default());
        }
        lines
    }

    fn render_typing(&self) -> Vec<Line<'static>> {
        vec![
            header_line(Sender::Bot, None),
            with_indent(self.typing.line()),
        ]
    }
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 BukidMate");
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = self.lines(inner.width);
        let height = inner.height as usize;
        let max_back = lines.len().saturating_sub(height);
        let top = max_back - self.scroll_back.min(max_back);

        Paragraph::new(lines)
            .scroll((top.min(u16::MAX as usize) as u16, 0))
            .render(inner, buf);
    }
}

fn render_message(message: &Message, bubble_width: usize) -> Vec<Line<'static>> {
    let time = message.timestamp.format("%H:%M").to_string();
    let mut lines = vec![header_line(message.sender, Some(time))];

    let style = content_style(message.sender);
    let content_width = bubble_width.saturating_sub(2).max(1);
    for text in wrap_text(&message.content, content_width) {
        let line = Line::from(Span::styled(text, style));
        lines.push(match message.sender {
            Sender::Bot => with_indent(line),
            Sender::User => line.alignment(Alignment::Right),
        });
    }
    lines
}

fn header_line(sender: Sender, time: Option<String>) -> Line<'static> {
    let name = Span::styled(
        sender.display_name(),
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    );
    let time = Span::styled(time.unwrap_or_default(), Style::default().fg(Color::DarkGray));
    match sender {
        Sender::Bot => Line::from(vec![
            Span::raw(format!("{} ", sender.avatar())),
            name,
            Span::raw("  "),
            time,
        ]),
        Sender::User => Line::from(vec![
            time,
            Span::raw("  "),
            name,
            Span::raw(format!(" {}", sender.avatar())),
        ])
        .alignment(Alignment::Right),
    }
}

fn with_indent(line: Line<'static>) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    spans.extend(line.spans);
    Line::from(spans)
}

fn content_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Cyan),
        Sender::Bot => Style::default().fg(Color::Green),
    }
}

/// Columns a tab expands to
const TAB_WIDTH: usize = 4;

/// Wrap text to `width` chars. Embedded line breaks, blank lines and runs of
/// spaces are kept as written; only soft breaks swallow whitespace. Words
/// longer than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.replace('\t', &" ".repeat(TAB_WIDTH));
        let mut current = String::new();
        let mut current_len = 0;

        for (is_space, run) in runs(&paragraph) {
            let run_len = run.chars().count();

            if is_space {
                if current_len + run_len > width {
                    // soft break
                    lines.push(current.trim_end().to_string());
                    current.clear();
                    current_len = 0;
                } else {
                    current.push_str(run);
                    current_len += run_len;
                }
                continue;
            }

            if run_len > width {
                for c in run.chars() {
                    if current_len == width {
                        lines.push(std::mem::take(&mut current));
                        current_len = 0;
                    }
                    current.push(c);
                    current_len += 1;
                }
                continue;
            }

            if current_len + run_len > width {
                lines.push(current.trim_end().to_string());
                current.clear();
                current_len = 0;
            }
            current.push_str(run);
            current_len += run_len;
        }

        lines.push(current);
    }

    lines
}

/// Split into maximal runs of whitespace and non-whitespace
fn runs(text: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != is_space)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some((is_space, run))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BackendPayload;
    use ratatui::{backend::TestBackend, Terminal};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap_text("a b\n\nc", 10), ["a b", "", "c"]);
    }

    #[test]
    fn test_wrap_breaks_on_width() {
        assert_eq!(wrap_text("Central Luzon Tomato", 13), ["Central Luzon", "Tomato"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), ["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_keeps_indentation_and_spacing() {
        assert_eq!(
            wrap_text("Presyo:\n    Tomato   ₱65.27", 40),
            ["Presyo:", "    Tomato   ₱65.27"]
        );
    }

    #[test]
    fn test_wrap_expands_tabs() {
        assert_eq!(wrap_text("\tOnion", 20), ["    Onion"]);
    }

    #[test]
    fn test_wrap_drops_spacing_at_soft_break() {
        assert_eq!(wrap_text("Tomato   Onion", 8), ["Tomato", "Onion"]);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        assert_eq!(wrap_text("₱65 ₱70", 7), ["₱65 ₱70"]);
    }

    #[test]
    fn test_user_lines_are_right_aligned() {
        let mut conversation = Conversation::new();
        conversation.send_user_message("Central Luzon, Tomato");
        let seq = conversation.latest_seq();
        conversation.receive_backend_result(seq, BackendPayload {
            message: Some("₱65.27".into()),
            ..BackendPayload::default()
        });

        let typing = TypingIndicator::new();
        let lines = MessageList::new(&conversation, &typing).lines(60);
        // user header, user content, spacer, bot header, bot content, spacer
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1].alignment, Some(Alignment::Right));
        assert_eq!(line_text(&lines[1]), "Central Luzon, Tomato");
        assert_eq!(lines[4].alignment, None);
        assert_eq!(line_text(&lines[4]), "  ₱65.27");
    }

    #[test]
    fn test_typing_entry_renders_last() {
        let mut conversation = Conversation::with_greeting("Kumusta!");
        conversation.send_user_message("Tomato");
        let typing = TypingIndicator::new();
        let lines = MessageList::new(&conversation, &typing).lines(60);

        let typing_header = &lines[lines.len() - 3];
        assert!(line_text(typing_header).contains("BukidMate"));
        let dots = line_text(&lines[lines.len() - 2]);
        assert_eq!(dots.matches(['•', '●']).count(), 3);
    }

    #[test]
    fn test_render_shows_newest_at_bottom() {
        let mut conversation = Conversation::new();
        for i in 0..10 {
            conversation.append_bot_message(format!("message {i}"));
        }
        let typing = TypingIndicator::new();

        let backend = TestBackend::new(40, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| frame.render_widget(MessageList::new(&conversation, &typing), frame.size()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..8)
            .map(|y| (0..40).map(|x| buffer.get(x, y).symbol().to_string()).collect())
            .collect();
        assert!(rows.iter().any(|row| row.contains("message 9")));
        assert!(!rows.iter().any(|row| row.contains("message 0")));
    }
}
