use crate::directory::{AVAILABLE_CROPS, PHILIPPINE_REGIONS};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Widget},
};

/// Width the directory panel takes when visible
pub const SIDEBAR_WIDTH: u16 = 34;

/// Region & crop directory shown beside the chat
pub struct Directory;

impl Directory {
    fn list<'a>(title: &'a str, items: &'a [&'a str]) -> List<'a> {
        let items: Vec<ListItem> = items
            .iter()
            .map(|item| ListItem::new(Line::from(Span::raw(*item))))
            .collect();
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    title,
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
        )
    }
}

impl Widget for Directory {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let regions_height = PHILIPPINE_REGIONS.len() as u16 + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Max(regions_height), Constraint::Min(3)])
            .split(area);

        Self::list("📍 Philippines Regions", PHILIPPINE_REGIONS).render(chunks[0], buf);
        Self::list("🌾 Available Crops", AVAILABLE_CROPS).render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_directory_lists_regions_and_crops() {
        let backend = TestBackend::new(SIDEBAR_WIDTH, 50);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| frame.render_widget(Directory, frame.size()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = (0..50)
            .map(|y| (0..SIDEBAR_WIDTH).map(|x| buffer.get(x, y).symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(screen.contains("BARMM"));
        assert!(screen.contains("Carrots"));
    }
}
