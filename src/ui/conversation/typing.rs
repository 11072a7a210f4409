use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(150);

/// Bouncing three-dot placeholder shown while the backend is working
#[derive(Debug, Clone, Copy)]
pub struct TypingIndicator {
    started: Instant,
}

impl Default for TypingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingIndicator {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Restart the animation from its first frame
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Index of the raised dot (0..3) after `elapsed`
    pub fn phase(elapsed: Duration) -> usize {
        ((elapsed.as_millis() / FRAME.as_millis()) % 3) as usize
    }

    /// Current frame as a styled line
    pub fn line(&self) -> Line<'static> {
        Self::line_at(Self::phase(self.started.elapsed()))
    }

    pub fn line_at(phase: usize) -> Line<'static> {
        let spans = (0..3)
            .map(|i| {
                if i == phase {
                    Span::styled("●", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                } else {
                    Span::styled("•", Style::default().fg(Color::DarkGray))
                }
            })
            .flat_map(|dot| [dot, Span::raw(" ")])
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycles() {
        assert_eq!(TypingIndicator::phase(Duration::ZERO), 0);
        assert_eq!(TypingIndicator::phase(Duration::from_millis(160)), 1);
        assert_eq!(TypingIndicator::phase(Duration::from_millis(310)), 2);
        assert_eq!(TypingIndicator::phase(Duration::from_millis(460)), 0);
    }

    #[test]
    fn test_line_has_three_dots() {
        let line = TypingIndicator::line_at(1);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "• ● • ");
    }
}
