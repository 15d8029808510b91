use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Text},
    widgets::{Block as BlockWidget, Clear, Paragraph, Widget},
};

use crate::view::widgets::style;

/// Centered box shown over the board once the game is over.
#[derive(Debug)]
pub struct GameOverDisplay {
    score: usize,
}

impl GameOverDisplay {
    pub fn new(score: usize) -> Self {
        Self { score }
    }

    fn lines(&self) -> Text<'static> {
        Text::from(vec![
            Line::styled("GAME OVER", style::GAME_OVER),
            Line::default(),
            Line::styled(format!("Score: {}", self.score), style::DEFAULT),
            Line::styled("Press Space to restart", style::DIMMED),
        ])
        .centered()
    }
}

impl Widget for GameOverDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.lines();
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX).saturating_add(4);
        let height = u16::try_from(text.height()).unwrap_or(u16::MAX).saturating_add(2);

        let [area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        Clear.render(area, buf);
        Paragraph::new(text)
            .style(style::DEFAULT)
            .block(BlockWidget::bordered().style(style::DEFAULT))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_score_in_center() {
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        GameOverDisplay::new(1200).render(area, &mut buf);

        let rows: Vec<String> = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_owned())
                    .collect()
            })
            .collect();
        let title_row = rows.iter().position(|r| r.contains("GAME OVER")).unwrap();
        assert!(rows[title_row + 2].contains("Score: 1200"));
        assert!(rows.iter().any(|r| r.contains("Press Space to restart")));
        // Box is vertically centered
        assert!((3..=5).contains(&title_row));
    }
}
