use std::{iter, time::Duration};

use donutris_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

/// Side panel with score, game time and clear counts.
pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameSession) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameSession) -> String),
}

/// Game time covered by the ticks so far, as `m:ss`.
fn format_game_time(session: &GameSession) -> String {
    let millis = session
        .ticks()
        .saturating_mul(session.config().move_interval_ms);
    let secs = Duration::from_millis(millis).as_secs();
    format!("{}:{:0>2}", secs / 60, secs % 60)
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|session| session.stats().score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&format_game_time),
    Row::Empty,
    Row::LabelValue("RINGS:", &|session| {
        session.stats().total_cleared_rings().to_string()
    }),
    Row::LabelValue("PIECES:", &|session| {
        session.stats().completed_pieces().to_string()
    }),
    Row::Empty,
    Row::LabelValue("SINGLE:", &|session| {
        session.stats().ring_clear_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLE:", &|session| {
        session.stats().ring_clear_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLE:", &|session| {
        session.stats().ring_clear_counter()[3].to_string()
    }),
    Row::LabelValue("4+:", &|session| {
        session.stats().ring_clear_counter()[4].to_string()
    }),
    Row::Empty,
    Row::LabelValue("GAME:", &|session| session.games_played().to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style::DIMMED)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
