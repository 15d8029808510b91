use donutris_engine::PieceColor;
use ratatui::{layout::Rect, style::Color, widgets::Block as BlockWidget};

pub use self::{
    donut_display::*, game_over_display::*, key_binding_display::*, stats_display::*,
};

mod donut_display;
mod game_over_display;
mod key_binding_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(60, 60, 60);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const RED: Color = Color::Rgb(255, 0, 0);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::view::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const DIMMED: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GAME_OVER: Style = fg_bg(color::RED, color::BLACK).add_modifier(Modifier::BOLD);
}

const fn piece_color(color: PieceColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
