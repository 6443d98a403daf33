use crate::canvas::ColorName;
use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub warning: Color,
    pub error: Color, // Red
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub label: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub function: Color,
    pub type_name: Color, // Cyan for value kinds
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    warning: Color::Rgb(249, 226, 175),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(137, 180, 250),        // Blue for keywords
    string: Color::Rgb(250, 179, 135),         // Orange for strings
    number: Color::Rgb(250, 179, 135),         // Orange for numbers
    label: Color::Rgb(245, 194, 231),          // Pink for labels
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    function: Color::Rgb(249, 226, 175),       // Yellow for builtins and draw commands
    type_name: Color::Rgb(148, 226, 213),
};

/// Terminal color used to paint a canvas cell; `None` for Transparent
pub fn cell_color(color: ColorName) -> Option<Color> {
    match color {
        ColorName::Red => Some(Color::Rgb(220, 50, 47)),
        ColorName::Blue => Some(Color::Rgb(38, 110, 210)),
        ColorName::Green => Some(Color::Rgb(64, 160, 43)),
        ColorName::Yellow => Some(Color::Rgb(240, 200, 40)),
        ColorName::Orange => Some(Color::Rgb(245, 130, 30)),
        ColorName::Purple => Some(Color::Rgb(136, 57, 239)),
        ColorName::Black => Some(Color::Rgb(0, 0, 0)),
        ColorName::White => Some(Color::Rgb(255, 255, 255)),
        ColorName::Transparent => None,
    }
}
