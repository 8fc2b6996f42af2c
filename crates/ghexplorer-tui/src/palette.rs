// Two palettes, picked by the persisted dark-mode flag
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,
    pub selected_bg: Color,
    pub stars: Color,
    pub forks: Color,
    pub language: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Palette {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(0x12, 0x12, 0x12),
            foreground: Color::Rgb(0xff, 0xff, 0xff),
            muted: Color::Rgb(0xbb, 0xbb, 0xbb),
            border: Color::Rgb(0x33, 0x33, 0x33),
            border_focused: Color::Rgb(0x89, 0xb4, 0xfa),
            title: Color::Rgb(0xff, 0xff, 0xff),
            selected_bg: Color::Rgb(0x1e, 0x1e, 0x1e),
            stars: Color::Rgb(0xff, 0xd7, 0x00),
            forks: Color::Rgb(0x4c, 0xaf, 0x50),
            language: Color::Rgb(0x21, 0x96, 0xf3),
            error: Color::Rgb(0xff, 0x44, 0x44),
            warning: Color::Rgb(0xf9, 0xe2, 0xaf),
            info: Color::Rgb(0x89, 0xdc, 0xeb),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(0xf5, 0xf5, 0xf5),
            foreground: Color::Rgb(0x33, 0x33, 0x33),
            muted: Color::Rgb(0x66, 0x66, 0x66),
            border: Color::Rgb(0xcc, 0xcc, 0xcc),
            border_focused: Color::Rgb(0x21, 0x96, 0xf3),
            title: Color::Rgb(0x2d, 0x2d, 0x2d),
            selected_bg: Color::Rgb(0xff, 0xff, 0xff),
            stars: Color::Rgb(0xc7, 0x9a, 0x00),
            forks: Color::Rgb(0x38, 0x8e, 0x3c),
            language: Color::Rgb(0x19, 0x76, 0xd2),
            error: Color::Rgb(0xd3, 0x2f, 0x2f),
            warning: Color::Rgb(0xb2, 0x6a, 0x00),
            info: Color::Rgb(0x00, 0x83, 0x8f),
        }
    }
}
