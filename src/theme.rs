use ratatui::style::Color;

use crate::catalog::Rarity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Darkroom,
    Daylight,
}

/// Palette handed to every draw call. Toggling swaps the whole value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub mode: Mode,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub focus: Color,
    pub background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(Mode::Darkroom)
    }
}

impl Theme {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Darkroom => Self {
                mode,
                accent: Color::LightRed,
                text: Color::White,
                muted: Color::DarkGray,
                border: Color::Red,
                focus: Color::LightRed,
                background: Color::Black,
            },
            Mode::Daylight => Self {
                mode,
                accent: Color::Yellow,
                text: Color::White,
                muted: Color::Gray,
                border: Color::Gray,
                focus: Color::Cyan,
                background: Color::Reset,
            },
        }
    }

    pub fn toggled(self) -> Self {
        match self.mode {
            Mode::Darkroom => Self::for_mode(Mode::Daylight),
            Mode::Daylight => Self::for_mode(Mode::Darkroom),
        }
    }

    pub fn rarity(&self, rarity: Rarity) -> Color {
        match rarity {
            Rarity::Legendary => Color::Rgb(0xff, 0xd7, 0x00),
            Rarity::Rare => Color::Rgb(0x9c, 0x27, 0xb0),
            Rarity::Common => Color::Rgb(0x4c, 0xaf, 0x50),
        }
    }
}

/// Parses `#rgb` / `#rrggbb`. Anything else renders as the muted colour.
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#').filter(|hex| hex.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut parts = hex.chars().map(|c| channel(&format!("{c}{c}")));
            Some(Color::Rgb(parts.next()??, parts.next()??, parts.next()??))
        }
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_returns_to_darkroom() {
        let theme = Theme::default();
        assert_eq!(theme.toggled().mode, Mode::Daylight);
        assert_eq!(theme.toggled().toggled(), theme);
    }

    #[test]
    fn hex_colours_parse() {
        assert_eq!(parse_hex("#ff8c42"), Some(Color::Rgb(0xff, 0x8c, 0x42)));
        assert_eq!(parse_hex("#fff"), Some(Color::Rgb(0xff, 0xff, 0xff)));
        assert_eq!(parse_hex("#333"), Some(Color::Rgb(0x33, 0x33, 0x33)));
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }
}
