// Pastel color palette shared by the TUI and the CLI status output

use crossterm::style::{Color, StyledContent, Stylize};
use ratatui::style::Color as TuiColor;
use std::fmt;

/// Defines the pastel color palette for the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PastelColor {
    Pink,
    Lavender,
    Mint,
    SkyBlue,
    Peach,
    LightYellow,
    White,
    Gray,
}

impl PastelColor {
    fn rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            PastelColor::Pink => Some((255, 182, 193)),
            PastelColor::Lavender => Some((204, 169, 221)),
            PastelColor::Mint => Some((176, 224, 183)),
            PastelColor::SkyBlue => Some((173, 216, 230)),
            PastelColor::Peach => Some((255, 218, 185)),
            PastelColor::LightYellow => Some((255, 255, 224)),
            PastelColor::White => None,
            PastelColor::Gray => Some((169, 169, 169)),
        }
    }

    /// Get the crossterm color representation
    pub fn as_color(&self) -> Color {
        match self.rgb() {
            Some((r, g, b)) => Color::Rgb { r, g, b },
            None => Color::White,
        }
    }
}

impl From<PastelColor> for TuiColor {
    fn from(color: PastelColor) -> Self {
        match color.rgb() {
            Some((r, g, b)) => TuiColor::Rgb(r, g, b),
            None => TuiColor::White,
        }
    }
}

/// A styled text element for plain terminal output
pub struct StyledText<'a> {
    styled: StyledContent<&'a str>,
}

impl<'a> StyledText<'a> {
    pub fn new(text: &'a str, fg_color: PastelColor) -> Self {
        Self { styled: text.with(fg_color.as_color()) }
    }

    pub fn bold(text: &'a str, fg_color: PastelColor) -> Self {
        Self { styled: text.with(fg_color.as_color()).bold() }
    }
}

impl<'a> fmt::Display for StyledText<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.styled)
    }
}

/// Theme defining the main colors used by the UI
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub primary: PastelColor,
    pub secondary: PastelColor,
    pub accent: PastelColor,
    pub text: PastelColor,
    pub muted: PastelColor,
    pub warning: PastelColor,
    pub error: PastelColor,
    pub success: PastelColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: PastelColor::Lavender,
            secondary: PastelColor::SkyBlue,
            accent: PastelColor::Pink,
            text: PastelColor::White,
            muted: PastelColor::Gray,
            warning: PastelColor::LightYellow,
            error: PastelColor::Peach,
            success: PastelColor::Mint,
        }
    }
}
