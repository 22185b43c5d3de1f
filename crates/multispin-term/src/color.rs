// SPDX-License-Identifier: MIT
//
// The 16-colour palette and the styling seam.
//
// Spinner colours are named, not computed: callers hand us "cyan" or
// "redBright" in option bags, and the only thing the engine needs from a
// colour is "wrap this string so it shows up in that colour". That is the
// whole contract of `Styler`. The default `AnsiStyler` uses SGR 30-37 and
// 90-97; `PlainStyler` returns text untouched (NO_COLOR, piped output, tests).
//
// Colour names follow the camelCase spelling callers already use
// (`greenBright`, not `bright_green`). `grey` is accepted as a synonym for
// `gray` and normalised on parse.

use std::fmt;
use std::str::FromStr;

use crate::ansi;

// ─── Color ───────────────────────────────────────────────────────────────────

/// One entry of the fixed terminal palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    RedBright,
    GreenBright,
    YellowBright,
    BlueBright,
    MagentaBright,
    CyanBright,
    WhiteBright,
}

/// Every name [`Color::from_str`] accepts, in palette order.
pub const PALETTE_NAMES: &[&str] = &[
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "gray",
    "grey",
    "redBright",
    "greenBright",
    "yellowBright",
    "blueBright",
    "magentaBright",
    "cyanBright",
    "whiteBright",
];

impl Color {
    /// The canonical camelCase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Gray => "gray",
            Self::RedBright => "redBright",
            Self::GreenBright => "greenBright",
            Self::YellowBright => "yellowBright",
            Self::BlueBright => "blueBright",
            Self::MagentaBright => "magentaBright",
            Self::CyanBright => "cyanBright",
            Self::WhiteBright => "whiteBright",
        }
    }

    /// Foreground SGR parameter for this colour.
    ///
    /// Gray is "bright black" (90) in every common terminal theme.
    #[must_use]
    pub const fn sgr(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::Gray => 90,
            Self::RedBright => 91,
            Self::GreenBright => 92,
            Self::YellowBright => 93,
            Self::BlueBright => 94,
            Self::MagentaBright => 95,
            Self::CyanBright => 96,
            Self::WhiteBright => 97,
        }
    }
}

/// Error returned when a string does not name a palette colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown colour `{}`", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "gray" | "grey" => Self::Gray,
            "redBright" => Self::RedBright,
            "greenBright" => Self::GreenBright,
            "yellowBright" => Self::YellowBright,
            "blueBright" => Self::BlueBright,
            "magentaBright" => Self::MagentaBright,
            "cyanBright" => Self::CyanBright,
            "whiteBright" => Self::WhiteBright,
            other => return Err(UnknownColor(other.to_owned())),
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Styler ──────────────────────────────────────────────────────────────────

/// "Apply colour C to string S." The engine's only view of styling.
///
/// Implementations must not change the visible width of `text`: the layout
/// engine measures the styled result by stripping escape sequences.
pub trait Styler: Send + Sync {
    fn paint(&self, color: Color, text: &str) -> String;
}

/// SGR foreground colour, closed with SGR 39 so the surrounding attributes
/// survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiStyler;

impl Styler for AnsiStyler {
    fn paint(&self, color: Color, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut out = Vec::with_capacity(text.len() + 10);
        ansi::fg(&mut out, color).ok();
        out.extend_from_slice(text.as_bytes());
        ansi::fg_default(&mut out).ok();
        // Only ASCII escapes were added around valid UTF-8.
        String::from_utf8(out).unwrap_or_else(|_| text.to_owned())
    }
}

/// No-op styler for colourless output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyler;

impl Styler for PlainStyler {
    fn paint(&self, _color: Color, text: &str) -> String {
        text.to_owned()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
