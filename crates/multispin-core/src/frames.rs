// SPDX-License-Identifier: MIT

//! Animation frame sets.
//!
//! A frame set is the list of glyphs an animated row cycles through and the
//! tick interval between them. A handful of well-known sets are built in;
//! callers can also supply their own, validated field by field: a bad
//! interval keeps the platform default's interval, bad frames keep its
//! frames, an unknown name falls back to the platform default entirely.

use std::time::Duration;

use serde_json::Value;

/// Glyphs plus the delay between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frames {
    pub interval: Duration,
    pub frames: Vec<String>,
}

/// Names accepted by [`Frames::named`].
pub const NAMES: &[&str] = &["dots", "dots3", "dashes", "line", "star", "arrow"];

impl Frames {
    fn new(interval_ms: u64, frames: &[&str]) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            frames: frames.iter().map(|f| (*f).to_owned()).collect(),
        }
    }

    /// Braille dots.
    #[must_use]
    pub fn dots() -> Self {
        Self::new(80, &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    /// ASCII-only fallback.
    #[must_use]
    pub fn dashes() -> Self {
        Self::new(80, &["-", "_"])
    }

    /// A built-in set by name.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        Some(match name {
            "dots" => Self::dots(),
            "dots3" => Self::new(80, &["⠋", "⠙", "⠚", "⠞", "⠖", "⠦", "⠴", "⠲", "⠳", "⠓"]),
            "dashes" => Self::dashes(),
            "line" => Self::new(130, &["-", "\\", "|", "/"]),
            "star" => Self::new(70, &["✶", "✸", "✹", "✺", "✹", "✷"]),
            "arrow" => Self::new(100, &["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"]),
            _ => return None,
        })
    }

    /// `dots` when the terminal can draw it, `dashes` otherwise.
    #[must_use]
    pub fn platform_default(unicode: bool) -> Self {
        if unicode { Self::dots() } else { Self::dashes() }
    }

    /// Glyph for frame `index`, wrapping around.
    #[must_use]
    pub fn glyph(&self, index: usize) -> &str {
        if self.frames.is_empty() {
            return "";
        }
        &self.frames[index % self.frames.len()]
    }

    /// Number of frames; never zero for validated sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// ─── FramesSpec ──────────────────────────────────────────────────────────────

/// What a caller asks for: a built-in set or a custom one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramesSpec {
    Named(String),
    Custom {
        interval: Option<Duration>,
        frames: Option<Vec<String>>,
    },
}

impl FramesSpec {
    /// Read a frame request from a name string or an `{interval, frames}` object.
    ///
    /// Anything else becomes a custom request with nothing valid in it, which
    /// resolves to the platform default.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(name) => Self::Named(name.clone()),
            Value::Object(map) => Self::Custom {
                interval: map
                    .get("interval")
                    .and_then(Value::as_u64)
                    .filter(|ms| *ms > 0)
                    .map(Duration::from_millis),
                frames: map.get("frames").and_then(Value::as_array).and_then(|list| {
                    let frames: Vec<String> = list
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_owned)
                        .collect();
                    (!frames.is_empty() && frames.len() == list.len()).then_some(frames)
                }),
            },
            _ => Self::Custom {
                interval: None,
                frames: None,
            },
        }
    }

    /// Turn the request into a usable set, filling gaps from `fallback`.
    #[must_use]
    pub fn resolve(&self, fallback: &Frames) -> Frames {
        match self {
            Self::Named(name) => Frames::named(name).unwrap_or_else(|| {
                tracing::debug!(%name, "unknown frame set, using default");
                fallback.clone()
            }),
            Self::Custom { interval, frames } => Frames {
                interval: interval
                    .filter(|i| !i.is_zero())
                    .unwrap_or(fallback.interval),
                frames: frames
                    .clone()
                    .filter(|f| !f.is_empty())
                    .unwrap_or_else(|| fallback.frames.clone()),
            },
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fallback() -> Frames {
        Frames::platform_default(true)
    }

    #[test]
    fn every_name_resolves() {
        for name in NAMES {
            let frames = Frames::named(name).unwrap();
            assert!(!frames.is_empty());
            assert!(frames.interval > Duration::ZERO);
        }
    }

    #[test]
    fn platform_default_depends_on_unicode() {
        assert_eq!(Frames::platform_default(true), Frames::dots());
        assert_eq!(Frames::platform_default(false), Frames::dashes());
    }

    #[test]
    fn glyph_wraps_around() {
        let frames = Frames::dashes();
        assert_eq!(frames.glyph(0), "-");
        assert_eq!(frames.glyph(1), "_");
        assert_eq!(frames.glyph(2), "-");
    }

    #[test]
    fn invalid_interval_and_frames_pick_default() {
        let spec = FramesSpec::from_value(&json!({ "interval": "foo", "frames": "bar" }));
        assert_eq!(spec.resolve(&fallback()), fallback());
    }

    #[test]
    fn invalid_interval_keeps_custom_frames() {
        let spec = FramesSpec::from_value(&json!({ "interval": "foo", "frames": ["-", "+"] }));
        let frames = spec.resolve(&fallback());
        assert_eq!(frames.interval, fallback().interval);
        assert_eq!(frames.frames, vec!["-", "+"]);
    }

    #[test]
    fn invalid_frames_keep_custom_interval() {
        let spec = FramesSpec::from_value(&json!({ "interval": 100, "frames": "foo" }));
        let frames = spec.resolve(&fallback());
        assert_eq!(frames.interval, Duration::from_millis(100));
        assert_eq!(frames.frames, fallback().frames);
    }

    #[test]
    fn mixed_frame_list_is_invalid() {
        let spec = FramesSpec::from_value(&json!({ "interval": 100, "frames": ["-", 3] }));
        assert_eq!(spec.resolve(&fallback()).frames, fallback().frames);
    }

    #[test]
    fn valid_custom_spinner_persists() {
        let spec = FramesSpec::from_value(&json!({ "interval": 100, "frames": ["-", "+"] }));
        assert_eq!(
            spec.resolve(&fallback()),
            Frames {
                interval: Duration::from_millis(100),
                frames: vec!["-".into(), "+".into()],
            }
        );
    }

    #[test]
    fn unknown_name_picks_default() {
        let spec = FramesSpec::from_value(&json!("i-dont-exist"));
        assert_eq!(spec.resolve(&fallback()), fallback());
    }

    #[test]
    fn known_name_picks_that_set() {
        let spec = FramesSpec::from_value(&json!("dots3"));
        assert_eq!(spec.resolve(&fallback()), Frames::named("dots3").unwrap());
    }
}
