// SPDX-License-Identifier: MIT

//! Typed options for groups and spinners, and their free-form ingestion.
//!
//! Both records are all-`Option` on purpose: `None` means "leave it as it
//! is", which is what makes partial, incremental updates safe. The
//! `from_value` constructors accept loosely typed JSON bags with the
//! camelCase keys callers already use and drop every field that fails
//! validation (see [`crate::purge`]).
//!
//! # Spinner keys
//!
//! | Key                | Type                          |
//! |--------------------|-------------------------------|
//! | `text`             | non-empty string              |
//! | `status`           | non-empty string (checked against the registry on apply) |
//! | `indent`           | non-negative integer          |
//! | `hidden`           | boolean                       |
//! | `color`            | palette name                  |
//! | `spinnerColor`     | palette name                  |
//! | `<status>Color`    | palette name, e.g. `failColor` |
//! | `<status>Prefix`   | `false`, string or number, e.g. `succeedPrefix` |

use std::collections::BTreeMap;
use std::time::Duration;

use multispin_term::color::Color;
use serde_json::{Map, Value};

use crate::frames::FramesSpec;
use crate::purge::{self, Kind, Rule};
use crate::spinner::StatusOverride;
use crate::status::{self, Prefix};

// ─── SpinnerOptions ──────────────────────────────────────────────────────────

/// A partial update to one spinner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpinnerOptions {
    pub text: Option<String>,
    pub status: Option<String>,
    pub indent: Option<usize>,
    pub hidden: Option<bool>,
    pub color: Option<Color>,
    pub spinner_color: Option<Color>,
    /// Flat per-status overrides, keyed by status name or alias as written
    /// (`succeed` for `succeedColor`). Resolved against the registry when
    /// applied; keys that name no status are dropped then.
    pub status_overrides: BTreeMap<String, StatusOverride>,
}

impl SpinnerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub const fn indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub const fn spinner_color(mut self, color: Color) -> Self {
        self.spinner_color = Some(color);
        self
    }

    /// `succeedColor`: prefix and text colour of the `succeed` status.
    #[must_use]
    pub fn succeed_color(self, color: Color) -> Self {
        self.status_color(status::SUCCEED, color)
    }

    /// `failColor`: prefix and text colour of the `fail` status.
    #[must_use]
    pub fn fail_color(self, color: Color) -> Self {
        self.status_color(status::FAIL, color)
    }

    #[must_use]
    pub fn succeed_prefix(self, prefix: Prefix) -> Self {
        self.status_prefix(status::SUCCEED, prefix)
    }

    #[must_use]
    pub fn fail_prefix(self, prefix: Prefix) -> Self {
        self.status_prefix(status::FAIL, prefix)
    }

    /// `<status>Color` for any status.
    #[must_use]
    pub fn status_color(mut self, status: &str, color: Color) -> Self {
        let entry = self.status_overrides.entry(status.to_owned()).or_default();
        entry.prefix_color = Some(color);
        entry.text_color = Some(color);
        self
    }

    /// `<status>Prefix` for any status.
    #[must_use]
    pub fn status_prefix(mut self, status: &str, prefix: Prefix) -> Self {
        self.status_overrides.entry(status.to_owned()).or_default().prefix = Some(prefix);
        self
    }

    /// Validate a flat option bag. Non-object values yield empty options.
    #[must_use]
    pub fn from_value(bag: &Value) -> Self {
        let Some(bag) = bag.as_object() else {
            return Self::default();
        };
        let rules: [(&str, Rule); 6] = [
            ("text", purge::non_empty_string()),
            ("status", purge::non_empty_string()),
            ("indent", purge::unsigned()),
            ("hidden", purge::of_type(Kind::Bool)),
            ("color", purge::color()),
            ("spinnerColor", purge::color()),
        ];
        let clean = purge::purge(&rules, bag);

        let mut options = Self {
            text: string(&clean, "text"),
            status: string(&clean, "status"),
            indent: clean
                .get("indent")
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok()),
            hidden: clean.get("hidden").and_then(Value::as_bool),
            color: color(&clean, "color"),
            spinner_color: color(&clean, "spinnerColor"),
            status_overrides: BTreeMap::new(),
        };

        let color_rule = purge::color();
        let prefix_rule = purge::prefix();
        for (key, value) in bag {
            if let Some(stem) = status_stem(key, "Color") {
                if color_rule(value) {
                    if let Some(c) = value.as_str().and_then(|s| s.parse().ok()) {
                        options = options.status_color(stem, c);
                    }
                } else {
                    tracing::trace!(field = %key, %value, "dropping invalid option");
                }
            } else if let Some(stem) = status_stem(key, "Prefix") {
                if prefix_rule(value) {
                    options = options.status_prefix(stem, Prefix::from_value(value));
                } else {
                    tracing::trace!(field = %key, %value, "dropping invalid option");
                }
            }
        }

        options
    }
}

/// `failColor` → `fail`. The plain `color` and `spinnerColor` keys are
/// spinner-level, not status-level.
fn status_stem<'a>(key: &'a str, suffix: &str) -> Option<&'a str> {
    if key == "spinnerColor" {
        return None;
    }
    key.strip_suffix(suffix).filter(|stem| !stem.is_empty())
}

fn string(bag: &Map<String, Value>, key: &str) -> Option<String> {
    bag.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn color(bag: &Map<String, Value>, key: &str) -> Option<Color> {
    bag.get(key).and_then(Value::as_str).and_then(|s| s.parse().ok())
}

// ─── GroupConfig ─────────────────────────────────────────────────────────────

/// Group-wide defaults and behaviour switches.
///
/// Colours and prefixes are the defaults every new spinner starts from.
/// The `Option` switches are auto-detected when left `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    pub color: Color,
    pub spinner_color: Color,
    pub succeed_color: Color,
    pub fail_color: Color,
    /// `None` picks ✓ (or √ without Unicode).
    pub succeed_prefix: Option<Prefix>,
    /// `None` picks ✖ (or × without Unicode).
    pub fail_prefix: Option<Prefix>,
    /// `None` picks `dots` (or `dashes` without Unicode).
    pub frames: Option<FramesSpec>,
    /// `None` animates only on an interactive, non-CI stderr.
    pub animate: Option<bool>,
    /// `None` probes the terminal.
    pub unicode: Option<bool>,
    /// Width assumed when the sink cannot report one.
    pub fallback_columns: u16,
    /// Turn off stdin echo while animating.
    pub suppress_echo: bool,
    /// Drive frames from a background ticker. `false` leaves it to
    /// [`SpinnerGroup::tick`](crate::group::SpinnerGroup::tick).
    pub auto_tick: bool,
    /// Emit colour escapes.
    pub color_output: bool,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            color: Color::White,
            spinner_color: Color::GreenBright,
            succeed_color: Color::Green,
            fail_color: Color::Red,
            succeed_prefix: None,
            fail_prefix: None,
            frames: None,
            animate: None,
            unicode: None,
            fallback_columns: crate::layout::FALLBACK_COLUMNS,
            suppress_echo: true,
            auto_tick: true,
            color_output: true,
        }
    }
}

impl GroupConfig {
    /// Defaults overlaid with the valid fields of a free-form bag.
    ///
    /// Keys: `color`, `spinnerColor`, `succeedColor`, `failColor`,
    /// `succeedPrefix`, `failPrefix`, `spinner` (frame-set name or
    /// `{interval, frames}`), `disableSpins`.
    #[must_use]
    pub fn from_value(bag: &Value) -> Self {
        let mut config = Self::default();
        let Some(bag) = bag.as_object() else {
            return config;
        };
        let rules: [(&str, Rule); 8] = [
            ("color", purge::color()),
            ("spinnerColor", purge::color()),
            ("succeedColor", purge::color()),
            ("failColor", purge::color()),
            ("succeedPrefix", purge::prefix()),
            ("failPrefix", purge::prefix()),
            (
                "spinner",
                purge::some(vec![purge::of_type(Kind::String), purge::of_type(Kind::Object)]),
            ),
            ("disableSpins", purge::of_type(Kind::Bool)),
        ];
        let clean = purge::purge(&rules, bag);

        if let Some(c) = color(&clean, "color") {
            config.color = c;
        }
        if let Some(c) = color(&clean, "spinnerColor") {
            config.spinner_color = c;
        }
        if let Some(c) = color(&clean, "succeedColor") {
            config.succeed_color = c;
        }
        if let Some(c) = color(&clean, "failColor") {
            config.fail_color = c;
        }
        config.succeed_prefix = clean.get("succeedPrefix").map(Prefix::from_value);
        config.fail_prefix = clean.get("failPrefix").map(Prefix::from_value);
        config.frames = clean.get("spinner").map(FramesSpec::from_value);
        config.animate = clean
            .get("disableSpins")
            .and_then(Value::as_bool)
            .map(|disabled| !disabled);
        config
    }

    /// Set the frames to a custom list at `interval`.
    #[must_use]
    pub fn with_frames(mut self, interval: Duration, frames: &[&str]) -> Self {
        self.frames = Some(FramesSpec::Custom {
            interval: Some(interval),
            frames: Some(frames.iter().map(|f| (*f).to_owned()).collect()),
        });
        self
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
