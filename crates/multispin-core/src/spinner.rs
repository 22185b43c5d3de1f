// SPDX-License-Identifier: MIT

//! One spinner row: its state, its updates, and how it draws itself.
//!
//! A [`Spinner`] is plain data. It never talks to the terminal; the group
//! asks it to [`render`](Spinner::render) with the current frame glyph and
//! writes the result. Everything a spinner needs to know about statuses
//! comes from the [`StatusRegistry`] passed in, so a status reconfigured on
//! the group restyles every row on the next frame.

use std::collections::BTreeMap;

use multispin_term::color::{Color, Styler};

use crate::layout;
use crate::options::SpinnerOptions;
use crate::status::{self, PlainRow, Prefix, StatusRegistry};

// ─── StatusOverride ──────────────────────────────────────────────────────────

/// Per-spinner tweaks to one status, keyed by canonical status name.
///
/// Merging only ever fills or replaces fields, so a later update that does
/// not mention a field leaves the earlier override in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusOverride {
    pub prefix: Option<Prefix>,
    pub prefix_color: Option<Color>,
    pub text_color: Option<Color>,
}

impl StatusOverride {
    pub fn merge(&mut self, other: &Self) {
        if let Some(prefix) = &other.prefix {
            self.prefix = Some(prefix.clone());
        }
        if other.prefix_color.is_some() {
            self.prefix_color = other.prefix_color;
        }
        if other.text_color.is_some() {
            self.text_color = other.text_color;
        }
    }
}

// ─── ColorRoles ──────────────────────────────────────────────────────────────

/// The four colour roles every spinner carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRoles {
    pub text: Color,
    pub spinner: Color,
    pub succeed: Color,
    pub fail: Color,
}

// ─── Rendered ────────────────────────────────────────────────────────────────

/// One spinner drawn for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Styled physical rows joined with `\n`, no trailing newline.
    pub line: String,
    /// Visible width of each physical row.
    pub row_lengths: Vec<usize>,
}

impl Rendered {
    /// Iterate the styled physical rows.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.line.split('\n')
    }
}

// ─── Spinner ─────────────────────────────────────────────────────────────────

/// State of one named row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spinner {
    name: String,
    text: String,
    status: String,
    indent: usize,
    hidden: bool,
    colors: ColorRoles,
    overrides: BTreeMap<String, StatusOverride>,
}

impl Spinner {
    /// A spinning entry whose text is its name.
    #[must_use]
    pub fn new(name: &str, colors: ColorRoles, registry: &StatusRegistry) -> Self {
        Self {
            name: name.to_owned(),
            text: name.to_owned(),
            status: registry.default_status().to_owned(),
            indent: 0,
            hidden: false,
            colors,
            overrides: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Canonical name of the current status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub const fn colors(&self) -> ColorRoles {
        self.colors
    }

    /// This spinner's override for a canonical status name.
    #[must_use]
    pub fn status_override(&self, status: &str) -> Option<&StatusOverride> {
        self.overrides.get(status)
    }

    // ── Updates ─────────────────────────────────────────────────────

    /// Merge `options` into the current state.
    ///
    /// Fields left `None` keep their value. An empty text or a status the
    /// registry does not know is ignored. Per-status overrides are folded
    /// into the override map under the status's canonical name.
    pub fn update(&mut self, options: &SpinnerOptions, registry: &StatusRegistry) {
        if let Some(text) = options.text.as_deref().filter(|t| !t.is_empty()) {
            text.clone_into(&mut self.text);
        }
        if let Some(status) = &options.status {
            self.set_status(status, registry);
        }
        if let Some(indent) = options.indent {
            self.indent = indent;
        }
        if let Some(hidden) = options.hidden {
            self.hidden = hidden;
        }
        if let Some(color) = options.color {
            self.colors.text = color;
        }
        if let Some(color) = options.spinner_color {
            self.colors.spinner = color;
            self.override_mut(status::SPINNING).prefix_color = Some(color);
        }

        for (stem, patch) in &options.status_overrides {
            let Some(canonical) = registry.canonical(stem).map(str::to_owned) else {
                tracing::trace!(spinner = %self.name, status = %stem, "override for unknown status dropped");
                continue;
            };
            if canonical == status::SUCCEED {
                if let Some(color) = patch.prefix_color {
                    self.colors.succeed = color;
                }
            } else if canonical == status::FAIL {
                if let Some(color) = patch.prefix_color {
                    self.colors.fail = color;
                }
            }
            self.override_mut(&canonical).merge(patch);
        }
    }

    /// Switch to `status` (name or alias). Unknown or empty names are ignored.
    pub fn set_status(&mut self, status: &str, registry: &StatusRegistry) {
        match registry.canonical(status) {
            Some(canonical) => canonical.clone_into(&mut self.status),
            None => {
                tracing::trace!(spinner = %self.name, %status, "unknown status ignored");
            }
        }
    }

    /// Force the status to `stopped` (or `status`) and recolour the text to
    /// that status's text colour, gray when it has none.
    pub(crate) fn stop(&mut self, status: &str, registry: &StatusRegistry) {
        self.set_status(status, registry);
        self.colors.text = registry
            .resolve(&self.status)
            .text_color
            .unwrap_or(Color::Gray);
    }

    fn override_mut(&mut self, status: &str) -> &mut StatusOverride {
        self.overrides.entry(status.to_owned()).or_default()
    }

    /// Still animating under the current registry.
    #[must_use]
    pub fn is_active(&self, registry: &StatusRegistry) -> bool {
        !registry.resolve(&self.status).is_static
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Draw this spinner.
    ///
    /// `frame` is the glyph for animated statuses; static statuses draw
    /// their own prefix. The text is wrapped for `columns`, coloured row by
    /// row, and continuation rows are padded to line up under the first.
    ///
    /// No row is wider than `columns - 1`: the indent is clamped so at
    /// least one text column remains, and a prefix that would fill the row
    /// on its own is cut short.
    #[must_use]
    pub fn render(
        &self,
        frame: &str,
        registry: &StatusRegistry,
        styler: &dyn Styler,
        columns: u16,
    ) -> Rendered {
        let def = registry.resolve(&self.status);
        let patch = self.overrides.get(&def.name);
        let budget = usize::from(columns).saturating_sub(1).max(1);

        let mut glyph = if def.is_static {
            patch
                .and_then(|p| p.prefix.as_ref())
                .unwrap_or(&def.prefix)
                .glyph()
                .unwrap_or("")
                .to_owned()
        } else {
            frame.to_owned()
        };
        let mut separator = if glyph.is_empty() || def.no_space_after_prefix { "" } else { " " };
        let mut prefix_len = layout::visible_length(&glyph) + separator.len();
        if prefix_len >= budget {
            glyph = layout::truncate(&glyph, budget - 1);
            separator = "";
            prefix_len = layout::visible_length(&glyph);
        }
        let indent = self.indent.min(budget - prefix_len - 1);

        let prefix_color = patch
            .and_then(|p| p.prefix_color)
            .or(def.prefix_color)
            .unwrap_or(if def.is_static { self.colors.text } else { self.colors.spinner });
        let text_color = patch
            .and_then(|p| p.text_color)
            .or(def.text_color)
            .unwrap_or(self.colors.text);

        let width = layout::available_width(columns, prefix_len, indent);
        let styled: Vec<String> = layout::wrap(&self.text, width)
            .iter()
            .map(|row| styler.paint(text_color, row))
            .collect();
        let mut rows = layout::indent(styled, prefix_len, indent);
        if let Some(first) = rows.first_mut() {
            *first = format!(
                "{}{}{separator}{first}",
                " ".repeat(indent),
                styler.paint(prefix_color, &glyph),
            );
        }

        let row_lengths = rows.iter().map(|row| layout::visible_length(row)).collect();
        Rendered {
            line: rows.join("\n"),
            row_lengths,
        }
    }

    /// Draw this spinner for plain (non-animated) output.
    ///
    /// A status with a [`PlainRender`](crate::status::PlainRender) decides
    /// the line itself; otherwise this is [`render`](Self::render) with
    /// `glyph` standing in for the animation frame.
    #[must_use]
    pub fn render_plain(
        &self,
        glyph: &str,
        registry: &StatusRegistry,
        styler: &dyn Styler,
        columns: u16,
    ) -> String {
        let def = registry.resolve(&self.status);
        match &def.plain_render {
            Some(render) => render.render(&PlainRow {
                spinner: self,
                status: def,
            }),
            None => self.render(glyph, registry, styler, columns).line,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
